//! grainctl CLI - desktop host for the grainctl control loop.

mod commands;
mod script;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grainctl")]
#[command(author, version, about = "grainctl control-plane simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the control loop against a scripted front panel
    Simulate(commands::simulate::SimulateArgs),

    /// Inspect the stored preset bank
    Presets(commands::presets::PresetsArgs),

    /// Inspect or reset stored settings and calibration
    Settings(commands::settings::SettingsArgs),

    /// Answer one factory-test request
    Factory(commands::factory::FactoryArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Settings(args) => commands::settings::run(args),
        Commands::Factory(args) => commands::factory::run(args),
    }
}
