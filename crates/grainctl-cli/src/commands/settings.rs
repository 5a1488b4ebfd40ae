//! Stored settings and calibration.

use clap::{Args, Subcommand};
use grainctl_config::SettingsData;
use grainctl_platform::AdcChannel;

use super::common::StoreArgs;

#[derive(Args)]
pub struct SettingsArgs {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Option<SettingsCommand>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the stored state and calibration (default)
    Show,

    /// Restore factory calibration and state
    Reset,
}

pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    let mut settings = args.store.settings();

    match args.command.unwrap_or(SettingsCommand::Show) {
        SettingsCommand::Show => {
            if settings.freshly_baked() {
                println!("(no valid settings were stored; factory defaults written)");
                println!();
            }
            show(settings.data());
        }
        SettingsCommand::Reset => {
            settings.reset()?;
            println!("Settings reset to factory defaults.");
        }
    }
    Ok(())
}

fn show(data: &SettingsData) {
    println!("State");
    println!("=====");
    println!("  quality:        {}", data.state.quality);
    println!("  playback mode:  {}", data.state.playback_mode);
    println!();
    println!("Calibration");
    println!("===========");
    println!("  pitch offset:   {:.4}", data.calibration.pitch_offset);
    println!("  pitch scale:    {:.4}", data.calibration.pitch_scale);
    for channel in AdcChannel::ALL {
        println!(
            "  offset {:9} {:.4}",
            channel.name(),
            data.calibration.offset[channel.index()]
        );
    }
}
