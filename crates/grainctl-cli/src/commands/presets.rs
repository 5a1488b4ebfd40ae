//! Preset bank inspection.

use clap::{Args, Subcommand};
use grainctl_config::{Preset, PresetLocation};

use super::common::StoreArgs;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Option<PresetsCommand>,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List every slot (default)
    List,

    /// Show one preset
    Show {
        /// Bank index
        bank: u8,

        /// Slot index within the bank
        slot: u8,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    let settings = args.store.settings();
    let bank = settings.presets();

    match args.command.unwrap_or(PresetsCommand::List) {
        PresetsCommand::List => {
            println!("Presets ({} of {} written):", bank.written(), bank.presets.len());
            println!("==========================");
            for (location, preset) in bank.iter() {
                let label = location.to_string();
                if preset.is_empty() {
                    println!("  {label:16}  (empty)");
                } else {
                    println!(
                        "  {label:16}  {:14} quality {}",
                        preset.playback_mode.name(),
                        preset.quality()
                    );
                }
            }
        }
        PresetsCommand::Show { bank: b, slot } => {
            let location = PresetLocation::new(b, slot);
            let preset = bank.preset(location)?;
            show(location, preset);
        }
    }
    Ok(())
}

fn show(location: PresetLocation, preset: &Preset) {
    println!("Preset {location}");
    println!();
    println!("  playback mode:  {}", preset.playback_mode);
    println!("  stereo:         {}", preset.stereo);
    println!("  low fidelity:   {}", preset.low_fidelity);
    println!();
    let knobs = [
        ("position", preset.position),
        ("size", preset.size),
        ("pitch", preset.pitch),
        ("density", preset.density),
        ("texture", preset.texture),
        ("dry_wet", preset.dry_wet),
        ("stereo_spread", preset.stereo_spread),
        ("feedback", preset.feedback),
        ("reverb", preset.reverb),
    ];
    for (name, value) in knobs {
        println!("  {name:15} {value:.3}");
    }
}
