//! Factory-test requests against a freshly booted control loop.

use anyhow::anyhow;
use clap::Args;
use grainctl_config::Settings;
use grainctl_platform::{ADC_LATENCY, AdcChannel};
use grainctl_ui::{ControlLoop, EngineState, FactoryCommand, SimulatedPanel};

use super::common::{StoreArgs, parse_byte};

#[derive(Args, Debug)]
pub struct FactoryArgs {
    /// Request byte, decimal or 0x-prefixed hex
    #[arg(value_parser = parse_byte)]
    request: u8,

    #[command(flatten)]
    store: StoreArgs,

    /// Analog input level before the request, e.g. `--set texture=0.5`
    #[arg(long, value_name = "CHANNEL=VALUE")]
    set: Vec<String>,

    /// Drive the gate jack high
    #[arg(long)]
    gate: bool,
}

pub fn run(args: FactoryArgs) -> anyhow::Result<()> {
    let mut panel = SimulatedPanel::new();
    for assignment in &args.set {
        let (channel, value) = parse_assignment(assignment)?;
        panel.set_adc(channel, value);
    }
    panel.set_gate(args.gate);

    let settings = Settings::init(args.store.open());
    let mut cl = ControlLoop::new(panel, settings, EngineState::new());
    cl.run(ADC_LATENCY as u32 + 1)?;

    let command = FactoryCommand::decode(args.request);
    tracing::debug!("factory request 0x{:02x}: {command:?}", args.request);
    let reply = cl.ui_mut().handle_factory_request(args.request);
    println!("0x{reply:02x} ({reply})");
    Ok(())
}

fn parse_assignment(s: &str) -> anyhow::Result<(AdcChannel, f32)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected CHANNEL=VALUE, got '{s}'"))?;
    let channel =
        AdcChannel::from_name(name.trim()).ok_or_else(|| anyhow!("unknown channel '{name}'"))?;
    let value: f32 = value.trim().parse()?;
    Ok((channel, value))
}
