//! Scripted control-loop simulation.

use anyhow::Context;
use clap::Args;
use grainctl_config::{PresetLocation, Settings};
use grainctl_platform::{AdcChannel, SwitchId};
use grainctl_ui::{ControlLoop, EngineState, Processor, SimulatedPanel};
use serde::Serialize;
use std::path::PathBuf;

use super::common::{DynStore, StoreArgs};
use crate::script::{Action, Script};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Script file (TOML)
    script: PathBuf,

    #[command(flatten)]
    store: StoreArgs,

    /// Hold WRITE at power-up (enters calibration)
    #[arg(long)]
    hold_write: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

/// One mode change observed during the run.
#[derive(Debug, Clone, Serialize)]
pub struct ModeChange {
    pub tick: u32,
    pub from: &'static str,
    pub to: &'static str,
}

/// Final state after a run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub ticks: u32,
    pub mode: &'static str,
    pub transitions: Vec<ModeChange>,
    pub bypass: bool,
    pub frozen: bool,
    pub reversed: bool,
    pub quality: u8,
    pub playback_mode: &'static str,
    pub cursor: PresetLocation,
    pub leds: Vec<[u8; 2]>,
}

type Simulation = ControlLoop<SimulatedPanel, DynStore, EngineState>;

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let script = Script::load(&args.script)?;

    let mut panel = SimulatedPanel::new();
    if args.hold_write {
        panel.set_switch(SwitchId::Write, true);
    }
    let settings = Settings::init(args.store.open_or_memory());
    let mut sim = ControlLoop::new(panel, settings, EngineState::new());

    tracing::info!("running {} ticks, {} steps", script.ticks, script.steps.len());
    let summary = simulate(&mut sim, &script)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for change in &summary.transitions {
            println!("{:>7}  {} -> {}", change.tick, change.from, change.to);
        }
        println!();
        println!("final mode:    {}", summary.mode);
        println!("bypass:        {}", summary.bypass);
        println!("freeze:        {}", summary.frozen);
        println!("reverse:       {}", summary.reversed);
        println!("quality:       {}", summary.quality);
        println!("playback mode: {}", summary.playback_mode);
        println!("cursor:        {}", summary.cursor);
    }
    Ok(())
}

/// Runs `script` to completion and reports what happened.
pub fn simulate(sim: &mut Simulation, script: &Script) -> anyhow::Result<Summary> {
    let mut transitions = Vec::new();
    let mut steps = script.steps.iter().peekable();
    let start = sim.now();

    for _ in 0..script.ticks {
        let elapsed = sim.now() - start;
        while let Some(step) = steps.next_if(|step| step.at <= elapsed) {
            apply(sim, &step.action);
        }

        let before = sim.ui().mode();
        sim.tick()
            .with_context(|| format!("control loop failed at tick {}", sim.now()))?;
        let after = sim.ui().mode();
        if before != after {
            transitions.push(ModeChange {
                tick: sim.now(),
                from: before.name(),
                to: after.name(),
            });
        }
    }

    Ok(summarize(sim, script.ticks, transitions))
}

fn apply(sim: &mut Simulation, action: &Action) {
    tracing::debug!("tick {}: {action:?}", sim.now());
    match action {
        Action::Press { switch } => sim.controller_mut().set_switch(*switch, true),
        Action::Release { switch } => sim.controller_mut().set_switch(*switch, false),
        Action::Set { channel, value } => {
            if let Some(channel) = AdcChannel::from_name(channel) {
                sim.controller_mut().set_adc(channel, *value);
            }
        }
        Action::Gate { on } => sim.controller_mut().set_gate(*on),
        Action::Peak { value } => sim.ui_mut().processor_mut().set_peak(*value),
    }
}

fn summarize(sim: &Simulation, ticks: u32, transitions: Vec<ModeChange>) -> Summary {
    let ui = sim.ui();
    let engine = ui.processor();
    Summary {
        ticks,
        mode: ui.mode().name(),
        transitions,
        bypass: engine.bypass(),
        frozen: engine.frozen(),
        reversed: engine.reversed(),
        quality: engine.quality(),
        playback_mode: engine.playback_mode().name(),
        cursor: ui.cursor(),
        leds: sim
            .leds()
            .status
            .iter()
            .map(|led| [led.red, led.green])
            .collect(),
    }
}
