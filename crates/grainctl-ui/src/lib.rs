//! grainctl UI - mode state machine and control loop
//!
//! Consumes switch events and conditioned analog inputs from
//! `grainctl-platform`, drives a processing engine through [`Processor`], and
//! renders the front-panel LEDs.
//!
//! # Per-Tick Order
//!
//! 1. Debounce scan and gesture classification
//! 2. Drain the event queue through the mode state machine
//! 3. Idle timeouts and infinite-reverb release
//! 4. Analog conditioning into the engine [`Parameters`](grainctl_core::Parameters)
//! 5. LED rendering
//!
//! # Modules
//!
//! - [`mode`] - Pure transition and timeout tables
//! - [`Ui`] - Executes transitions against the engine and settings
//! - [`ControlLoop`] - Fixed-rate driver over a [`PlatformController`](grainctl_platform::PlatformController)
//! - [`SimulatedPanel`] - Host-side controller for tests and the CLI
//!
//! # Example
//!
//! ```rust
//! use grainctl_config::{MemoryStore, Settings};
//! use grainctl_platform::SwitchId;
//! use grainctl_ui::{ControlLoop, EngineState, SimulatedPanel, UiMode};
//!
//! let settings = Settings::init(MemoryStore::new());
//! let mut cl = ControlLoop::new(SimulatedPanel::new(), settings, EngineState::new());
//! cl.run(3001).unwrap();
//! assert_eq!(cl.ui().mode(), UiMode::VuMeter);
//!
//! // hold MODE past the long-press threshold
//! cl.controller_mut().set_switch(SwitchId::Mode, true);
//! cl.run(1100).unwrap();
//! cl.controller_mut().set_switch(SwitchId::Mode, false);
//! cl.run(20).unwrap();
//! assert_eq!(cl.ui().mode(), UiMode::Load);
//! ```

mod control_loop;
mod engine;
mod error;
mod factory;
mod leds;
mod panel;
mod ui;

pub mod mode;

pub use control_loop::ControlLoop;
pub use engine::{EngineState, Processor};
pub use error::UiError;
pub use factory::FactoryCommand;
pub use leds::paint;
pub use mode::{
    BROWSE_TIMEOUT_MS, Command, IdleAction, MENU_TIMEOUT_MS, PANIC_TIMEOUT_MS, Transition, UiMode,
    on_idle, on_switch_event,
};
pub use panel::SimulatedPanel;
pub use ui::Ui;
