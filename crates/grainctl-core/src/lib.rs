//! grainctl Core - control-rate primitives for a hardware effects module
//!
//! This crate provides the small, allocation-free building blocks the control
//! plane runs once per tick: analog smoothing, latency realignment, and the
//! pickup parameter that lets a physical knob take over a recalled value.
//!
//! # Core Abstractions
//!
//! ## Analog Conditioning
//!
//! - [`OnePole`] - One-pole exponential smoother (`value += k * (x - value)`)
//! - [`PitchTable`] - Monotonic normalized-to-semitone lookup with semitone detents
//! - [`saturate`], [`expand_range`], [`interpolate`] - range helpers
//!
//! ## Latency Alignment
//!
//! - [`LatencyLine`] - Fixed-depth ring buffer that delays a value by `N` ticks
//!
//! ## Parameters
//!
//! - [`Parameter`] - Live/loaded value pair with one-way pickup handoff
//! - [`Parameters`] - Per-tick snapshot handed to the processing engine
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! grainctl-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use grainctl_core::{LatencyLine, OnePole, Parameter};
//!
//! let mut smoother = OnePole::new(0.5);
//! smoother.process(1.0);
//! assert_eq!(smoother.value(), 0.5);
//!
//! let mut gate: LatencyLine<bool, 2> = LatencyLine::new();
//! assert!(!gate.process(true));
//! assert!(!gate.process(false));
//! assert!(gate.process(false));
//!
//! let mut knob = Parameter::new(0.2);
//! knob.load(0.8);
//! knob.update(0.3);
//! assert_eq!(knob.value(), 0.8); // still on the recalled value
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod delay;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod pitch;

// Re-export main types at crate root
pub use delay::LatencyLine;
pub use math::{expand_range, interpolate, saturate};
pub use one_pole::OnePole;
pub use param::{Authority, PICKUP_TOLERANCE, Parameter, Parameters};
pub use pitch::{PITCH_RANGE_SEMITONES, PITCH_TABLE_SIZE, PitchTable};
