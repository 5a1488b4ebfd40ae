//! Front-panel simulation scripts.
//!
//! A script is a TOML file with a total tick count and a list of timed
//! actions:
//!
//! ```toml
//! ticks = 4000
//!
//! [[steps]]
//! at = 100
//! action = "press"
//! switch = "mode"
//!
//! [[steps]]
//! at = 1300
//! action = "release"
//! switch = "mode"
//!
//! [[steps]]
//! at = 1500
//! action = "set"
//! channel = "texture"
//! value = 0.8
//! ```

use anyhow::{Context, bail};
use grainctl_platform::{AdcChannel, SwitchId};
use serde::Deserialize;
use std::path::Path;

/// A parsed, validated script with steps in tick order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Number of ticks to run.
    pub ticks: u32,
    /// Timed actions.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One action applied just before tick `at` runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Tick at which the action takes effect.
    pub at: u32,
    /// What to do.
    #[serde(flatten)]
    pub action: Action,
}

/// A change to the simulated front panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Hold a switch down.
    Press {
        /// Switch name.
        switch: SwitchId,
    },
    /// Let a switch go.
    Release {
        /// Switch name.
        switch: SwitchId,
    },
    /// Move a pot or drive a CV input.
    Set {
        /// Channel name, e.g. `texture` or `v_oct`.
        channel: String,
        /// Normalized reading.
        value: f32,
    },
    /// Drive the gate jack.
    Gate {
        /// Gate level.
        on: bool,
    },
    /// Report an engine output level for the VU meter.
    Peak {
        /// Linear peak.
        value: f32,
    },
}

impl Script {
    /// Reads and validates a script file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid script {}", path.display()))
    }

    /// Parses and validates script text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut script: Script = toml::from_str(text)?;
        for step in &script.steps {
            match &step.action {
                Action::Set { channel, .. } if AdcChannel::from_name(channel).is_none() => {
                    bail!("step at tick {}: unknown channel '{channel}'", step.at);
                }
                _ => {}
            }
            if step.at > script.ticks {
                bail!(
                    "step at tick {} is past the end of the run ({} ticks)",
                    step.at,
                    script.ticks
                );
            }
        }
        script.steps.sort_by_key(|step| step.at);
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action() {
        let script = Script::parse(
            r#"
            ticks = 100
            [[steps]]
            at = 50
            action = "release"
            switch = "write"
            [[steps]]
            at = 10
            action = "press"
            switch = "write"
            [[steps]]
            at = 20
            action = "set"
            channel = "v_oct"
            value = 0.4
            [[steps]]
            at = 30
            action = "gate"
            on = true
            [[steps]]
            at = 40
            action = "peak"
            value = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(script.ticks, 100);
        let ticks: Vec<u32> = script.steps.iter().map(|s| s.at).collect();
        assert_eq!(ticks, vec![10, 20, 30, 40, 50]);
        assert_eq!(
            script.steps[0].action,
            Action::Press {
                switch: SwitchId::Write
            }
        );
        assert_eq!(script.steps[2].action, Action::Gate { on: true });
    }

    #[test]
    fn rejects_unknown_channel() {
        let err = Script::parse(
            r#"
            ticks = 10
            [[steps]]
            at = 1
            action = "set"
            channel = "volume"
            value = 0.5
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn rejects_unknown_switch() {
        assert!(
            Script::parse(
                r#"
                ticks = 10
                [[steps]]
                at = 1
                action = "press"
                switch = "shift"
                "#,
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_steps_past_end() {
        let err = Script::parse(
            r#"
            ticks = 10
            [[steps]]
            at = 11
            action = "gate"
            on = false
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("past the end"));
    }

    #[test]
    fn steps_are_optional() {
        let script = Script::parse("ticks = 5").unwrap();
        assert!(script.steps.is_empty());
    }
}
