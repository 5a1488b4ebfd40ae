//! Simulated analog converter for desktop hosts and tests.
//!
//! Real converters deliver each scan [`ADC_LATENCY`] ticks after it was
//! taken. [`SimulatedAdc`] reproduces that pipeline so the realignment done
//! by [`CvScaler`](crate::CvScaler) can be observed end to end.

use grainctl_core::LatencyLine;

use crate::{ADC_CHANNEL_COUNT, ADC_LATENCY, AdcChannel, V_OCT_REST_READING};

/// Converter model with a fixed pipeline depth.
#[derive(Debug, Clone)]
pub struct SimulatedAdc {
    levels: [f32; ADC_CHANNEL_COUNT],
    pipeline: LatencyLine<[f32; ADC_CHANNEL_COUNT], ADC_LATENCY>,
}

impl SimulatedAdc {
    /// Pots at zero and V/Oct unpatched, with the pipeline already primed.
    pub fn new() -> Self {
        let mut levels = [0.0; ADC_CHANNEL_COUNT];
        levels[AdcChannel::VOct.index()] = V_OCT_REST_READING;
        Self::with_levels(levels)
    }

    /// Starts with the given steady-state levels.
    pub fn with_levels(levels: [f32; ADC_CHANNEL_COUNT]) -> Self {
        Self {
            levels,
            pipeline: LatencyLine::filled(levels),
        }
    }

    /// Sets the voltage currently present at `channel`, normalized to `[0, 1]`.
    pub fn set(&mut self, channel: AdcChannel, value: f32) {
        self.levels[channel.index()] = value;
    }

    /// Voltage currently present at `channel`.
    pub fn level(&self, channel: AdcChannel) -> f32 {
        self.levels[channel.index()]
    }

    /// Samples every channel and returns the scan completed
    /// [`ADC_LATENCY`] ticks ago.
    pub fn convert(&mut self) -> [f32; ADC_CHANNEL_COUNT] {
        self.pipeline.process(self.levels)
    }
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primed_pipeline_reports_rest_levels() {
        let mut adc = SimulatedAdc::new();
        let scan = adc.convert();
        assert_eq!(scan[AdcChannel::VOct.index()], V_OCT_REST_READING);
        assert_eq!(scan[AdcChannel::Size.index()], 0.0);
    }

    #[test]
    fn test_change_appears_after_latency() {
        let mut adc = SimulatedAdc::new();
        adc.set(AdcChannel::Size, 0.7);
        assert_eq!(adc.level(AdcChannel::Size), 0.7);
        let seen: Vec<f32> = (0..ADC_LATENCY + 1)
            .map(|_| adc.convert()[AdcChannel::Size.index()])
            .collect();
        assert!(seen[..ADC_LATENCY].iter().all(|&v| v == 0.0));
        assert_eq!(seen[ADC_LATENCY], 0.7);
    }
}
