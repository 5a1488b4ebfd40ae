//! Analog input conditioning: polarity, calibration offsets, smoothing,
//! parameter mapping and gate/trigger realignment.
//!
//! # Signal Path
//!
//! ```text
//! raw ADC [0,1] -> polarity (1 - x) -> offset (x - cal) -> one-pole -> mapping -> Parameter::update
//! gate jack ----------------------------------------------> LatencyLine<ADC_LATENCY> -> edge
//! ```
//!
//! The converter delivers readings [`ADC_LATENCY`] ticks after they were
//! sampled, so the gate path is delayed by the same amount before its rising
//! edge is detected. Every field of the resulting
//! [`Parameters`](grainctl_core::Parameters) describes the same instant.
//!
//! # Pitch
//!
//! The transpose pot goes through the quantizing [`PitchTable`]; the V/Oct
//! input adds `pitch_offset + pitch_scale * v_oct` semitones. Note changes
//! larger than half a semitone are followed immediately, smaller wobble is
//! smoothed. The sum is clamped to +/-48 semitones.

use grainctl_core::{
    LatencyLine, OnePole, PITCH_RANGE_SEMITONES, Parameters, PitchTable, expand_range, saturate,
};

use crate::InputFrame;

/// Number of analog channels.
pub const ADC_CHANNEL_COUNT: usize = 10;

/// Depth of the converter pipeline, in ticks.
pub const ADC_LATENCY: usize = 5;

/// V/Oct reading of an unpatched jack with factory calibration (0 semitones).
pub const V_OCT_REST_READING: f32 = 0.791_241_4;

/// Jump, in semitones, above which the V/Oct note is followed without smoothing.
const NOTE_HYSTERESIS: f32 = 0.5;

/// Smoothing coefficient for small V/Oct changes.
const NOTE_SMOOTHING: f32 = 0.2;

/// Analog channels, in converter scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdcChannel {
    /// Position pot + CV.
    Position = 0,
    /// Density pot + CV.
    Density = 1,
    /// Size pot + CV.
    Size = 2,
    /// Feedback pot.
    Feedback = 3,
    /// Pitch pot.
    Pitch = 4,
    /// V/Oct CV input.
    VOct = 5,
    /// Dry/wet blend pot.
    DryWet = 6,
    /// Stereo spread pot.
    Spread = 7,
    /// Texture pot + CV.
    Texture = 8,
    /// Reverb amount pot.
    Reverb = 9,
}

impl AdcChannel {
    /// All channels in scan order.
    pub const ALL: [AdcChannel; ADC_CHANNEL_COUNT] = [
        AdcChannel::Position,
        AdcChannel::Density,
        AdcChannel::Size,
        AdcChannel::Feedback,
        AdcChannel::Pitch,
        AdcChannel::VOct,
        AdcChannel::DryWet,
        AdcChannel::Spread,
        AdcChannel::Texture,
        AdcChannel::Reverb,
    ];

    /// Scan index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Channel at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name, as used in scripts.
    pub const fn name(self) -> &'static str {
        match self {
            AdcChannel::Position => "position",
            AdcChannel::Density => "density",
            AdcChannel::Size => "size",
            AdcChannel::Feedback => "feedback",
            AdcChannel::Pitch => "pitch",
            AdcChannel::VOct => "v_oct",
            AdcChannel::DryWet => "dry_wet",
            AdcChannel::Spread => "spread",
            AdcChannel::Texture => "texture",
            AdcChannel::Reverb => "reverb",
        }
    }

    /// Parses a name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// Whether a channel reads upside down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvPolarity {
    /// Reading used as is.
    Normal,
    /// Reading replaced by `1 - x`.
    Inverted,
}

/// Whether a channel subtracts its calibrated offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvOffset {
    /// No offset correction.
    Ignore,
    /// Subtract the offset captured during calibration.
    Subtract,
}

/// Conditioning settings for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvInputConfig {
    /// Polarity correction.
    pub polarity: CvPolarity,
    /// Offset correction.
    pub offset: CvOffset,
    /// One-pole coefficient in `(0, 1]`; 1 disables smoothing.
    pub filter_coefficient: f32,
}

impl CvInputConfig {
    /// Creates a channel configuration.
    pub const fn new(polarity: CvPolarity, offset: CvOffset, filter_coefficient: f32) -> Self {
        Self {
            polarity,
            offset,
            filter_coefficient,
        }
    }
}

/// Immutable per-channel conditioning table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvInputTable {
    channels: [CvInputConfig; ADC_CHANNEL_COUNT],
}

impl CvInputTable {
    /// The shipped front-panel configuration.
    pub const DEFAULT: CvInputTable = CvInputTable::new([
        CvInputConfig::new(CvPolarity::Inverted, CvOffset::Ignore, 0.05),
        CvInputConfig::new(CvPolarity::Inverted, CvOffset::Ignore, 0.01),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.01),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.05),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.01),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 1.0),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.05),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.05),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.01),
        CvInputConfig::new(CvPolarity::Normal, CvOffset::Ignore, 0.05),
    ]);

    /// Builds a table from per-channel configs in scan order.
    pub const fn new(channels: [CvInputConfig; ADC_CHANNEL_COUNT]) -> Self {
        Self { channels }
    }

    /// Configuration of `channel`.
    #[inline]
    pub const fn get(&self, channel: AdcChannel) -> &CvInputConfig {
        &self.channels[channel as usize]
    }
}

/// Persisted calibration of the analog inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationData {
    /// V/Oct note at a zero reading, in semitones.
    pub pitch_offset: f32,
    /// Semitones per unit of V/Oct reading (negative: the jack is inverting).
    pub pitch_scale: f32,
    /// Per-channel offsets captured with nothing patched.
    pub offset: [f32; ADC_CHANNEL_COUNT],
}

impl CalibrationData {
    /// Factory pitch offset.
    pub const DEFAULT_PITCH_OFFSET: f32 = 66.67;
    /// Factory pitch scale.
    pub const DEFAULT_PITCH_SCALE: f32 = -84.26;
    /// Factory per-channel offset.
    pub const DEFAULT_OFFSET: f32 = 0.505;

    /// V/Oct note, in semitones, for a smoothed reading.
    #[inline]
    pub fn note(&self, v_oct: f32) -> f32 {
        self.pitch_offset + self.pitch_scale * v_oct
    }
}

impl Default for CalibrationData {
    fn default() -> Self {
        Self {
            pitch_offset: Self::DEFAULT_PITCH_OFFSET,
            pitch_scale: Self::DEFAULT_PITCH_SCALE,
            offset: [Self::DEFAULT_OFFSET; ADC_CHANNEL_COUNT],
        }
    }
}

/// Calibration failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// The C3 reading is not within half a unit below the C1 reading.
    OutOfRange {
        /// `c3 - c1`.
        delta: f32,
    },
    /// C3 was requested before a C1 reference was captured.
    MissingReference,
}

impl core::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CalibrationError::OutOfRange { delta } => {
                write!(f, "C3 - C1 reading delta {delta} outside (-0.5, 0)")
            }
            CalibrationError::MissingReference => write!(f, "no C1 reference captured"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CalibrationError {}

/// Solves the V/Oct mapping from readings taken at 1 V (C1) and 3 V (C3).
///
/// Returns `(pitch_offset, pitch_scale)` such that C1 maps to 12 and C3 to
/// 36 semitones.
///
/// # Errors
///
/// Returns [`CalibrationError::OutOfRange`] unless `-0.5 < c3 - c1 < 0`.
///
/// # Example
///
/// ```rust
/// use grainctl_platform::solve_pitch_calibration;
///
/// let (offset, scale) = solve_pitch_calibration(0.6, 0.4).unwrap();
/// assert!((offset + scale * 0.6 - 12.0).abs() < 1e-3);
/// assert!((offset + scale * 0.4 - 36.0).abs() < 1e-3);
/// assert!(solve_pitch_calibration(0.6, 0.6).is_err());
/// ```
pub fn solve_pitch_calibration(c1: f32, c3: f32) -> Result<(f32, f32), CalibrationError> {
    let delta = c3 - c1;
    if delta > -0.5 && delta < 0.0 {
        let scale = 24.0 / delta;
        Ok((12.0 - scale * c1, scale))
    } else {
        Err(CalibrationError::OutOfRange { delta })
    }
}

/// Per-tick analog conditioner.
#[derive(Debug, Clone)]
pub struct CvScaler {
    table: &'static CvInputTable,
    calibration: CalibrationData,
    smoothed: [OnePole; ADC_CHANNEL_COUNT],
    raw: [f32; ADC_CHANNEL_COUNT],
    pitch_table: PitchTable,
    note: f32,
    gate_line: LatencyLine<bool, ADC_LATENCY>,
    gate_raw: bool,
    previous_gate: bool,
    c1: Option<f32>,
}

impl CvScaler {
    /// Creates a scaler for `table` using `calibration`.
    pub fn new(table: &'static CvInputTable, calibration: CalibrationData) -> Self {
        let smoothed =
            core::array::from_fn(|i| OnePole::new(table.channels[i].filter_coefficient));
        Self {
            table,
            calibration,
            smoothed,
            raw: [0.0; ADC_CHANNEL_COUNT],
            pitch_table: PitchTable::new(),
            note: 0.0,
            gate_line: LatencyLine::new(),
            gate_raw: false,
            previous_gate: false,
            c1: None,
        }
    }

    /// Current calibration.
    #[inline]
    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration
    }

    /// Replaces the calibration.
    pub fn set_calibration(&mut self, calibration: CalibrationData) {
        self.calibration = calibration;
    }

    /// Conditions one frame and pushes the results into `params`.
    pub fn read(&mut self, frame: &InputFrame, params: &mut Parameters) {
        for channel in AdcChannel::ALL {
            let i = channel.index();
            let config = self.table.get(channel);
            let reading = frame.adc[i];
            self.raw[i] = reading;

            let mut value = match config.polarity {
                CvPolarity::Normal => reading,
                CvPolarity::Inverted => 1.0 - reading,
            };
            if config.offset == CvOffset::Subtract {
                value -= self.calibration.offset[i];
            }
            self.smoothed[i].process(value);
        }

        params.position.update(self.smoothed(AdcChannel::Position));
        params.texture.update(saturate(self.smoothed(AdcChannel::Texture), 0.0, 1.0));
        params.density.update(saturate(self.smoothed(AdcChannel::Density), 0.0, 1.0));
        params.size.update(saturate(self.smoothed(AdcChannel::Size), 0.0, 1.0));
        params.dry_wet.update(expand_range(self.smoothed(AdcChannel::DryWet)));
        params.reverb.update(expand_range(self.smoothed(AdcChannel::Reverb)));
        params.feedback.update(expand_range(self.smoothed(AdcChannel::Feedback)));
        params
            .stereo_spread
            .update(expand_range(self.smoothed(AdcChannel::Spread)));
        params.pitch.update(self.pitch());

        self.gate_raw = frame.gate;
        let gate = self.gate_line.process(frame.gate);
        params.gate = gate;
        params.trigger = gate && !self.previous_gate;
        self.previous_gate = gate;
    }

    fn pitch(&mut self) -> f32 {
        let transpose = self.pitch_table.lookup(self.smoothed(AdcChannel::Pitch));
        let note = self.calibration.note(self.smoothed(AdcChannel::VOct));
        if libm::fabsf(note - self.note) > NOTE_HYSTERESIS {
            self.note = note;
        } else {
            self.note += NOTE_SMOOTHING * (note - self.note);
        }
        saturate(
            transpose + self.note,
            -PITCH_RANGE_SEMITONES,
            PITCH_RANGE_SEMITONES,
        )
    }

    /// Smoothed, polarity-corrected value of `channel`.
    #[inline]
    pub fn smoothed(&self, channel: AdcChannel) -> f32 {
        self.smoothed[channel.index()].value()
    }

    /// Last unconditioned reading of `channel`.
    #[inline]
    pub fn raw(&self, channel: AdcChannel) -> f32 {
        self.raw[channel.index()]
    }

    /// Last raw reading of channel `index` scaled to a byte, 0 for unknown
    /// channels.
    pub fn adc_value(&self, index: usize) -> u8 {
        self.raw
            .get(index)
            .map_or(0, |&v| (saturate(v, 0.0, 1.0) * 255.0) as u8)
    }

    /// Undelayed gate jack level.
    #[inline]
    pub fn gate(&self) -> bool {
        self.gate_raw
    }

    /// Tracked V/Oct note in semitones.
    #[inline]
    pub fn note(&self) -> f32 {
        self.note
    }

    /// Captures the C1 reference (1 V patched) and every channel's resting
    /// reading as its offset.
    pub fn calibrate_c1(&mut self) {
        let c1 = self.raw(AdcChannel::VOct);
        self.c1 = Some(c1);
        self.calibration.offset = self.raw;
        #[cfg(feature = "tracing")]
        tracing::debug!("calibration: C1 reference {c1}");
    }

    /// Captures the C3 reading (3 V patched) and solves the pitch mapping.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::MissingReference`] if C1 was never
    /// captured, or [`CalibrationError::OutOfRange`] if the readings are
    /// implausible. The stored calibration is untouched on error.
    pub fn calibrate_c3(&mut self) -> Result<(), CalibrationError> {
        let c1 = self.c1.ok_or(CalibrationError::MissingReference)?;
        let c3 = self.raw(AdcChannel::VOct);
        let (offset, scale) = solve_pitch_calibration(c1, c3)?;
        self.calibration.pitch_offset = offset;
        self.calibration.pitch_scale = scale;
        #[cfg(feature = "tracing")]
        tracing::debug!("calibration: offset {offset} scale {scale}");
        Ok(())
    }
}
