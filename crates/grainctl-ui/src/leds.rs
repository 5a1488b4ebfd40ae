//! Mode-dependent LED rendering.
//!
//! Every pattern is a pure function of the tick clock, so the same clock
//! value always produces the same [`LedFrame`].
//!
//! | Mode | Pattern |
//! |---|---|
//! | Splash | one LED fading, rotating right to left |
//! | VU-Meter | level bar from the output peak |
//! | Quality | quality LED solid red |
//! | Playback-Mode | mode LED fading between colours, blinking |
//! | Load / Save | bank colour, cursor LED flashing |
//! | Saving | cursor LED solid red |
//! | Calibration-1 / 2 | two / four LEDs blinking together |
//! | Panic | all LEDs solid red |

use grainctl_config::PresetLocation;
use grainctl_platform::{LedFrame, NUM_STATUS_LEDS};

use crate::{Processor, UiMode};

/// Lowest level shown on the bar, in dBFS.
const BAR_FLOOR_DB: f32 = -60.0;

/// Clock-derived animation phases for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phases {
    blink: bool,
    flash: bool,
    slow_flash: bool,
    fade: u8,
    slow_fade: u8,
}

impl Phases {
    fn at(clock: u32) -> Self {
        Self {
            blink: (clock & 0xFF) > 64,
            flash: (clock & 0x1FF) < 16,
            slow_flash: (clock & 0x3FF) < 16,
            fade: triangle(clock >> 1),
            slow_fade: triangle(clock >> 2),
        }
    }
}

/// Squared triangle wave over one 256-step period.
fn triangle(phase: u32) -> u8 {
    let x = (phase & 0xFF) as i32;
    let linear = (2 * (x - 128)).unsigned_abs().min(255);
    ((linear * linear) >> 8) as u8
}

/// Renders the LEDs for `mode` at tick `clock`.
pub fn paint<P: Processor + ?Sized>(
    mode: UiMode,
    clock: u32,
    processor: &P,
    cursor: PresetLocation,
) -> LedFrame {
    let mut frame = LedFrame::new();
    let phases = Phases::at(clock);
    frame.enabled = !processor.bypass();

    match mode {
        UiMode::Splash => splash(&mut frame, clock),
        UiMode::VuMeter => {
            let peak = if processor.bypass() { 0.0 } else { processor.peak() };
            paint_bar(&mut frame, peak);
        }
        UiMode::Quality => {
            frame.set_status(usize::from(processor.quality()), 255, 0);
        }
        UiMode::PlaybackMode => {
            if !phases.blink {
                let index = usize::from(processor.playback_mode().index());
                let red = 128 + (phases.fade >> 1);
                let green = 255 - (phases.fade >> 1);
                if index < NUM_STATUS_LEDS {
                    frame.set_status(index, red, green);
                } else {
                    for i in 0..NUM_STATUS_LEDS {
                        frame.set_status(i, red, green);
                    }
                    frame.set_status(index % NUM_STATUS_LEDS, 0, 0);
                }
            }
        }
        UiMode::Load => browse(&mut frame, cursor, phases.slow_fade, phases.slow_flash, false),
        UiMode::Save => browse(&mut frame, cursor, phases.slow_fade, phases.slow_flash, true),
        UiMode::Saving => frame.set_status(usize::from(cursor.slot), 255, 0),
        UiMode::Calibration1 => blink_first(&mut frame, 2, phases.blink),
        UiMode::Calibration2 => blink_first(&mut frame, NUM_STATUS_LEDS, phases.blink),
        UiMode::Panic => {
            for i in 0..NUM_STATUS_LEDS {
                frame.set_status(i, 255, 0);
            }
        }
    }

    let mut freeze = processor.frozen();
    if processor.reversed() {
        freeze ^= phases.flash;
    }
    frame.freeze = freeze;
    frame
}

fn splash(frame: &mut LedFrame, clock: u32) {
    let index = (((clock >> 8) + 1) & 3) as usize;
    let step = (clock >> 2) as u8;
    let fade = if step <= 127 {
        step << 1
    } else {
        255 - (step << 1)
    };
    frame.set_intensity(NUM_STATUS_LEDS - 1 - index, fade);
}

/// Lights the bar proportionally to `peak` on a dB scale.
fn paint_bar(frame: &mut LedFrame, peak: f32) {
    if peak <= 0.0 {
        return;
    }
    let db = 20.0 * peak.log10();
    let level = ((db - BAR_FLOOR_DB) / -BAR_FLOOR_DB).clamp(0.0, 1.0) * NUM_STATUS_LEDS as f32;
    for i in 0..NUM_STATUS_LEDS {
        let segment = (level - i as f32).clamp(0.0, 1.0);
        frame.set_status(i, 0, (segment * 255.0) as u8);
    }
}

/// Bank colour: bank 0 red, bank 1 green, bank 2 both.
fn bank_colour(bank: u8) -> (u8, u8) {
    let red = if bank & 1 != 0 { 0 } else { 255 };
    let green = if bank & 3 != 0 { 255 } else { 0 };
    (red, green)
}

/// Load: every LED fades in the bank colour and the cursor flashes.
/// Save swaps the two patterns.
fn browse(frame: &mut LedFrame, cursor: PresetLocation, fade: u8, flash: bool, save: bool) {
    let (red, green) = bank_colour(cursor.bank);
    let faded = (fade & red, fade & green);
    let flashed = if flash { (red, green) } else { (0, 0) };
    let (background, highlight) = if save { (flashed, faded) } else { (faded, flashed) };
    for i in 0..NUM_STATUS_LEDS {
        frame.set_status(i, background.0, background.1);
    }
    frame.set_status(usize::from(cursor.slot), highlight.0, highlight.1);
}

fn blink_first(frame: &mut LedFrame, count: usize, blink: bool) {
    let value = if blink { 255 } else { 0 };
    for i in 0..count {
        frame.set_intensity(i, value);
    }
}
