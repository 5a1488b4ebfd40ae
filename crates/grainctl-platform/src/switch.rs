//! Shift-register switch debouncing.
//!
//! Each switch keeps the last eight pin samples in a byte. A transition is
//! reported only on the exact tick the history becomes one fresh sample of
//! the new level followed by seven samples of the old one, so contact bounce
//! shorter than seven ticks never produces an edge.

use crate::SwitchId;

/// Number of front-panel switches.
pub const NUM_SWITCHES: usize = 4;

/// Debounce history at power-up (pin high = released).
const HISTORY_RELEASED: u8 = 0xFF;
/// History on the tick a press is recognized.
const HISTORY_JUST_PRESSED: u8 = 0x80;
/// History on the tick a release is recognized.
const HISTORY_JUST_RELEASED: u8 = 0x7F;
/// History while stably held.
const HISTORY_HELD: u8 = 0x00;

/// Press classification of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwitchState {
    /// Not held, or released and already reported.
    #[default]
    Released,
    /// Held for less than the long-press threshold.
    Pressed,
    /// Held past the long-press threshold.
    LongPressed,
    /// Held past the very-long-press threshold.
    VeryLongPressed,
}

impl SwitchState {
    /// Lowercase name for logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            SwitchState::Released => "released",
            SwitchState::Pressed => "pressed",
            SwitchState::LongPressed => "long_pressed",
            SwitchState::VeryLongPressed => "very_long_pressed",
        }
    }
}

/// One debounced momentary switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    history: u8,
    state: SwitchState,
    press_time: Option<u32>,
}

impl Switch {
    /// A released switch with a settled history.
    pub const fn new() -> Self {
        Self {
            history: HISTORY_RELEASED,
            state: SwitchState::Released,
            press_time: None,
        }
    }

    /// Shifts one pin sample into the history. `level` is the raw pin level
    /// (`true` = high = released).
    #[inline]
    pub fn scan(&mut self, level: bool) {
        self.history = (self.history << 1) | u8::from(level);
    }

    /// Fills the history with `level` without reporting an edge. A switch
    /// settled low stays Released, so its eventual release is ignored.
    pub fn settle(&mut self, level: bool) {
        self.history = if level { HISTORY_RELEASED } else { HISTORY_HELD };
        self.reset();
    }

    /// True on the single tick the pin settles low.
    #[inline]
    pub const fn just_pressed(&self) -> bool {
        self.history == HISTORY_JUST_PRESSED
    }

    /// True on the single tick the pin settles high.
    #[inline]
    pub const fn just_released(&self) -> bool {
        self.history == HISTORY_JUST_RELEASED
    }

    /// True while the last eight samples were all low.
    #[inline]
    pub const fn pressed(&self) -> bool {
        self.history == HISTORY_HELD
    }

    /// Raw debounce history, most recent sample in bit 0.
    #[inline]
    pub const fn history(&self) -> u8 {
        self.history
    }

    /// Current press classification.
    #[inline]
    pub const fn state(&self) -> SwitchState {
        self.state
    }

    /// Overrides the press classification.
    #[inline]
    pub fn set_state(&mut self, state: SwitchState) {
        self.state = state;
    }

    /// Tick at which the current press began, `None` while released.
    #[inline]
    pub const fn press_time(&self) -> Option<u32> {
        self.press_time
    }

    /// Milliseconds since the press began, 0 while released.
    #[inline]
    pub fn held_for(&self, now: u32) -> u32 {
        self.press_time.map_or(0, |t| now.wrapping_sub(t))
    }

    /// Records a new press at `now`.
    pub fn capture_press(&mut self, now: u32) {
        self.press_time = Some(now);
        self.state = SwitchState::Pressed;
    }

    /// Returns to Released and forgets the press time.
    pub fn reset(&mut self) {
        self.press_time = None;
        self.state = SwitchState::Released;
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}

/// The bank of front-panel switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Switches {
    switches: [Switch; NUM_SWITCHES],
}

impl Switches {
    /// All switches released.
    pub const fn new() -> Self {
        Self {
            switches: [Switch::new(); NUM_SWITCHES],
        }
    }

    /// Scans every switch with its pin level. `levels` is indexed by
    /// [`SwitchId::index`].
    pub fn scan(&mut self, levels: &[bool; NUM_SWITCHES]) {
        for (switch, &level) in self.switches.iter_mut().zip(levels) {
            switch.scan(level);
        }
    }

    /// Settles every switch to its current pin level. Used once at startup.
    pub fn settle(&mut self, levels: &[bool; NUM_SWITCHES]) {
        for (switch, &level) in self.switches.iter_mut().zip(levels) {
            switch.settle(level);
        }
    }

    /// Reads a raw pin level without debouncing. Used once at startup.
    #[inline]
    pub fn pressed_immediate(levels: &[bool; NUM_SWITCHES], id: SwitchId) -> bool {
        !levels[id.index()]
    }

    /// Shared access to one switch.
    #[inline]
    pub fn get(&self, id: SwitchId) -> &Switch {
        &self.switches[id.index()]
    }

    /// Mutable access to one switch.
    #[inline]
    pub fn get_mut(&mut self, id: SwitchId) -> &mut Switch {
        &mut self.switches[id.index()]
    }

    /// Bitmask of switches whose state is not Released.
    pub fn active_mask(&self) -> u8 {
        SwitchId::ALL
            .iter()
            .filter(|&&id| self.get(id).state() != SwitchState::Released)
            .fold(0, |mask, id| mask | id.mask())
    }

    /// Iterates `(id, switch)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SwitchId, &Switch)> {
        SwitchId::ALL.iter().map(move |&id| (id, self.get(id)))
    }

    /// Applies `f` to every switch whose bit is set in `mask`.
    pub fn for_each_in_mask(&mut self, mask: u8, mut f: impl FnMut(&mut Switch)) {
        for id in SwitchId::ALL {
            if mask & id.mask() != 0 {
                f(self.get_mut(id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(switch: &mut Switch, levels: &[bool]) -> (usize, usize) {
        let mut presses = 0;
        let mut releases = 0;
        for &level in levels {
            switch.scan(level);
            presses += usize::from(switch.just_pressed());
            releases += usize::from(switch.just_released());
        }
        (presses, releases)
    }

    #[test]
    fn test_initial_state() {
        let s = Switch::new();
        assert_eq!(s.history(), 0xFF);
        assert_eq!(s.state(), SwitchState::Released);
        assert_eq!(s.press_time(), None);
        assert!(!s.pressed());
    }

    #[test]
    fn test_press_recognized_after_first_low_sample() {
        let mut s = Switch::new();
        s.scan(false);
        assert!(!s.just_pressed());
        // 0xFF shifted in low samples: 0xFE, 0xFC, ... 0x80 after 7 lows
        for _ in 0..6 {
            s.scan(false);
        }
        assert_eq!(s.history(), 0x80);
        assert!(s.just_pressed());
        s.scan(false);
        assert!(!s.just_pressed());
        assert!(s.pressed());
    }

    #[test]
    fn test_release_edge() {
        let mut s = Switch::new();
        for _ in 0..8 {
            s.scan(false);
        }
        assert!(s.pressed());
        s.scan(true);
        assert_eq!(s.history(), 0x01);
        assert!(!s.just_released());
        for _ in 0..6 {
            s.scan(true);
        }
        assert!(s.just_released());
    }

    #[test]
    fn test_bounce_suppressed() {
        let mut s = Switch::new();
        let bouncy = [false, true, false, true, false, false, true, true, true];
        let (presses, releases) = feed(&mut s, &bouncy);
        assert_eq!(presses, 0);
        assert_eq!(releases, 0);
    }

    #[test]
    fn test_single_press_release_cycle() {
        let mut s = Switch::new();
        let mut levels = [true; 40];
        for level in &mut levels[5..25] {
            *level = false;
        }
        assert_eq!(feed(&mut s, &levels), (1, 1));
    }

    #[test]
    fn test_capture_and_reset() {
        let mut s = Switch::new();
        s.capture_press(120);
        assert_eq!(s.state(), SwitchState::Pressed);
        assert_eq!(s.press_time(), Some(120));
        assert_eq!(s.held_for(1120), 1000);
        s.reset();
        assert_eq!(s.state(), SwitchState::Released);
        assert_eq!(s.held_for(5000), 0);
    }

    #[test]
    fn test_active_mask() {
        let mut bank = Switches::new();
        bank.get_mut(SwitchId::Freeze).capture_press(0);
        bank.get_mut(SwitchId::Bypass).set_state(SwitchState::LongPressed);
        assert_eq!(bank.active_mask(), 0b1100);
        bank.for_each_in_mask(0b1100, Switch::reset);
        assert_eq!(bank.active_mask(), 0);
    }

    #[test]
    fn test_settled_hold_release_is_silent() {
        let mut s = Switch::new();
        s.settle(false);
        assert!(s.pressed());
        assert_eq!(s.state(), SwitchState::Released);
        let (presses, releases) = feed(&mut s, &[true; 10]);
        assert_eq!(presses, 0);
        // the edge is still visible; the classifier ignores it for a Released switch
        assert_eq!(releases, 1);
        assert_eq!(s.state(), SwitchState::Released);
    }

    #[test]
    fn test_pressed_immediate() {
        let mut levels = [true; NUM_SWITCHES];
        assert!(!Switches::pressed_immediate(&levels, SwitchId::Write));
        levels[SwitchId::Write.index()] = false;
        assert!(Switches::pressed_immediate(&levels, SwitchId::Write));
    }
}
