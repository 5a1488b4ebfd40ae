//! Factory-test request decoding.
//!
//! A request is one byte: the high 3 bits select the command, the low 5 bits
//! carry its argument. The reply is one byte.

/// A decoded factory-test request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryCommand {
    /// Raw byte reading of pot channel `n`.
    ReadPot(u8),
    /// Raw byte reading of CV channel `n`.
    ReadCv(u8),
    /// Switch `n` held for n <= 2, otherwise gate input `n - 3` (only 0 exists).
    ReadGate(u8),
    /// Force bypass on or off.
    SetBypass(bool),
    /// 0: enter Calibration-1, 1: capture C1, else capture C3 and persist.
    Calibrate(u8),
    /// Unassigned command code; replies 0.
    Unknown(u8),
}

impl FactoryCommand {
    /// Splits a request byte into command and argument.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grainctl_ui::FactoryCommand;
    ///
    /// assert_eq!(FactoryCommand::decode(0x23), FactoryCommand::ReadCv(3));
    /// assert_eq!(FactoryCommand::decode(0x61), FactoryCommand::SetBypass(true));
    /// ```
    pub fn decode(byte: u8) -> Self {
        let argument = byte & 0x1F;
        match byte >> 5 {
            0 => FactoryCommand::ReadPot(argument),
            1 => FactoryCommand::ReadCv(argument),
            2 => FactoryCommand::ReadGate(argument),
            3 => FactoryCommand::SetBypass(argument != 0),
            4 => FactoryCommand::Calibrate(argument),
            command => FactoryCommand::Unknown(command),
        }
    }
}
