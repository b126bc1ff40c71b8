//! VFilter opcodes, parameter ids and command codes

use std::fmt;

/// Envelope opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Run a filter action
    Action = 0x00,
    /// Set one scalar parameter
    SetParam = 0x01,
    /// Full parameter record block
    Params = 0x02,
}

impl Opcode {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Action),
            0x01 => Some(Self::SetParam),
            0x02 => Some(Self::Params),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Action => "Action",
            Self::SetParam => "SetParam",
            Self::Params => "Params",
        };
        write!(f, "{name}")
    }
}

/// Scalar fields of a [`VFilterParams`](super::VFilterParams) record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FilterParam {
    /// Current filter mode, usually 0 - off, 1 - on
    Mode = 1,
    /// Enhancement level, as a percentage
    Level = 2,
    /// Processing time in microseconds, read only
    ProcessingTimeMcSec = 3,
    /// Filter type, implementation defined
    Type = 4,
    /// Filter specific custom parameter
    Custom1 = 5,
    /// Filter specific custom parameter
    Custom2 = 6,
    /// Filter specific custom parameter
    Custom3 = 7,
}

impl FilterParam {
    /// Every parameter in wire order
    pub const ALL: [Self; 7] = [
        Self::Mode,
        Self::Level,
        Self::ProcessingTimeMcSec,
        Self::Type,
        Self::Custom1,
        Self::Custom2,
        Self::Custom3,
    ];

    /// Convert from a wire code
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Mode),
            2 => Some(Self::Level),
            3 => Some(Self::ProcessingTimeMcSec),
            4 => Some(Self::Type),
            5 => Some(Self::Custom1),
            6 => Some(Self::Custom2),
            7 => Some(Self::Custom3),
            _ => None,
        }
    }

    /// Convert to a wire code
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Bit selecting this field in the params bitmask byte (MSB first)
    #[must_use]
    pub const fn mask_bit(self) -> u8 {
        0x80 >> (self as i32 - 1)
    }
}

impl fmt::Display for FilterParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mode => "MODE",
            Self::Level => "LEVEL",
            Self::ProcessingTimeMcSec => "PROCESSING_TIME_MCSEC",
            Self::Type => "TYPE",
            Self::Custom1 => "CUSTOM_1",
            Self::Custom2 => "CUSTOM_2",
            Self::Custom3 => "CUSTOM_3",
        };
        write!(f, "{name}")
    }
}

/// Filter action code
///
/// Action codes belong to a filter family and are not portable between
/// families, so this is an open code rather than a closed enum. Each filter
/// declares the codes it understands as associated constants of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FilterCommand(i32);

impl FilterCommand {
    /// Wrap a raw action code
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Raw action code
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }
}

impl From<i32> for FilterCommand {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for FilterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for op in [Opcode::Action, Opcode::SetParam, Opcode::Params] {
            assert_eq!(Opcode::from_u8(op.as_u8()), Some(op));
        }
        assert_eq!(Opcode::from_u8(0x03), None);
    }

    #[test]
    fn test_param_codes() {
        for (i, param) in FilterParam::ALL.iter().enumerate() {
            assert_eq!(param.as_i32(), i as i32 + 1);
            assert_eq!(FilterParam::from_i32(param.as_i32()), Some(*param));
        }
        assert_eq!(FilterParam::from_i32(0), None);
        assert_eq!(FilterParam::from_i32(8), None);
    }

    #[test]
    fn test_mask_bits() {
        assert_eq!(FilterParam::Mode.mask_bit(), 0x80);
        assert_eq!(FilterParam::Level.mask_bit(), 0x40);
        assert_eq!(FilterParam::Type.mask_bit(), 0x10);
        assert_eq!(FilterParam::Custom3.mask_bit(), 0x02);
    }

    #[test]
    fn test_command_is_open() {
        let code = FilterCommand::from(1234);
        assert_eq!(code.code(), 1234);
        assert_eq!(code.to_string(), "1234");
    }
}
