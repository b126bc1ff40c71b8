//! VFilter wire envelope
//!
//! Every encoded buffer starts with the same 3-byte envelope.

use super::{Error, HEADER_SIZE, Opcode, Result, VFILTER_MAJOR_VERSION, VFILTER_MINOR_VERSION};

/// Opcode and protocol version prefix
///
/// # Wire Format
///
/// ```text
/// +--------+--------+--------+------------------------
/// | Opcode | Major  | Minor  | Opcode specific payload
/// +--------+--------+--------+------------------------
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    opcode: u8,
    major: u8,
    minor: u8,
}

impl Envelope {
    /// Create an envelope stamped with the compiled protocol version
    #[must_use]
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode: opcode.as_u8(),
            major: VFILTER_MAJOR_VERSION,
            minor: VFILTER_MINOR_VERSION,
        }
    }

    /// Get opcode byte
    #[must_use]
    pub const fn opcode_byte(&self) -> u8 {
        self.opcode
    }

    /// Get opcode
    #[must_use]
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode)
    }

    /// Get major version
    #[must_use]
    pub const fn major(&self) -> u8 {
        self.major
    }

    /// Get minor version
    #[must_use]
    pub const fn minor(&self) -> u8 {
        self.minor
    }

    /// Check the version bytes against the compiled version (strict equality)
    pub fn validate_version(&self) -> Result<()> {
        if self.major != VFILTER_MAJOR_VERSION || self.minor != VFILTER_MINOR_VERSION {
            return Err(Error::VersionMismatch {
                expected_major: VFILTER_MAJOR_VERSION,
                expected_minor: VFILTER_MINOR_VERSION,
                found_major: self.major,
                found_minor: self.minor,
            });
        }
        Ok(())
    }

    /// Convert to bytes
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        [self.opcode, self.major, self.minor]
    }

    /// Parse from bytes without validating opcode or version
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::TruncatedPayload {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        Ok(Self {
            opcode: bytes[0],
            major: bytes[1],
            minor: bytes[2],
        })
    }
}
