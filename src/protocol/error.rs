//! VFilter error types

use thiserror::Error;

/// VFilter protocol and interface errors
#[derive(Error, Debug)]
pub enum Error {
    /// Version bytes do not match the compiled protocol version
    #[error("version mismatch: expected {expected_major}.{expected_minor}, got {found_major}.{found_minor}")]
    VersionMismatch {
        /// Compiled major version
        expected_major: u8,
        /// Compiled minor version
        expected_minor: u8,
        /// Major version found in the buffer
        found_major: u8,
        /// Minor version found in the buffer
        found_minor: u8,
    },

    /// Destination buffer too small for the encoded data
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Input ended before the declared payload was read
    #[error("truncated payload: need {needed} bytes, got {got}")]
    TruncatedPayload {
        /// Bytes required to finish decoding
        needed: usize,
        /// Bytes available
        got: usize,
    },

    /// Opcode not valid for the decoder that received it
    #[error("unknown opcode: {opcode:#04x}")]
    UnknownOpcode {
        /// Opcode byte
        opcode: u8,
    },

    /// Buffer length not allowed for its opcode
    #[error("invalid length for opcode {opcode:#04x}: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Opcode byte
        opcode: u8,
        /// Exact length required
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Action code not recognized by the filter
    #[error("unsupported command: {code}")]
    UnsupportedCommand {
        /// Raw action code
        code: i32,
    },

    /// Parameter code outside the known parameter set, or refused by the filter
    #[error("unsupported parameter: {code}")]
    UnsupportedParam {
        /// Raw parameter code
        code: i32,
    },

    /// Frame geometry does not match its pixel data
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Configuration could not be parsed
    #[cfg(feature = "config")]
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
