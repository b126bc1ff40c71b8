//! VFilter wire protocol
//!
//! This module provides the envelope, parameter record codec, and command
//! codec shared by every filter implementation.

mod command;
mod error;
mod header;
mod metrics;
mod params;
mod types;

pub use command::{Command, decode_command, encode_action, encode_set_param};
pub use error::{Error, Result};
pub use header::Envelope;
pub use metrics::CodecStats;
pub(crate) use metrics::{Metrics, Rejection};
pub use params::{VFilterParams, VFilterParamsMask};
pub use types::{FilterCommand, FilterParam, Opcode};

/// Major protocol version written into every envelope
pub const VFILTER_MAJOR_VERSION: u8 = 1;

/// Minor protocol version written into every envelope
pub const VFILTER_MINOR_VERSION: u8 = 1;

/// Envelope size in bytes (opcode + major + minor)
pub const HEADER_SIZE: usize = 3;

/// Size of one encoded parameter field
pub const FIELD_SIZE: usize = 4;

/// Number of fields in a parameter record
pub const PARAM_COUNT: usize = 7;

/// Encoded action command size
pub const ACTION_COMMAND_SIZE: usize = HEADER_SIZE + FIELD_SIZE;

/// Encoded set-param command size
pub const SET_PARAM_COMMAND_SIZE: usize = HEADER_SIZE + 2 * FIELD_SIZE;

/// Largest encoded parameter record (envelope + bitmask + all fields)
pub const MAX_PARAMS_SIZE: usize = HEADER_SIZE + 1 + PARAM_COUNT * FIELD_SIZE;
