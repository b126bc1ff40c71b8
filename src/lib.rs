//! VFilter - pluggable video filter interface and its binary control protocol
//!
//! This library defines the contract a video filter implements and the wire
//! format controllers use to configure it remotely: a selective codec for the
//! 7-field parameter record and a codec for action / set-param commands.
//!
//! # Quick Start
//!
//! ```rust
//! use vfilter::{CustomVFilter, FilterParam, VFilter, encode_set_param};
//!
//! let filter = CustomVFilter::new();
//!
//! // Controller side: build a command
//! let command = encode_set_param(FilterParam::Level, 42.0);
//!
//! // Filter side: decode and dispatch it
//! assert!(filter.decode_and_execute_command(&command));
//! assert_eq!(filter.get_param(FilterParam::Level), 42.0);
//! ```
//!
//! # Features
//!
//! - **Selective encoding** - a bitmask chooses which record fields are sent
//! - **Strict version guard** - buffers from another protocol version are refused
//! - **All-or-nothing dispatch** - a command is applied only if it fully decodes
//! - **JSON defaults** - `config` feature loads records from JSON

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[cfg(feature = "config")]
pub mod config;
pub mod filter;
pub mod protocol;

pub use filter::{
    CustomVFilter, FilterFactory, FilterRegistry, Frame, ParamStore, PixelFormat, VFilter,
};
pub use protocol::{
    CodecStats, Command, Error, FilterCommand, FilterParam, MAX_PARAMS_SIZE, Result,
    VFILTER_MAJOR_VERSION, VFILTER_MINOR_VERSION, VFilterParams, VFilterParamsMask,
    decode_command, encode_action, encode_set_param,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library version as "Major.Minor.Patch"
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
