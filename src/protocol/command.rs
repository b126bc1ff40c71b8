//! Filter command codec
//!
//! Two command shapes share the params envelope:
//!
//! ```text
//! Action:   [0x00] [MAJOR] [MINOR] [ACTION ID (i32 LE)]
//! SetParam: [0x01] [MAJOR] [MINOR] [PARAM ID (i32 LE)] [VALUE (f32 LE)]
//! ```

use bytes::{Buf, BufMut};
use tracing::trace;

use super::{
    ACTION_COMMAND_SIZE, Envelope, Error, FilterCommand, FilterParam, HEADER_SIZE, Metrics,
    Opcode, Rejection, Result, SET_PARAM_COMMAND_SIZE,
};

/// Decoded filter command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Run a filter action
    Action {
        /// Filter family specific action code
        id: FilterCommand,
    },
    /// Set one scalar parameter
    SetParam {
        /// Raw parameter code, see [`FilterParam`]
        param: i32,
        /// New value
        value: f32,
    },
}

impl Command {
    /// Build a set-param command from a known parameter
    #[must_use]
    pub const fn set_param(param: FilterParam, value: f32) -> Self {
        Self::SetParam {
            param: param.as_i32(),
            value,
        }
    }

    /// Parameter targeted by a set-param command, if the code is known
    #[must_use]
    pub fn param(&self) -> Option<FilterParam> {
        match self {
            Self::SetParam { param, .. } => FilterParam::from_i32(*param),
            Self::Action { .. } => None,
        }
    }

    /// Envelope opcode of this command
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::Action { .. } => Opcode::Action,
            Self::SetParam { .. } => Opcode::SetParam,
        }
    }

    /// Encode to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SET_PARAM_COMMAND_SIZE);
        bytes.put_slice(&Envelope::new(self.opcode()).to_bytes());
        match *self {
            Self::Action { id } => bytes.put_i32_le(id.code()),
            Self::SetParam { param, value } => {
                bytes.put_i32_le(param);
                bytes.put_f32_le(value);
            }
        }
        Metrics::record_command_encoded();
        bytes
    }

    /// Decode from bytes
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode_command(data)
    }
}

/// Encode an action command (7 bytes)
#[must_use]
pub fn encode_action(id: FilterCommand) -> [u8; ACTION_COMMAND_SIZE] {
    let mut bytes = [0u8; ACTION_COMMAND_SIZE];
    let mut out = &mut bytes[..];
    out.put_slice(&Envelope::new(Opcode::Action).to_bytes());
    out.put_i32_le(id.code());
    Metrics::record_command_encoded();
    bytes
}

/// Encode a set-param command (11 bytes)
#[must_use]
pub fn encode_set_param(param: FilterParam, value: f32) -> [u8; SET_PARAM_COMMAND_SIZE] {
    let mut bytes = [0u8; SET_PARAM_COMMAND_SIZE];
    let mut out = &mut bytes[..];
    out.put_slice(&Envelope::new(Opcode::SetParam).to_bytes());
    out.put_i32_le(param.as_i32());
    out.put_f32_le(value);
    Metrics::record_command_encoded();
    bytes
}

/// Decode an action or set-param command
///
/// # Errors
///
/// Returns an error if:
/// - Buffer is shorter than an action command
/// - Version bytes differ from the compiled version
/// - A set-param buffer is not exactly 11 bytes
/// - Opcode is not a command opcode (the params block is rejected here)
pub fn decode_command(data: &[u8]) -> Result<Command> {
    decode_inner(data).inspect_err(|err| {
        trace!(error = %err, len = data.len(), "rejected command buffer");
        Metrics::record_rejection(Rejection::from(err));
    })
}

fn decode_inner(data: &[u8]) -> Result<Command> {
    if data.len() < ACTION_COMMAND_SIZE {
        return Err(Error::TruncatedPayload {
            needed: ACTION_COMMAND_SIZE,
            got: data.len(),
        });
    }

    let envelope = Envelope::from_bytes(data)?;
    envelope.validate_version()?;

    let mut payload = &data[HEADER_SIZE..];
    let command = match envelope.opcode() {
        Some(Opcode::Action) => Command::Action {
            id: FilterCommand::new(payload.get_i32_le()),
        },
        Some(Opcode::SetParam) => {
            if data.len() != SET_PARAM_COMMAND_SIZE {
                return Err(Error::InvalidLength {
                    opcode: envelope.opcode_byte(),
                    expected: SET_PARAM_COMMAND_SIZE,
                    got: data.len(),
                });
            }
            Command::SetParam {
                param: payload.get_i32_le(),
                value: payload.get_f32_le(),
            }
        }
        Some(Opcode::Params) | None => {
            return Err(Error::UnknownOpcode {
                opcode: envelope.opcode_byte(),
            });
        }
    };

    Metrics::record_command_decoded();
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{VFILTER_MAJOR_VERSION, VFILTER_MINOR_VERSION, VFilterParams, VFilterParamsMask};

    #[test]
    fn test_encode_action_layout() {
        let bytes = encode_action(FilterCommand::new(2));
        assert_eq!(
            bytes,
            [0x00, VFILTER_MAJOR_VERSION, VFILTER_MINOR_VERSION, 2, 0, 0, 0]
        );
    }

    #[test]
    fn test_encode_set_param_layout() {
        let bytes = encode_set_param(FilterParam::Level, 42.0);
        assert_eq!(bytes.len(), 11);
        assert_eq!(&bytes[..3], &[0x01, VFILTER_MAJOR_VERSION, VFILTER_MINOR_VERSION]);
        assert_eq!(&bytes[3..7], &2i32.to_le_bytes());
        assert_eq!(&bytes[7..11], &42.0f32.to_le_bytes());
    }

    #[test]
    fn test_decode_action() {
        let bytes = encode_action(FilterCommand::new(-5));
        assert_eq!(
            decode_command(&bytes).unwrap(),
            Command::Action {
                id: FilterCommand::new(-5)
            }
        );
    }

    #[test]
    fn test_decode_set_param() {
        let bytes = encode_set_param(FilterParam::Custom2, -0.5);
        let command = decode_command(&bytes).unwrap();
        assert_eq!(command, Command::set_param(FilterParam::Custom2, -0.5));
        assert_eq!(command.param(), Some(FilterParam::Custom2));
    }

    #[test]
    fn test_command_encode_matches_free_functions() {
        let action = Command::Action {
            id: FilterCommand::new(3),
        };
        assert_eq!(action.encode(), encode_action(FilterCommand::new(3)).to_vec());

        let set = Command::set_param(FilterParam::Mode, 1.0);
        assert_eq!(set.encode(), encode_set_param(FilterParam::Mode, 1.0).to_vec());
        assert_eq!(Command::decode(&set.encode()).unwrap(), set);
    }

    #[test]
    fn test_decode_too_short() {
        let bytes = encode_action(FilterCommand::new(1));
        assert!(matches!(
            decode_command(&bytes[..6]),
            Err(Error::TruncatedPayload { needed: 7, got: 6 })
        ));
        assert!(decode_command(&[]).is_err());
    }

    #[test]
    fn test_decode_version_mismatch() {
        let mut bytes = encode_set_param(FilterParam::Level, 1.0);
        bytes[1] = bytes[1].wrapping_add(1);
        assert!(matches!(
            decode_command(&bytes),
            Err(Error::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_set_param_requires_exact_length() {
        let bytes = encode_set_param(FilterParam::Level, 1.0);
        for len in 7..11 {
            assert!(matches!(
                decode_command(&bytes[..len]),
                Err(Error::InvalidLength { expected: 11, .. })
            ));
        }

        let mut long = bytes.to_vec();
        long.push(0);
        assert!(matches!(
            decode_command(&long),
            Err(Error::InvalidLength { got: 12, .. })
        ));
    }

    #[test]
    fn test_action_ignores_trailing_bytes() {
        let mut bytes = encode_action(FilterCommand::new(1)).to_vec();
        bytes.extend_from_slice(&[0xFF; 4]);
        assert!(matches!(decode_command(&bytes), Ok(Command::Action { .. })));
    }

    #[test]
    fn test_params_block_rejected() {
        let bytes = VFilterParams::default()
            .encode(&VFilterParamsMask::all(), 64)
            .unwrap();
        assert!(matches!(
            decode_command(&bytes),
            Err(Error::UnknownOpcode { opcode: 0x02 })
        ));
    }

    #[test]
    fn test_unknown_opcode() {
        let mut bytes = encode_action(FilterCommand::new(1));
        bytes[0] = 0x7F;
        assert!(matches!(
            decode_command(&bytes),
            Err(Error::UnknownOpcode { opcode: 0x7F })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn param_strategy() -> impl Strategy<Value = FilterParam> {
            prop::sample::select(FilterParam::ALL.to_vec())
        }

        proptest! {
            /// Property: any action code decodes back to an action
            #[test]
            fn prop_action_classified(code in any::<i32>()) {
                let bytes = encode_action(FilterCommand::new(code));
                prop_assert_eq!(
                    decode_command(&bytes).unwrap(),
                    Command::Action { id: FilterCommand::new(code) }
                );
            }

            /// Property: any set-param value survives bit for bit
            #[test]
            fn prop_set_param_roundtrip(param in param_strategy(), bits in any::<u32>()) {
                let value = f32::from_bits(bits);
                let bytes = encode_set_param(param, value);
                match decode_command(&bytes).unwrap() {
                    Command::SetParam { param: code, value: decoded } => {
                        prop_assert_eq!(code, param.as_i32());
                        prop_assert_eq!(decoded.to_bits(), bits);
                    }
                    Command::Action { .. } => prop_assert!(false, "classified as action"),
                }
            }

            /// Property: set-param buffers of any other length are rejected
            #[test]
            fn prop_set_param_length_guard(extra in prop::collection::vec(any::<u8>(), 0..32), cut in 0usize..5) {
                let bytes = encode_set_param(FilterParam::Level, 42.0);
                let mut data = bytes[..11 - cut].to_vec();
                if cut == 0 {
                    prop_assume!(!extra.is_empty());
                    data.extend_from_slice(&extra);
                }
                prop_assert!(decode_command(&data).is_err());
            }
        }
    }
}
