//! Parameter record and its selective codec
//!
//! # Format
//!
//! ```text
//! [0x02] [MAJOR] [MINOR] [BITMASK] [FIELD (4 bytes)]...
//! ```
//!
//! Bitmask bits are read MSB first in field order: mode, level,
//! processingTimeMcSec, type, custom1, custom2, custom3. The lowest bit is
//! unused. Every field is little-endian.

use bytes::{Buf, BufMut};
use tracing::trace;

use super::{
    Envelope, Error, FIELD_SIZE, FilterParam, HEADER_SIZE, MAX_PARAMS_SIZE, Metrics, Opcode,
    Rejection, Result,
};

/// Offset of the bitmask byte in an encoded record
const BITMASK_OFFSET: usize = HEADER_SIZE;

/// Offset of the first field in an encoded record
const FIELDS_OFFSET: usize = HEADER_SIZE + 1;

/// Video filter parameters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct VFilterParams {
    /// Current filter mode, usually 0 - off, 1 - on.
    pub mode: i32,
    /// Enhancement level for the particular filter, as a percentage in range
    /// from 0% to 100%.
    pub level: i32,
    /// Processing time in microseconds. Written by the filter, read only for
    /// controllers.
    pub processing_time_mc_sec: i32,
    /// Type of the filter. Depends on the implementation.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub filter_type: i32,
    /// Custom parameter with filter specific meaning.
    pub custom1: f32,
    /// Custom parameter with filter specific meaning.
    pub custom2: f32,
    /// Custom parameter with filter specific meaning.
    pub custom3: f32,
}

/// Selects which fields [`VFilterParams::encode`] emits
///
/// Has no effect on decoding, which follows the bitmask embedded in the
/// received buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct VFilterParamsMask {
    /// Include `mode`
    pub mode: bool,
    /// Include `level`
    pub level: bool,
    /// Include `processing_time_mc_sec`
    pub processing_time_mc_sec: bool,
    /// Include `filter_type`
    pub filter_type: bool,
    /// Include `custom1`
    pub custom1: bool,
    /// Include `custom2`
    pub custom2: bool,
    /// Include `custom3`
    pub custom3: bool,
}

impl Default for VFilterParamsMask {
    fn default() -> Self {
        Self::all()
    }
}

impl VFilterParamsMask {
    /// Select every field
    #[must_use]
    pub const fn all() -> Self {
        Self {
            mode: true,
            level: true,
            processing_time_mc_sec: true,
            filter_type: true,
            custom1: true,
            custom2: true,
            custom3: true,
        }
    }

    /// Select no field
    #[must_use]
    pub const fn none() -> Self {
        Self {
            mode: false,
            level: false,
            processing_time_mc_sec: false,
            filter_type: false,
            custom1: false,
            custom2: false,
            custom3: false,
        }
    }

    /// Check if a field is selected
    #[must_use]
    pub const fn contains(&self, param: FilterParam) -> bool {
        match param {
            FilterParam::Mode => self.mode,
            FilterParam::Level => self.level,
            FilterParam::ProcessingTimeMcSec => self.processing_time_mc_sec,
            FilterParam::Type => self.filter_type,
            FilterParam::Custom1 => self.custom1,
            FilterParam::Custom2 => self.custom2,
            FilterParam::Custom3 => self.custom3,
        }
    }

    /// Select or deselect a field
    #[must_use]
    pub const fn with(mut self, param: FilterParam, selected: bool) -> Self {
        match param {
            FilterParam::Mode => self.mode = selected,
            FilterParam::Level => self.level = selected,
            FilterParam::ProcessingTimeMcSec => self.processing_time_mc_sec = selected,
            FilterParam::Type => self.filter_type = selected,
            FilterParam::Custom1 => self.custom1 = selected,
            FilterParam::Custom2 => self.custom2 = selected,
            FilterParam::Custom3 => self.custom3 = selected,
        }
        self
    }

    /// Bitmask byte as written on the wire
    #[must_use]
    pub fn bits(&self) -> u8 {
        FilterParam::ALL
            .iter()
            .filter(|param| self.contains(**param))
            .fold(0u8, |bits, param| bits | param.mask_bit())
    }

    /// Build a mask from a wire bitmask byte (unused low bit ignored)
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        FilterParam::ALL.iter().fold(Self::none(), |mask, param| {
            mask.with(*param, bits & param.mask_bit() != 0)
        })
    }

    /// Number of selected fields
    #[must_use]
    pub fn count(&self) -> usize {
        FilterParam::ALL
            .iter()
            .filter(|param| self.contains(**param))
            .count()
    }

    /// Encoded size of a record under this mask
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FIELDS_OFFSET + self.count() * FIELD_SIZE
    }
}

impl VFilterParams {
    /// Read one field, integers widened to `f32`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, param: FilterParam) -> f32 {
        match param {
            FilterParam::Mode => self.mode as f32,
            FilterParam::Level => self.level as f32,
            FilterParam::ProcessingTimeMcSec => self.processing_time_mc_sec as f32,
            FilterParam::Type => self.filter_type as f32,
            FilterParam::Custom1 => self.custom1,
            FilterParam::Custom2 => self.custom2,
            FilterParam::Custom3 => self.custom3,
        }
    }

    /// Write one field, truncating toward zero for integer fields
    #[allow(clippy::cast_possible_truncation)]
    pub fn set(&mut self, param: FilterParam, value: f32) {
        match param {
            FilterParam::Mode => self.mode = value as i32,
            FilterParam::Level => self.level = value as i32,
            FilterParam::ProcessingTimeMcSec => self.processing_time_mc_sec = value as i32,
            FilterParam::Type => self.filter_type = value as i32,
            FilterParam::Custom1 => self.custom1 = value,
            FilterParam::Custom2 => self.custom2 = value,
            FilterParam::Custom3 => self.custom3 = value,
        }
    }

    /// Encode the selected fields
    ///
    /// `capacity` is the room the caller has for the result; encoding fails
    /// with [`Error::BufferTooSmall`] when the selected fields do not fit.
    pub fn encode(&self, mask: &VFilterParamsMask, capacity: usize) -> Result<Vec<u8>> {
        let needed = mask.encoded_len();
        if capacity < needed {
            Metrics::record_rejection(Rejection::BufferTooSmall);
            return Err(Error::BufferTooSmall {
                needed,
                got: capacity,
            });
        }

        let mut bytes = Vec::with_capacity(needed);
        self.write_fields(&mut bytes, mask);
        Metrics::record_params_encoded();
        Ok(bytes)
    }

    /// Encode the selected fields into `buf`, returning the encoded size
    ///
    /// `buf` is left untouched when it is too small.
    pub fn encode_into(&self, buf: &mut [u8], mask: &VFilterParamsMask) -> Result<usize> {
        let needed = mask.encoded_len();
        if buf.len() < needed {
            Metrics::record_rejection(Rejection::BufferTooSmall);
            return Err(Error::BufferTooSmall {
                needed,
                got: buf.len(),
            });
        }

        let mut cursor = &mut buf[..needed];
        self.write_fields(&mut cursor, mask);
        Metrics::record_params_encoded();
        Ok(needed)
    }

    fn write_fields<B: BufMut>(&self, out: &mut B, mask: &VFilterParamsMask) {
        out.put_slice(&Envelope::new(Opcode::Params).to_bytes());
        out.put_u8(mask.bits());

        let ints = [
            (mask.mode, self.mode),
            (mask.level, self.level),
            (mask.processing_time_mc_sec, self.processing_time_mc_sec),
            (mask.filter_type, self.filter_type),
        ];
        for (_, value) in ints.iter().filter(|(selected, _)| *selected) {
            out.put_i32_le(*value);
        }

        let floats = [
            (mask.custom1, self.custom1),
            (mask.custom2, self.custom2),
            (mask.custom3, self.custom3),
        ];
        for (_, value) in floats.iter().filter(|(selected, _)| *selected) {
            out.put_f32_le(*value);
        }
    }

    /// Decode a parameter record
    ///
    /// Fields absent from the embedded bitmask decode to zero. Bytes after the
    /// last declared field are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than envelope + bitmask
    /// - Opcode is not the params opcode
    /// - Version bytes differ from the compiled version
    /// - Buffer ends before every declared field is read
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_inner(data).inspect_err(|err| {
            trace!(error = %err, len = data.len(), "rejected params buffer");
            Metrics::record_rejection(Rejection::from(err));
        })
    }

    /// Decode into `self`, leaving it unchanged on failure
    pub fn decode_into(&mut self, data: &[u8]) -> Result<()> {
        *self = Self::decode(data)?;
        Ok(())
    }

    fn decode_inner(data: &[u8]) -> Result<Self> {
        if data.len() < FIELDS_OFFSET {
            return Err(Error::TruncatedPayload {
                needed: FIELDS_OFFSET,
                got: data.len(),
            });
        }

        let envelope = Envelope::from_bytes(data)?;
        if envelope.opcode() != Some(Opcode::Params) {
            return Err(Error::UnknownOpcode {
                opcode: envelope.opcode_byte(),
            });
        }
        envelope.validate_version()?;

        let mask = VFilterParamsMask::from_bits(data[BITMASK_OFFSET]);
        let needed = mask.encoded_len();
        if data.len() < needed {
            return Err(Error::TruncatedPayload {
                needed,
                got: data.len(),
            });
        }

        let mut payload = &data[FIELDS_OFFSET..needed];
        let mut params = Self::default();
        if mask.mode {
            params.mode = payload.get_i32_le();
        }
        if mask.level {
            params.level = payload.get_i32_le();
        }
        if mask.processing_time_mc_sec {
            params.processing_time_mc_sec = payload.get_i32_le();
        }
        if mask.filter_type {
            params.filter_type = payload.get_i32_le();
        }
        if mask.custom1 {
            params.custom1 = payload.get_f32_le();
        }
        if mask.custom2 {
            params.custom2 = payload.get_f32_le();
        }
        if mask.custom3 {
            params.custom3 = payload.get_f32_le();
        }

        Metrics::record_params_decoded();
        Ok(params)
    }
}

const _: () = assert!(MAX_PARAMS_SIZE == FIELDS_OFFSET + 7 * FIELD_SIZE);
