//! Minimal frame representation consumed by filters

use std::fmt;

use crate::protocol::{Error, Result};

/// Pixel layout of a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit grayscale, 1 byte per pixel
    Gray8,
    /// RGB 8-bit per channel, 3 bytes per pixel
    Rgb24,
    /// BGR 8-bit per channel, 3 bytes per pixel
    Bgr24,
    /// RGBA 8-bit per channel, 4 bytes per pixel
    Rgba32,
}

impl PixelFormat {
    /// Bytes per pixel
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 | Self::Bgr24 => 3,
            Self::Rgba32 => 4,
        }
    }

    /// Number of leading channels carrying color, the alpha channel excluded
    #[must_use]
    pub const fn color_channels(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 | Self::Bgr24 | Self::Rgba32 => 3,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gray8 => "GRAY8",
            Self::Rgb24 => "RGB24",
            Self::Bgr24 => "BGR24",
            Self::Rgba32 => "RGBA32",
        };
        write!(f, "{name}")
    }
}

/// Raw video frame, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap pixel data, checking it matches the geometry
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = Self::expected_len(width, height, format)?;
        if data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "{width}x{height} {format} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Frame filled with a single byte value
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: u8) -> Result<Self> {
        let len = Self::expected_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![value; len],
        })
    }

    fn expected_len(width: u32, height: u32, format: PixelFormat) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or_else(|| {
                Error::InvalidFrame(format!("{width}x{height} {format} size overflows usize"))
            })
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Pixel data
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Check if two frames share width and height
    #[must_use]
    pub const fn same_geometry(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_checked() {
        assert!(Frame::new(2, 2, PixelFormat::Rgb24, vec![0; 12]).is_ok());
        assert!(matches!(
            Frame::new(2, 2, PixelFormat::Rgb24, vec![0; 11]),
            Err(Error::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_filled_frame() {
        let frame = Frame::filled(3, 2, PixelFormat::Rgba32, 7).unwrap();
        assert_eq!(frame.data().len(), 24);
        assert!(frame.data().iter().all(|b| *b == 7));
        assert!(frame.same_geometry(&Frame::filled(3, 2, PixelFormat::Gray8, 0).unwrap()));
    }

    #[test]
    fn test_oversized_geometry_rejected() {
        let result = Frame::new(u32::MAX, u32::MAX, PixelFormat::Rgba32, vec![]);
        assert!(matches!(result, Err(Error::InvalidFrame(_))));

        assert!(matches!(
            Frame::filled(u32::MAX, u32::MAX, PixelFormat::Rgb24, 0),
            Err(Error::InvalidFrame(_))
        ));
    }
}
