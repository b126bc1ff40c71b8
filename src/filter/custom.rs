//! Reference filter implementation
//!
//! Serves as the template for concrete filters: it accepts every parameter,
//! understands three actions and applies a brightness gain driven by `level`.

use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, trace};

use super::{Frame, ParamStore, PixelFormat, VFilter};
use crate::protocol::{FilterCommand, FilterParam, VFilterParams};

/// Reference video filter
///
/// # Processing policy
///
/// While `mode` is 0 the filter is disabled: [`VFilter::process_frame`]
/// returns `false` and leaves the frame untouched. When enabled, every color
/// channel of every unmasked pixel is scaled by `1 + level / 100` (alpha is
/// kept), `processing_time_mc_sec` is updated, and the call returns `true`.
#[derive(Debug, Default)]
pub struct CustomVFilter {
    params: ParamStore,
    initial: Mutex<VFilterParams>,
    mask: Mutex<Option<Frame>>,
}

impl CustomVFilter {
    /// Registry identifier
    pub const NAME: &'static str = "custom";

    /// Restore the parameters given to the last `init_vfilter`
    pub const RESTART: FilterCommand = FilterCommand::new(1);
    /// Enable processing (`mode = 1`)
    pub const ON: FilterCommand = FilterCommand::new(2);
    /// Disable processing (`mode = 0`)
    pub const OFF: FilterCommand = FilterCommand::new(3);

    /// Create a disabled filter with default parameters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and initialize a filter
    #[must_use]
    pub fn with_params(params: &VFilterParams) -> Self {
        let filter = Self::new();
        filter.init_vfilter(params);
        filter
    }

    /// Implementation version
    #[must_use]
    pub fn version() -> &'static str {
        crate::VERSION
    }

    fn gain(level: i32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let level = level as f32;
        (1.0 + level / 100.0).max(0.0)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scale(value: u8, gain: f32) -> u8 {
        (f32::from(value) * gain).round().clamp(0.0, 255.0) as u8
    }
}

impl VFilter for CustomVFilter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init_vfilter(&self, params: &VFilterParams) -> bool {
        *self.initial.lock().expect("initial params mutex poisoned") = *params;
        self.params.replace(*params);
        debug!(filter = Self::NAME, ?params, "filter initialized");
        true
    }

    fn set_param(&self, id: FilterParam, value: f32) -> bool {
        self.params.set(id, value);
        trace!(filter = Self::NAME, param = %id, value, "param set");
        true
    }

    fn get_param(&self, id: FilterParam) -> f32 {
        self.params.get(id)
    }

    fn get_params(&self) -> VFilterParams {
        self.params.snapshot()
    }

    fn execute_command(&self, id: FilterCommand) -> bool {
        match id {
            Self::RESTART => {
                let initial = *self.initial.lock().expect("initial params mutex poisoned");
                self.params.replace(initial);
            }
            Self::ON => self.params.update(|p| p.mode = 1),
            Self::OFF => self.params.update(|p| p.mode = 0),
            _ => {
                debug!(filter = Self::NAME, command = %id, "unknown command");
                return false;
            }
        }
        debug!(filter = Self::NAME, command = %id, "command executed");
        true
    }

    fn process_frame(&self, frame: &mut Frame) -> bool {
        let params = self.params.snapshot();
        if params.mode == 0 {
            return false;
        }

        let start = Instant::now();
        let gain = Self::gain(params.level);
        let format = frame.format();
        let bpp = format.bytes_per_pixel();
        let channels = format.color_channels();

        let mask_guard = self.mask.lock().expect("mask mutex poisoned");
        let mask = mask_guard
            .as_ref()
            .filter(|mask| mask.same_geometry(&*frame))
            .map(Frame::data);

        for (i, pixel) in frame.data_mut().chunks_exact_mut(bpp).enumerate() {
            if mask.is_some_and(|m| m.get(i) == Some(&0)) {
                continue;
            }
            for value in &mut pixel[..channels] {
                *value = Self::scale(*value, gain);
            }
        }
        drop(mask_guard);

        let elapsed = i32::try_from(start.elapsed().as_micros()).unwrap_or(i32::MAX);
        self.params.update(|p| p.processing_time_mc_sec = elapsed);
        trace!(filter = Self::NAME, elapsed_us = elapsed, "frame processed");
        true
    }

    fn set_mask(&self, mask: &Frame) -> bool {
        if mask.format() != PixelFormat::Gray8 {
            debug!(filter = Self::NAME, format = %mask.format(), "mask format not supported");
            return false;
        }
        *self.mask.lock().expect("mask mutex poisoned") = Some(mask.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(level: i32) -> CustomVFilter {
        CustomVFilter::with_params(&VFilterParams {
            mode: 1,
            level,
            ..VFilterParams::default()
        })
    }

    #[test]
    fn test_disabled_filter_leaves_frame() {
        let filter = CustomVFilter::new();
        let mut frame = Frame::filled(4, 4, PixelFormat::Gray8, 100).unwrap();
        assert!(!filter.process_frame(&mut frame));
        assert!(frame.data().iter().all(|v| *v == 100));
        assert!(!filter.process_frame(&mut frame));
    }

    #[test]
    fn test_gain_applied() {
        let filter = enabled(50);
        let mut frame = Frame::filled(2, 2, PixelFormat::Gray8, 100).unwrap();
        assert!(filter.process_frame(&mut frame));
        assert!(frame.data().iter().all(|v| *v == 150));

        let mut bright = Frame::filled(1, 1, PixelFormat::Gray8, 200).unwrap();
        assert!(filter.process_frame(&mut bright));
        assert_eq!(bright.data(), &[255]);
    }

    #[test]
    fn test_alpha_untouched() {
        let filter = enabled(-50);
        let mut frame = Frame::new(1, 1, PixelFormat::Rgba32, vec![100, 50, 20, 200]).unwrap();
        assert!(filter.process_frame(&mut frame));
        assert_eq!(frame.data(), &[50, 25, 10, 200]);
    }

    #[test]
    fn test_mask_excludes_pixels() {
        let filter = enabled(100);
        let mask = Frame::new(2, 1, PixelFormat::Gray8, vec![0, 255]).unwrap();
        assert!(filter.set_mask(&mask));

        let mut frame = Frame::filled(2, 1, PixelFormat::Rgb24, 10).unwrap();
        assert!(filter.process_frame(&mut frame));
        assert_eq!(frame.data(), &[10, 10, 10, 20, 20, 20]);
    }

    #[test]
    fn test_mask_with_other_geometry_ignored() {
        let filter = enabled(100);
        assert!(filter.set_mask(&Frame::filled(3, 3, PixelFormat::Gray8, 0).unwrap()));

        let mut frame = Frame::filled(2, 1, PixelFormat::Gray8, 10).unwrap();
        assert!(filter.process_frame(&mut frame));
        assert_eq!(frame.data(), &[20, 20]);
    }

    #[test]
    fn test_color_mask_rejected() {
        let filter = CustomVFilter::new();
        assert!(!filter.set_mask(&Frame::filled(2, 2, PixelFormat::Rgb24, 0).unwrap()));
    }

    #[test]
    fn test_commands() {
        let filter = CustomVFilter::with_params(&VFilterParams {
            level: 30,
            ..VFilterParams::default()
        });

        assert!(filter.execute_command(CustomVFilter::ON));
        assert_eq!(filter.get_param(FilterParam::Mode), 1.0);

        assert!(filter.set_param(FilterParam::Level, 80.0));
        assert!(filter.execute_command(CustomVFilter::RESTART));
        assert_eq!(filter.get_param(FilterParam::Level), 30.0);
        assert_eq!(filter.get_param(FilterParam::Mode), 0.0);

        assert!(filter.execute_command(CustomVFilter::ON));
        assert!(filter.execute_command(CustomVFilter::OFF));
        assert_eq!(filter.get_param(FilterParam::Mode), 0.0);
    }

    #[test]
    fn test_unknown_command_is_noop() {
        let filter = enabled(10);
        let before = filter.get_params();
        assert!(!filter.execute_command(FilterCommand::new(0)));
        assert!(!filter.execute_command(FilterCommand::new(42)));
        assert_eq!(filter.get_params(), before);
    }

    #[test]
    fn test_all_params_supported() {
        let filter = CustomVFilter::new();
        for (i, param) in FilterParam::ALL.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let value = (i + 1) as f32;
            assert!(filter.set_param(*param, value));
            assert_eq!(filter.get_param(*param), value);
        }
    }
}
