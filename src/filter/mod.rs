//! Video filter interface
//!
//! A concrete filter implements [`VFilter`] once; remote controllers reach it
//! through [`VFilter::decode_and_execute_command`], which decodes a command
//! buffer and dispatches it to [`VFilter::set_param`] or
//! [`VFilter::execute_command`].

mod custom;
mod frame;
mod registry;

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::protocol::{
    Command, Error, FilterCommand, FilterParam, Metrics, Rejection, Result, VFilterParams,
    decode_command,
};

pub use custom::CustomVFilter;
pub use frame::{Frame, PixelFormat};
pub use registry::{FilterFactory, FilterRegistry};

/// Capability set every video filter provides
///
/// All methods take `&self`: implementations keep their parameter record in a
/// [`ParamStore`] so one instance can be shared between a processing thread
/// and a control thread.
pub trait VFilter: Send + Sync {
    /// Filter type identifier
    fn name(&self) -> &'static str;

    /// Initialize the filter from a parameter record
    ///
    /// Only the fields the filter supports are adopted; the rest are ignored.
    fn init_vfilter(&self, params: &VFilterParams) -> bool;

    /// Set one parameter, returning `false` if the filter refuses it
    fn set_param(&self, id: FilterParam, value: f32) -> bool;

    /// Read one parameter
    fn get_param(&self, id: FilterParam) -> f32;

    /// Copy of the whole parameter record
    fn get_params(&self) -> VFilterParams;

    /// Run a filter action; unknown codes return `false` and change nothing
    fn execute_command(&self, id: FilterCommand) -> bool;

    /// Apply the filter to `frame` in place
    fn process_frame(&self, frame: &mut Frame) -> bool;

    /// Install a mask; zero mask pixels are left untouched by processing
    fn set_mask(&self, mask: &Frame) -> bool;

    /// Decode a command buffer and dispatch it
    ///
    /// Returns `false` on any decode or dispatch failure. Use
    /// [`VFilter::try_decode_and_execute`] to learn why.
    fn decode_and_execute_command(&self, data: &[u8]) -> bool {
        self.try_decode_and_execute(data).is_ok()
    }

    /// Decode a command buffer and dispatch it, reporting the failure kind
    ///
    /// Nothing is applied unless the whole buffer decodes.
    fn try_decode_and_execute(&self, data: &[u8]) -> Result<Command> {
        let command = decode_command(data)?;

        let applied = match command {
            Command::Action { id } => {
                if self.execute_command(id) {
                    Ok(())
                } else {
                    Err(Error::UnsupportedCommand { code: id.code() })
                }
            }
            Command::SetParam { param, value } => match FilterParam::from_i32(param) {
                Some(id) if self.set_param(id, value) => Ok(()),
                _ => Err(Error::UnsupportedParam { code: param }),
            },
        };

        match applied {
            Ok(()) => {
                debug!(filter = self.name(), ?command, "command dispatched");
                Metrics::record_dispatch();
                Ok(command)
            }
            Err(err) => {
                debug!(filter = self.name(), ?command, error = %err, "command refused");
                Metrics::record_rejection(Rejection::from(&err));
                Err(err)
            }
        }
    }
}

/// Parameter record behind a single lock
///
/// Every accessor holds the lock for exactly one call, so each call sees a
/// consistent record. Sequences of calls are not atomic.
#[derive(Debug, Default)]
pub struct ParamStore {
    inner: Mutex<VFilterParams>,
}

impl ParamStore {
    /// Create a store holding `params`
    #[must_use]
    pub fn new(params: VFilterParams) -> Self {
        Self {
            inner: Mutex::new(params),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VFilterParams> {
        self.inner.lock().expect("params mutex poisoned")
    }

    /// Write one field
    pub fn set(&self, id: FilterParam, value: f32) {
        self.lock().set(id, value);
    }

    /// Read one field
    #[must_use]
    pub fn get(&self, id: FilterParam) -> f32 {
        self.lock().get(id)
    }

    /// Copy of the whole record
    #[must_use]
    pub fn snapshot(&self) -> VFilterParams {
        *self.lock()
    }

    /// Replace the whole record
    pub fn replace(&self, params: VFilterParams) {
        *self.lock() = params;
    }

    /// Run `f` with the record locked
    pub fn update<R>(&self, f: impl FnOnce(&mut VFilterParams) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<VFilterParams> for ParamStore {
    fn from(params: VFilterParams) -> Self {
        Self::new(params)
    }
}
