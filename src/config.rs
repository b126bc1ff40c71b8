//! Default parameters from JSON
//!
//! Keys mirror the wire field names; every key is optional and missing keys
//! keep their default value:
//!
//! ```json
//! { "mode": 1, "level": 40, "processingTimeMcSec": 0, "type": 2,
//!   "custom1": 0.5, "custom2": 0.0, "custom3": 0.0 }
//! ```

use std::path::Path;

use tracing::debug;

use crate::protocol::{Result, VFilterParams};

/// Parse parameters from a JSON string.
pub fn load_params_str(json: &str) -> Result<VFilterParams> {
    Ok(serde_json::from_str(json)?)
}

/// Read parameters from a JSON file.
pub fn load_params(path: impl AsRef<Path>) -> Result<VFilterParams> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let params = load_params_str(&text)?;
    debug!(path = %path.display(), ?params, "filter params loaded");
    Ok(params)
}

/// Render parameters as pretty JSON.
pub fn params_to_json(params: &VFilterParams) -> Result<String> {
    Ok(serde_json::to_string_pretty(params)?)
}
