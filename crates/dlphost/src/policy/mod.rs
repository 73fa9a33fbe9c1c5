//! Policy layer: config schema, condition matching, and the decision engine.
//!
//! The policy file is a JSON document loaded once at startup and immutable
//! for the process lifetime (hot-reload is out of scope).

pub mod conditions;
pub mod engine;
pub mod schema;

use std::fs;
use std::path::Path;

use dlphost_core::{DlpError, Result};

pub use engine::PolicyEngine;
pub use schema::{PolicyConditions, PolicyConfig, PolicyException, PolicyRule};

/// Load and parse a policy file.
///
/// Any failure here is `PolicyLoad`; the host loop treats it as non-fatal
/// and degrades to [`PolicyEngine::allow_all`].
pub fn load_from_file(path: &Path) -> Result<PolicyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DlpError::PolicyLoad(format!("read {}: {e}", path.display())))?;
    load_from_str(&s)
}

/// Parse policy JSON.
pub fn load_from_str(s: &str) -> Result<PolicyConfig> {
    serde_json::from_str(s).map_err(|e| DlpError::PolicyLoad(format!("invalid policy json: {e}")))
}
