//! Policy file schema.
//!
//! Parsing is deliberately tolerant: every field is defaulted and unknown
//! fields are ignored, because policy files are authored outside this repo
//! and older hosts must keep accepting newer files. An absent or empty
//! condition field imposes no constraint (it is vacuously true), never a
//! "match nothing".

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PolicyConfig {
    /// Opaque version stamp, echoed into every decision.
    #[serde(default)]
    pub policy_id: String,
    #[serde(default)]
    pub policy_version: String,
    /// Decision applied when nothing else matches.
    #[serde(default = "default_decision")]
    pub default: String,
    /// Checked before rules, in declared order; first match wins.
    #[serde(default)]
    pub exceptions: Vec<PolicyException>,
    /// Evaluated by priority descending; declaration order breaks ties.
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

fn default_decision() -> String {
    "allow".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PolicyException {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conditions: PolicyConditions,
    #[serde(default = "default_decision")]
    pub decision: String,
}

#[derive(Debug, Deserialize)]
pub struct PolicyRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conditions: PolicyConditions,
    #[serde(default = "default_decision")]
    pub decision: String,
    #[serde(default)]
    pub reason: String,
}

/// A condition set matches an event iff ALL present predicates match.
#[derive(Debug, Default, Deserialize)]
pub struct PolicyConditions {
    /// Event type is one of these wire strings.
    #[serde(default)]
    pub event_type_in: Option<Vec<String>>,
    /// Domain membership, case-insensitive.
    #[serde(default)]
    pub domain_in: Option<Vec<String>>,
    /// Domain non-membership, case-insensitive.
    #[serde(default)]
    pub domain_not_in: Option<Vec<String>>,
    /// Intersection with the event's detected patterns is non-empty.
    #[serde(default)]
    pub patterns_any: Option<Vec<String>>,
    /// Event text length >= threshold (missing text signals count as 0).
    #[serde(default)]
    pub text_length_min: Option<u64>,
    /// File extension membership, case-insensitive (missing file signals
    /// count as an empty extension).
    #[serde(default)]
    pub file_extension_in: Option<Vec<String>>,
}
