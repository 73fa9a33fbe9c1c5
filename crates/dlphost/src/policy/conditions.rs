//! Condition-set matching.
//!
//! AND semantics over the predicates that are present; an absent or empty
//! predicate constrains nothing.

use dlphost_core::schema::TelemetryEvent;

use super::schema::PolicyConditions;

/// Does this condition set match the event?
pub fn matches(cond: &PolicyConditions, evt: &TelemetryEvent) -> bool {
    if let Some(types) = present(&cond.event_type_in) {
        if !types.iter().any(|t| t == evt.event_type.as_str()) {
            return false;
        }
    }

    if let Some(domains) = present(&cond.domain_in) {
        if !domains.iter().any(|d| d.eq_ignore_ascii_case(&evt.domain)) {
            return false;
        }
    }

    if let Some(domains) = present(&cond.domain_not_in) {
        if domains.iter().any(|d| d.eq_ignore_ascii_case(&evt.domain)) {
            return false;
        }
    }

    if let Some(wanted) = present(&cond.patterns_any) {
        let detected: &[String] = evt
            .text_signals
            .as_ref()
            .map(|t| t.patterns.as_slice())
            .unwrap_or(&[]);
        if !wanted.iter().any(|p| detected.iter().any(|d| d == p)) {
            return false;
        }
    }

    if let Some(min) = cond.text_length_min {
        let length = evt.text_signals.as_ref().map(|t| t.length).unwrap_or(0);
        if length < min {
            return false;
        }
    }

    if let Some(exts) = present(&cond.file_extension_in) {
        let ext = evt
            .file_signals
            .as_ref()
            .map(|f| f.extension.as_str())
            .unwrap_or("");
        if !exts.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return false;
        }
    }

    true
}

/// Treat `None` and `Some(empty)` the same: no constraint.
fn present(field: &Option<Vec<String>>) -> Option<&[String]> {
    match field {
        Some(v) if !v.is_empty() => Some(v.as_slice()),
        _ => None,
    }
}
