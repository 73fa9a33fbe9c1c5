//! Startup discovery of the policy file and audit log directory.
//!
//! Both searches start at the executable's directory and ascend parents, so
//! the host works both installed next to its policy and launched from a
//! build tree. Absence of either is non-fatal.

use std::path::{Path, PathBuf};

/// Directory containing the running executable, if resolvable.
pub fn exe_directory() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Locate the policy file: `policy.json` alongside the executable, then
/// each ancestor directory probed for `policy/policy.json` and
/// `agent/policy/policy.json`.
pub fn find_policy_file_from(start: &Path) -> Option<PathBuf> {
    let beside = start.join("policy.json");
    if beside.is_file() {
        return Some(beside);
    }

    let mut dir = Some(start);
    while let Some(d) = dir {
        for rel in ["policy/policy.json", "agent/policy/policy.json"] {
            let candidate = d.join(rel);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        dir = d.parent();
    }
    None
}

/// Locate the audit log directory: the first ancestor with an `agent/`
/// directory gets `agent/logs`; otherwise `logs` beside the executable.
pub fn find_log_directory_from(start: &Path) -> PathBuf {
    let mut dir = Some(start);
    while let Some(d) = dir {
        if d.join("agent").is_dir() {
            return d.join("agent").join("logs");
        }
        dir = d.parent();
    }
    start.join("logs")
}
