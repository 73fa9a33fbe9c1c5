//! Policy Decision Point (PDP).
//!
//! Evaluation order: exceptions in declared order, then rules by priority
//! descending (stable on ties, so declaration order decides), then the
//! configured default. First match wins at every stage. `evaluate` is pure:
//! no I/O, no mutation, deterministic for a given (config, event) pair.

use std::cmp::Reverse;

use dlphost_core::schema::{PolicyDecision, TelemetryEvent, Verdict};

use super::conditions;
use super::schema::{PolicyConditions, PolicyConfig};

/// Reason text for the degraded no-policy engine.
const NO_POLICY_REASON: &str = "No policy loaded — default allow";

/// Reason text when evaluation falls through to the default.
const DEFAULT_REASON: &str = "No matching rule — default policy applied";

struct CompiledException {
    id: String,
    description: String,
    conditions: PolicyConditions,
    verdict: Verdict,
}

struct CompiledRule {
    id: String,
    reason: String,
    conditions: PolicyConditions,
    verdict: Verdict,
}

/// Policy runtime. Construct once at startup from a loaded config, then
/// pass into the host loop; read-only afterwards.
pub struct PolicyEngine {
    policy_id: String,
    policy_version: String,
    default_verdict: Verdict,
    default_reason: &'static str,
    exceptions: Vec<CompiledException>,
    /// Pre-sorted by priority descending; stable sort preserves declaration
    /// order on equal priorities.
    rules: Vec<CompiledRule>,
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        let exceptions = config
            .exceptions
            .into_iter()
            .map(|e| CompiledException {
                verdict: normalize_verdict(&e.decision, &e.id),
                id: e.id,
                description: e.description,
                conditions: e.conditions,
            })
            .collect();

        let mut raw_rules = config.rules;
        raw_rules.sort_by_key(|r| Reverse(r.priority));
        let rules = raw_rules
            .into_iter()
            .map(|r| CompiledRule {
                verdict: normalize_verdict(&r.decision, &r.id),
                id: r.id,
                reason: r.reason,
                conditions: r.conditions,
            })
            .collect();

        Self {
            policy_id: config.policy_id,
            policy_version: config.policy_version,
            default_verdict: normalize_verdict(&config.default, "default"),
            default_reason: DEFAULT_REASON,
            exceptions,
            rules,
        }
    }

    /// Degraded pseudo-policy used when no policy file could be loaded:
    /// allows everything, identifies itself as policy "none".
    pub fn allow_all() -> Self {
        Self {
            policy_id: "none".to_string(),
            policy_version: "0".to_string(),
            default_verdict: Verdict::Allow,
            default_reason: NO_POLICY_REASON,
            exceptions: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Version stamp echoed into decisions, for startup logging.
    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn policy_version(&self) -> &str {
        &self.policy_version
    }

    /// Evaluate one event against the policy.
    pub fn evaluate(&self, evt: &TelemetryEvent) -> PolicyDecision {
        for exc in &self.exceptions {
            if conditions::matches(&exc.conditions, evt) {
                return self.decision(evt, exc.verdict, &exc.id, &exc.description);
            }
        }

        for rule in &self.rules {
            if conditions::matches(&rule.conditions, evt) {
                return self.decision(evt, rule.verdict, &rule.id, &rule.reason);
            }
        }

        self.decision(evt, self.default_verdict, "default", self.default_reason)
    }

    fn decision(
        &self,
        evt: &TelemetryEvent,
        verdict: Verdict,
        id: &str,
        reason: &str,
    ) -> PolicyDecision {
        PolicyDecision {
            event_id: evt.event_id.clone(),
            decision: verdict,
            policy_id: self.policy_id.clone(),
            policy_version: self.policy_version.clone(),
            decision_reason: format!("[{id}] {reason}"),
        }
    }
}

/// Normalize a config decision string. Unknown values are a configuration
/// quality problem, surfaced once here at load time and treated as allow —
/// never an evaluation-time failure.
fn normalize_verdict(raw: &str, ctx_id: &str) -> Verdict {
    match Verdict::parse_lenient(raw) {
        Some(v) => v,
        None => {
            tracing::warn!(id = %ctx_id, decision = %raw, "unknown decision string, normalizing to allow");
            Verdict::Allow
        }
    }
}
