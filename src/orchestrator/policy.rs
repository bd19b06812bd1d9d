//! When a recalculation should run.
//!
//! The host passes the configured trigger in explicitly; there is no global
//! auto-calculate switch.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecalculationTrigger {
    /// Recalculate only on explicit request
    #[default]
    Manual,
    /// Recalculate once edits have been quiet for `debounce_ms`
    OnFieldChange { debounce_ms: u64 },
}

/// What prompted the host to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecalculationRequest {
    /// The user pressed "calculate"
    Explicit,
    /// A field was edited; `last_edit` is the most recent edit time
    FieldEdited { last_edit: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecalculationPolicy {
    pub trigger: RecalculationTrigger,
}

impl RecalculationPolicy {
    pub fn new(trigger: RecalculationTrigger) -> Self {
        Self { trigger }
    }

    pub fn manual() -> Self {
        Self::new(RecalculationTrigger::Manual)
    }

    pub fn on_field_change(debounce_ms: u64) -> Self {
        Self::new(RecalculationTrigger::OnFieldChange { debounce_ms })
    }

    /// Explicit requests always run. Edits run only under `OnFieldChange`,
    /// and only after the debounce interval has passed since the last edit.
    pub fn should_recalculate(&self, request: RecalculationRequest, now: DateTime<Utc>) -> bool {
        match (self.trigger, request) {
            (_, RecalculationRequest::Explicit) => true,
            (RecalculationTrigger::Manual, RecalculationRequest::FieldEdited { .. }) => false,
            (
                RecalculationTrigger::OnFieldChange { debounce_ms },
                RecalculationRequest::FieldEdited { last_edit },
            ) => now - last_edit >= debounce_duration(debounce_ms),
        }
    }
}

fn debounce_duration(debounce_ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(debounce_ms).unwrap_or(i64::MAX))
}

/// Coalesces a burst of edits into one recalculation.
#[derive(Debug, Clone)]
pub struct EditDebouncer {
    policy: RecalculationPolicy,
    pending_since: Option<DateTime<Utc>>,
}

impl EditDebouncer {
    pub fn new(policy: RecalculationPolicy) -> Self {
        Self {
            policy,
            pending_since: None,
        }
    }

    pub fn record_edit(&mut self, at: DateTime<Utc>) {
        self.pending_since = Some(at);
    }

    pub fn has_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True once per burst, when the quiet period has elapsed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let Some(last_edit) = self.pending_since else {
            return false;
        };
        let fire = self
            .policy
            .should_recalculate(RecalculationRequest::FieldEdited { last_edit }, now);
        if fire {
            self.pending_since = None;
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn test_manual_ignores_edits() {
        let policy = RecalculationPolicy::manual();
        let edit = RecalculationRequest::FieldEdited { last_edit: at(0) };
        assert!(!policy.should_recalculate(edit, at(1_000_000)));
        assert!(policy.should_recalculate(RecalculationRequest::Explicit, at(0)));
    }

    #[test]
    fn test_field_change_waits_for_debounce() {
        let policy = RecalculationPolicy::on_field_change(500);
        let edit = RecalculationRequest::FieldEdited { last_edit: at(0) };
        assert!(!policy.should_recalculate(edit, at(499)));
        assert!(policy.should_recalculate(edit, at(500)));
    }

    #[test]
    fn test_debouncer_fires_once_per_burst() {
        let mut debouncer = EditDebouncer::new(RecalculationPolicy::on_field_change(200));
        debouncer.record_edit(at(0));
        debouncer.record_edit(at(150));
        assert!(!debouncer.poll(at(300)));
        assert!(debouncer.poll(at(350)));
        assert!(!debouncer.poll(at(1_000)));
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_trigger_toml_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            trigger: RecalculationTrigger,
        }
        let manual: Wrapper = toml::from_str("trigger = \"manual\"").unwrap();
        assert_eq!(manual.trigger, RecalculationTrigger::Manual);
        let debounced: Wrapper =
            toml::from_str("trigger = { on_field_change = { debounce_ms = 750 } }").unwrap();
        assert_eq!(
            debounced.trigger,
            RecalculationTrigger::OnFieldChange { debounce_ms: 750 }
        );
    }
}
