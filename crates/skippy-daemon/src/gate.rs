//! Change detection between cycles.

use crate::labels::LabelSet;

/// Remembers the last label set that was applied successfully.
///
/// Starts out unset, which is different from an empty set: the first
/// cycle always applies.
#[derive(Debug, Default, Clone)]
pub struct DiffGate {
    last_applied: Option<LabelSet>,
}

impl DiffGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `labels` differs from what was last applied.
    pub fn should_apply(&self, labels: &LabelSet) -> bool {
        self.last_applied.as_ref() != Some(labels)
    }

    /// Record a successful apply.
    pub fn record_applied(&mut self, labels: LabelSet) {
        self.last_applied = Some(labels);
    }

    pub fn last_applied(&self) -> Option<&LabelSet> {
        self.last_applied.as_ref()
    }
}
