use chrono::{DateTime, Utc};

/// Custom actions for the pendency ledger.
#[derive(Debug, Clone, Copy)]
pub enum PendencyAction {
    /// Settles the debt at `at`; returns the resolved pendency.
    Resolve { at: DateTime<Utc> },
}
