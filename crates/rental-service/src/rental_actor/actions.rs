//! Custom actions for the rental store: the lifecycle transitions.
//!
//! Each transition checks the current status and writes the new one inside a single request,
//! so a pickup and an expiry racing for the same rental cannot both apply.

use crate::config::RentalPolicy;
use crate::model::{Lateness, Rental};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum RentalAction {
    /// Pending -> Active, stamping the pickup time.
    ConfirmPickup { at: DateTime<Utc> },
    /// Active -> Completed or CompletedLate, depending on the time elapsed since pickup.
    ConfirmReturn {
        at: DateTime<Utc>,
        policy: RentalPolicy,
    },
    /// Pending -> Cancelled; a no-op for any other status.
    CancelIfPending { at: DateTime<Utc> },
}

/// Results from RentalActions - variants match 1:1 with RentalAction
#[derive(Debug, Clone)]
pub enum RentalActionResult {
    ConfirmPickup(Rental),
    ConfirmReturn(ReturnAssessment),
    /// The cancelled rental, or `None` if it had already left Pending.
    CancelIfPending(Option<Rental>),
}

/// A completed return: the rental as stored afterwards, and its lateness if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnAssessment {
    pub rental: Rental,
    pub lateness: Option<Lateness>,
}
