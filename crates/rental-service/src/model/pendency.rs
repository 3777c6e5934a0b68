//! Pendencies: debts raised by late returns.

use crate::model::{CustomerId, PendencyId, RentalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An outstanding (or settled) debt for a late return.
///
/// While any of a customer's pendencies is unresolved, that customer cannot reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pendency {
    pub id: PendencyId,
    pub customer_id: CustomerId,
    pub rental_id: RentalId,
    pub delay_minutes: i64,
    /// Penalty in currency minor units.
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Pendency {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// Payload for raising a pendency.
#[derive(Debug, Clone)]
pub struct PendencyCreate {
    pub customer_id: CustomerId,
    pub rental_id: RentalId,
    pub delay_minutes: i64,
    pub value: f64,
    pub created_at: DateTime<Utc>,
}
