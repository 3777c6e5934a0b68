//! Rentals, their status machine, and pickup codes.

use crate::config::RentalPolicy;
use crate::model::{CustomerId, InventoryItemId, ProductId, RentalId};
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a rental is in its lifecycle.
///
/// ```text
/// Pending --pickup--> Active --return--> Completed | CompletedLate
///    |
///    +--expiry--> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RentalStatus {
    Pending,
    Active,
    Cancelled,
    Completed,
    CompletedLate,
}

impl RentalStatus {
    /// Pending or Active: the rental holds its unit and its pickup code.
    pub fn is_live(self) -> bool {
        matches!(self, RentalStatus::Pending | RentalStatus::Active)
    }

    /// Returned, on time or late.
    pub fn is_returned(self) -> bool {
        matches!(self, RentalStatus::Completed | RentalStatus::CompletedLate)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RentalStatus::Pending => "Pending",
            RentalStatus::Active => "Active",
            RentalStatus::Cancelled => "Cancelled",
            RentalStatus::Completed => "Completed",
            RentalStatus::CompletedLate => "Completed late",
        };
        f.write_str(label)
    }
}

/// The short code a customer shows at the counter to pick up and return a unit.
///
/// Codes are stored upper-case and every lookup goes through [`PickupCode::new`], so
/// `"ab12cd"` and `"AB12CD"` are the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickupCode(String);

impl PickupCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// A random alphanumeric code of `length` characters.
    pub fn random(length: usize) -> Self {
        let raw: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Self::new(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PickupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One reservation/fulfillment cycle of one inventory unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: RentalId,
    pub customer_id: CustomerId,
    pub item_id: InventoryItemId,
    pub product_id: ProductId,
    pub status: RentalStatus,
    pub duration_minutes: u32,
    /// Fixed at reservation: hourly rate x duration / 60.
    pub price: f64,
    pub code: PickupCode,
    pub reserved_at: DateTime<Utc>,
    /// End of the pickup hold.
    pub expires_at: DateTime<Utc>,
    /// Set on pickup; lateness is measured from here.
    pub picked_up_at: Option<DateTime<Utc>>,
    /// Set on entering a terminal status.
    pub closed_at: Option<DateTime<Utc>>,
    /// Recorded with the CompletedLate transition; the pendency is raised from it.
    #[serde(default)]
    pub lateness: Option<Lateness>,
}

/// Payload for recording a new reservation. The rental starts `Pending`.
#[derive(Debug, Clone)]
pub struct RentalCreate {
    pub customer_id: CustomerId,
    pub item_id: InventoryItemId,
    pub product_id: ProductId,
    pub duration_minutes: u32,
    pub price: f64,
    pub code: PickupCode,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// How late a return was, and what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lateness {
    /// Minutes past the booked duration (the grace period is not subtracted).
    pub delay_minutes: i64,
    /// Penalty in currency minor units.
    pub value: f64,
}

impl Rental {
    pub fn from_create(id: RentalId, params: RentalCreate) -> Self {
        Self {
            id,
            customer_id: params.customer_id,
            item_id: params.item_id,
            product_id: params.product_id,
            status: RentalStatus::Pending,
            duration_minutes: params.duration_minutes,
            price: params.price,
            code: params.code,
            reserved_at: params.reserved_at,
            expires_at: params.expires_at,
            picked_up_at: None,
            closed_at: None,
            lateness: None,
        }
    }

    /// Whether the pickup hold has run out at `now` while the rental is still Pending.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == RentalStatus::Pending && self.expires_at <= now
    }

    /// Whole minutes between pickup and `returned_at`; zero before pickup.
    pub fn elapsed_minutes(&self, returned_at: DateTime<Utc>) -> i64 {
        self.picked_up_at
            .map_or(0, |picked_up_at| (returned_at - picked_up_at).num_minutes())
    }

    /// Lateness of a return at `returned_at`, or `None` when it is within the grace period.
    ///
    /// A return is late once the elapsed time exceeds duration + grace. The delay charged is
    /// measured from the end of the booked duration.
    pub fn assess_return(&self, returned_at: DateTime<Utc>, policy: &RentalPolicy) -> Option<Lateness> {
        let elapsed = self.elapsed_minutes(returned_at);
        let duration = i64::from(self.duration_minutes);
        if elapsed <= duration + i64::from(policy.grace_minutes) {
            return None;
        }
        let delay_minutes = elapsed - duration;
        Some(Lateness {
            delay_minutes,
            value: policy.penalty(delay_minutes),
        })
    }
}
