//! Requests and results of lifecycle operations.
//!
//! Results serialize to camelCase JSON so an API layer can return them directly.

use crate::model::{
    ColorId, CustomerId, Pendency, PickupCode, ProductId, Rental, RentalId, SizeId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer's request to reserve one unit of a product variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub color_id: ColorId,
    pub size_id: SizeId,
    pub duration_minutes: u32,
}

/// A successful reservation: the code to show at the counter and the pickup deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub rental_id: RentalId,
    pub code: PickupCode,
    pub price: f64,
    pub expires_at: DateTime<Utc>,
}

/// Result of a return: the pendency raised by a late return, or the completed rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnOutcome {
    pub has_pendency: bool,
    pub data: ReturnData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReturnData {
    Rental(Rental),
    Pendency(Pendency),
}

impl ReturnOutcome {
    pub fn on_time(rental: Rental) -> Self {
        Self {
            has_pendency: false,
            data: ReturnData::Rental(rental),
        }
    }

    pub fn late(pendency: Pendency) -> Self {
        Self {
            has_pendency: true,
            data: ReturnData::Pendency(pendency),
        }
    }

    pub fn pendency(&self) -> Option<&Pendency> {
        match &self.data {
            ReturnData::Pendency(pendency) => Some(pendency),
            ReturnData::Rental(_) => None,
        }
    }
}

/// A customer's rentals: `active` are picked up and not yet returned, `completed` were
/// returned on time or late. Both newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRentals {
    pub active: Vec<Rental>,
    pub completed: Vec<Rental>,
}

/// A customer's pendencies: `active` are unresolved, `completed` are resolved, most
/// recently resolved first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerPendencies {
    pub active: Vec<Pendency>,
    pub completed: Vec<Pendency>,
}
