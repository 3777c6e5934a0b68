//! Catalog products, reduced to what pricing a rental needs.

use crate::model::ProductId;
use serde::{Deserialize, Serialize};

/// A rentable product as far as the lifecycle is concerned: its name and hourly rate.
///
/// Catalog details (categories, suppliers, images) belong to the catalog service; the
/// rental store only needs the rate to price a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price of one hour of rental, in currency units.
    pub hourly_rate: f64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            id,
            name: name.into(),
            hourly_rate,
        }
    }

    /// Price of renting this product for `duration_minutes` at the current rate.
    pub fn price_for(&self, duration_minutes: u32) -> f64 {
        rental_price(self.hourly_rate, duration_minutes)
    }
}

/// `hourly_rate` prorated to `duration_minutes`.
pub fn rental_price(hourly_rate: f64, duration_minutes: u32) -> f64 {
    hourly_rate * (f64::from(duration_minutes) / 60.0)
}

/// Payload for registering a product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub hourly_rate: f64,
}

/// Partial update of a product.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub hourly_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_prorated_by_minute() {
        let drill = Product::new(ProductId::new(), "Drill", 12.0);
        assert_eq!(drill.price_for(60), 12.0);
        assert_eq!(drill.price_for(90), 18.0);
        assert_eq!(drill.price_for(15), 3.0);
    }
}
