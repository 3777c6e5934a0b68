//! [`ActorEntity`] implementation for [`Product`].

use super::error::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use store_actor::ActorEntity;

fn check_rate(rate: f64) -> Result<f64, ProductError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(ProductError::InvalidRate(rate))
    }
}

fn check_name(name: String) -> Result<String, ProductError> {
    if name.trim().is_empty() {
        Err(ProductError::EmptyName)
    } else {
        Ok(name)
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(
            id,
            check_name(params.name)?,
            check_rate(params.hourly_rate)?,
        ))
    }

    /// Handles updates to the Product entity.
    ///
    /// Rentals already reserved keep the price computed at reservation time.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = check_name(name)?;
        }
        if let Some(rate) = update.hourly_rate {
            self.hourly_rate = check_rate(rate)?;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
