//! [`ActorEntity`] implementation for [`InventoryItem`].

use super::actions::{InventoryAction, InventoryActionResult};
use super::error::InventoryError;
use crate::model::{InventoryItem, InventoryItemCreate, InventoryItemId, InventoryStatus};
use async_trait::async_trait;
use store_actor::ActorEntity;

#[async_trait]
impl ActorEntity for InventoryItem {
    type Id = InventoryItemId;
    type Create = InventoryItemCreate;
    type Update = ();
    type Action = InventoryAction;
    type ActionResult = InventoryActionResult;
    type Context = ();
    type Error = InventoryError;

    fn id(&self) -> &InventoryItemId {
        &self.id
    }

    fn from_create_params(
        id: InventoryItemId,
        params: InventoryItemCreate,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            product_id: params.product_id,
            color_id: params.color_id,
            size_id: params.size_id,
            status: InventoryStatus::Available,
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Units held by a rental stay in the store.
    async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
        if self.status == InventoryStatus::Reserved {
            return Err(InventoryError::InUse(self.id.to_string()));
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: InventoryAction,
        _ctx: &(),
    ) -> Result<InventoryActionResult, Self::Error> {
        match action {
            InventoryAction::TrySetStatus { expected, new } => {
                if self.status != expected {
                    return Ok(InventoryActionResult::TrySetStatus(false));
                }
                self.status = new;
                Ok(InventoryActionResult::TrySetStatus(true))
            }
            InventoryAction::SetStatus(new) => {
                let previous = std::mem::replace(&mut self.status, new);
                Ok(InventoryActionResult::SetStatus(previous))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorId, ProductId, SizeId};

    fn unit() -> InventoryItem {
        InventoryItem::from_create_params(
            InventoryItemId::new(),
            InventoryItemCreate {
                product_id: ProductId::new(),
                color_id: ColorId::new(),
                size_id: SizeId::new(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn compare_and_set_only_applies_on_expected_status() {
        let mut item = unit();
        assert_eq!(item.status, InventoryStatus::Available);

        let claim = InventoryAction::TrySetStatus {
            expected: InventoryStatus::Available,
            new: InventoryStatus::Reserved,
        };
        assert_eq!(
            item.handle_action(claim, &()).await.unwrap(),
            InventoryActionResult::TrySetStatus(true)
        );
        assert_eq!(
            item.handle_action(claim, &()).await.unwrap(),
            InventoryActionResult::TrySetStatus(false)
        );
        assert_eq!(item.status, InventoryStatus::Reserved);
    }

    #[tokio::test]
    async fn reserved_units_cannot_be_deleted() {
        let mut item = unit();
        assert!(item.on_delete(&()).await.is_ok());

        item.handle_action(InventoryAction::SetStatus(InventoryStatus::Reserved), &())
            .await
            .unwrap();
        assert!(matches!(
            item.on_delete(&()).await,
            Err(InventoryError::InUse(_))
        ));
    }
}
