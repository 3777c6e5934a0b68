//! [`ActorEntity`] implementation for [`Pendency`].

use super::actions::PendencyAction;
use super::error::PendencyError;
use crate::model::{Pendency, PendencyCreate, PendencyId};
use async_trait::async_trait;
use store_actor::ActorEntity;

#[async_trait]
impl ActorEntity for Pendency {
    type Id = PendencyId;
    type Create = PendencyCreate;
    type Update = ();
    type Action = PendencyAction;
    type ActionResult = Pendency;
    type Context = ();
    type Error = PendencyError;

    fn id(&self) -> &PendencyId {
        &self.id
    }

    fn from_create_params(id: PendencyId, params: PendencyCreate) -> Result<Self, Self::Error> {
        if params.delay_minutes <= 0 {
            return Err(PendencyError::InvalidRequest(format!(
                "delay of {} minutes is not a late return",
                params.delay_minutes
            )));
        }
        Ok(Self {
            id,
            customer_id: params.customer_id,
            rental_id: params.rental_id,
            delay_minutes: params.delay_minutes,
            value: params.value,
            created_at: params.created_at,
            resolved_at: None,
        })
    }

    /// A late return is charged once.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.rental_id == other.rental_id
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: PendencyAction,
        _ctx: &(),
    ) -> Result<Pendency, Self::Error> {
        match action {
            PendencyAction::Resolve { at } => {
                if self.is_resolved() {
                    return Err(PendencyError::AlreadyResolved(self.id.to_string()));
                }
                self.resolved_at = Some(at);
                Ok(self.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, RentalId};
    use chrono::Utc;

    #[tokio::test]
    async fn resolves_once() {
        let mut pendency = Pendency::from_create_params(
            PendencyId::new(),
            PendencyCreate {
                customer_id: CustomerId::new(),
                rental_id: RentalId::new(),
                delay_minutes: 11,
                value: 275.0,
                created_at: Utc::now(),
            },
        )
        .unwrap();
        assert!(!pendency.is_resolved());

        let at = Utc::now();
        let resolved = pendency
            .handle_action(PendencyAction::Resolve { at }, &())
            .await
            .unwrap();
        assert_eq!(resolved.resolved_at, Some(at));

        let again = pendency
            .handle_action(PendencyAction::Resolve { at }, &())
            .await;
        assert!(matches!(again, Err(PendencyError::AlreadyResolved(_))));
    }

    #[test]
    fn one_pendency_per_rental() {
        let rental_id = RentalId::new();
        let raise = |rental_id| {
            Pendency::from_create_params(
                PendencyId::new(),
                PendencyCreate {
                    customer_id: CustomerId::new(),
                    rental_id,
                    delay_minutes: 20,
                    value: 500.0,
                    created_at: Utc::now(),
                },
            )
            .unwrap()
        };
        let first = raise(rental_id);
        assert!(raise(rental_id).conflicts_with(&first));
        assert!(!raise(RentalId::new()).conflicts_with(&first));
    }
}
