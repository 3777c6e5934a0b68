//! [`ActorEntity`] implementation for [`Rental`].
//!
//! The rental store depends on the pendency ledger: a rental that a pendency refers to can
//! never be deleted. The [`PendencyClient`] is injected as the actor's context.

use super::actions::{RentalAction, RentalActionResult, ReturnAssessment};
use super::error::RentalError;
use crate::clients::PendencyClient;
use crate::model::{Rental, RentalCreate, RentalId, RentalStatus};
use async_trait::async_trait;
use store_actor::ActorEntity;
use tracing::debug;

#[async_trait]
impl ActorEntity for Rental {
    type Id = RentalId;
    type Create = RentalCreate;
    type Update = ();
    type Action = RentalAction;
    type ActionResult = RentalActionResult;
    type Context = PendencyClient;
    type Error = RentalError;

    fn id(&self) -> &RentalId {
        &self.id
    }

    fn from_create_params(id: RentalId, params: RentalCreate) -> Result<Self, Self::Error> {
        if params.duration_minutes == 0 {
            return Err(RentalError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }
        if !params.price.is_finite() || params.price < 0.0 {
            return Err(RentalError::InvalidRequest(format!(
                "price {} is not a valid amount",
                params.price
            )));
        }
        if params.code.as_str().is_empty() {
            return Err(RentalError::InvalidRequest(
                "pickup code must not be empty".to_string(),
            ));
        }
        Ok(Rental::from_create(id, params))
    }

    /// Two live rentals may never share a pickup code.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.status.is_live() && other.status.is_live() && self.code == other.code
    }

    async fn on_update(&mut self, _update: (), _ctx: &PendencyClient) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn on_delete(&self, pendencies: &PendencyClient) -> Result<(), Self::Error> {
        let referenced = pendencies
            .any_for_rental(self.id)
            .await
            .map_err(|e| RentalError::ActorCommunicationError(e.to_string()))?;
        if referenced {
            return Err(RentalError::HasPendency(self.id.to_string()));
        }
        if self.status != RentalStatus::Completed {
            return Err(RentalError::InvalidState {
                status: self.status,
                expected: RentalStatus::Completed,
            });
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RentalAction,
        _ctx: &PendencyClient,
    ) -> Result<RentalActionResult, Self::Error> {
        match action {
            RentalAction::ConfirmPickup { at } => {
                match self.status {
                    RentalStatus::Pending => {}
                    RentalStatus::Cancelled => {
                        return Err(RentalError::AlreadyCancelled(self.code.to_string()))
                    }
                    status => {
                        return Err(RentalError::InvalidState {
                            status,
                            expected: RentalStatus::Pending,
                        })
                    }
                }
                self.status = RentalStatus::Active;
                self.picked_up_at = Some(at);
                Ok(RentalActionResult::ConfirmPickup(self.clone()))
            }
            RentalAction::ConfirmReturn { at, policy } => {
                if self.status != RentalStatus::Active {
                    return Err(RentalError::InvalidState {
                        status: self.status,
                        expected: RentalStatus::Active,
                    });
                }
                let lateness = self.assess_return(at, &policy);
                self.status = if lateness.is_some() {
                    RentalStatus::CompletedLate
                } else {
                    RentalStatus::Completed
                };
                self.closed_at = Some(at);
                self.lateness = lateness;
                Ok(RentalActionResult::ConfirmReturn(ReturnAssessment {
                    rental: self.clone(),
                    lateness,
                }))
            }
            RentalAction::CancelIfPending { at } => {
                if self.status != RentalStatus::Pending {
                    debug!(id = %self.id, status = %self.status, "Left pending before expiry");
                    return Ok(RentalActionResult::CancelIfPending(None));
                }
                self.status = RentalStatus::Cancelled;
                self.closed_at = Some(at);
                Ok(RentalActionResult::CancelIfPending(Some(self.clone())))
            }
        }
    }
}
