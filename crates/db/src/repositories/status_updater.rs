//! Payment request status updates guarded by an ETag.

use relo_core::payment_request::{
    ETag, PaymentRequestError, PaymentRequestFields, PaymentServiceItemStatus, ProcessedTimestamp,
    StatusAction, StatusTransitionService,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::{info, instrument, warn};

use crate::entities::{payment_requests, payment_service_items};

use super::payment_request::now;

/// Applies reviewer and invoicing status changes to payment requests.
///
/// Every method runs on the caller's connection or transaction. The stored
/// row is read under an exclusive lock before the ETag is compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentRequestStatusUpdater;

impl PaymentRequestStatusUpdater {
    /// Creates a new status updater.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Records the reviewer decision carried in `request.status`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target status is not a reviewed status (`Conflict`)
    /// - A service item is still awaiting a decision (`Conflict`)
    /// - The request no longer exists (`NotFound`)
    /// - The ETag is stale (`PreconditionFailed`)
    /// - The stored status is not `Pending` (`Conflict`)
    /// - Field validation fails (`InvalidInput`)
    #[instrument(
        skip(self, db, request, etag),
        fields(payment_request_id = %request.id, status = ?request.status)
    )]
    pub async fn update_reviewed_status<C: ConnectionTrait>(
        &self,
        db: &C,
        request: &payment_requests::Model,
        etag: &ETag,
    ) -> Result<payment_requests::Model, PaymentRequestError> {
        let item_statuses: Vec<PaymentServiceItemStatus> = payment_service_items::Entity::find()
            .filter(payment_service_items::Column::PaymentRequestId.eq(request.id))
            .all(db)
            .await
            .map_err(|e| PaymentRequestError::query("PaymentServiceItem", e))?
            .into_iter()
            .map(|item| item.status.into())
            .collect();

        let action =
            StatusTransitionService::review(request.id, request.status.into(), &item_statuses)?;
        self.update_status(db, request, &action, etag).await
    }

    /// Records invoicing progress carried in `request.status`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the target status is not an invoicing status,
    /// otherwise the same errors as [`Self::update_status`].
    #[instrument(
        skip(self, db, request, etag),
        fields(payment_request_id = %request.id, status = ?request.status)
    )]
    pub async fn update_processed_status<C: ConnectionTrait>(
        &self,
        db: &C,
        request: &payment_requests::Model,
        etag: &ETag,
    ) -> Result<payment_requests::Model, PaymentRequestError> {
        let action = StatusTransitionService::process(request.id, request.status.into())?;
        self.update_status(db, request, &action, etag).await
    }

    /// Applies a validated status change.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request no longer exists (`NotFound`)
    /// - The ETag does not match the stored `updated_at` (`PreconditionFailed`)
    /// - The stored status cannot move to the target status (`Conflict`)
    /// - Field validation fails (`InvalidInput`)
    /// - The write fails (`Query`)
    pub async fn update_status<C: ConnectionTrait>(
        &self,
        db: &C,
        request: &payment_requests::Model,
        action: &StatusAction,
        etag: &ETag,
    ) -> Result<payment_requests::Model, PaymentRequestError> {
        let current = payment_requests::Entity::find_by_id(request.id)
            .lock_exclusive()
            .one(db)
            .await
            .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?
            .ok_or_else(|| PaymentRequestError::not_found(request.id, "for PaymentRequest"))?;

        if !etag.matches(&current.updated_at) {
            warn!(payment_request_id = %request.id, "stale etag on payment request update");
            return Err(PaymentRequestError::PreconditionFailed {
                id: request.id,
                message: format!("ETag {etag} does not match the current version"),
            });
        }
        StatusTransitionService::require_transition(
            request.id,
            current.status.into(),
            action.new_status(),
        )?;

        StatusTransitionService::validate(&PaymentRequestFields {
            move_id: current.move_id,
            payment_request_number: &current.payment_request_number,
            sequence_number: current.sequence_number,
        })
        .into_result()
        .map_err(|errors| PaymentRequestError::InvalidInput {
            id: request.id,
            errors,
            message: "validation error updating payment request status".to_string(),
        })?;

        let previous = current.status;
        let mut active: payment_requests::ActiveModel = current.into();
        active.status = Set(action.new_status().into());
        match action {
            StatusAction::Review { reviewed_at, .. } => {
                active.reviewed_at = Set(Some((*reviewed_at).into()));
                active.rejection_reason = Set(request.rejection_reason.clone());
            }
            StatusAction::Process { timestamp, .. } => match timestamp {
                Some(ProcessedTimestamp::SentToGex(at)) => {
                    active.sent_to_gex_at = Set(Some((*at).into()));
                }
                Some(ProcessedTimestamp::ReceivedByGex(at)) => {
                    active.received_by_gex_at = Set(Some((*at).into()));
                }
                Some(ProcessedTimestamp::Paid(at)) => {
                    active.paid_at = Set(Some((*at).into()));
                }
                None => {}
            },
            StatusAction::Deprecate { .. } => {}
        }
        active.updated_at = Set(now());

        let updated = active
            .update(db)
            .await
            .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;

        info!(
            payment_request_id = %updated.id,
            from = ?previous,
            to = ?updated.status,
            "payment request status updated"
        );
        Ok(updated)
    }
}
