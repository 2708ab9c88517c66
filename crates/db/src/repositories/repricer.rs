//! Repricing a pending payment request.

use std::sync::Arc;

use relo_core::payment_request::{
    ETag, ExistingServiceItem, PaymentRequestError, PaymentRequestStatus,
    StatusTransitionService, build_replacement,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use super::creator::PaymentRequestCreator;
use super::payment_request::{PaymentRequestWithItems, ServiceItemDetail, load_payment_request};
use super::status_updater::PaymentRequestStatusUpdater;

/// Rejects a pending request and submits a freshly priced copy.
///
/// Unlike recalculation, proof-of-service documents stay on the rejected
/// request and the new request carries no link to it.
#[derive(Clone)]
pub struct PaymentRequestRepricer {
    db: DatabaseConnection,
    creator: Arc<dyn PaymentRequestCreator>,
    status_updater: PaymentRequestStatusUpdater,
}

impl PaymentRequestRepricer {
    /// Creates a new repricer.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        creator: Arc<dyn PaymentRequestCreator>,
        status_updater: PaymentRequestStatusUpdater,
    ) -> Self {
        Self {
            db,
            creator,
            status_updater,
        }
    }

    /// Reprices a pending request in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown request, `Conflict` if it is not
    /// pending, and any creator error unchanged. Nothing is persisted on error.
    #[instrument(skip(self))]
    pub async fn reprice(
        &self,
        payment_request_id: Uuid,
    ) -> Result<PaymentRequestWithItems, PaymentRequestError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;

        let old = load_payment_request(&txn, payment_request_id).await?;
        StatusTransitionService::require_pending(
            payment_request_id,
            old.request.status.into(),
            "repriced",
        )?;

        let etag = ETag::generate(&old.request.updated_at);
        let mut rejected = old.request.clone();
        rejected.status = PaymentRequestStatus::ReviewedAllRejected.into();
        self.status_updater
            .update_reviewed_status(&txn, &rejected, &etag)
            .await?;

        let existing: Vec<ExistingServiceItem> = old
            .service_items
            .iter()
            .map(ServiceItemDetail::to_existing)
            .collect();
        let input = build_replacement(old.request.move_id, old.request.is_final, &existing);
        let created = self.creator.create_payment_request(&txn, &input).await?;

        txn.commit()
            .await
            .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;

        info!(
            old_payment_request_id = %payment_request_id,
            new_payment_request_id = %created.request.id,
            "payment request repriced"
        );
        Ok(created)
    }
}
