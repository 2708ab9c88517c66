//! Recalculating a pending payment request.
//!
//! The old request is deprecated and a replacement is created from its
//! prime-supplied params in the same transaction. Proof-of-service documents
//! move to the replacement, which links back to the request it replaces.

use std::sync::Arc;

use relo_core::payment_request::{
    ETag, ExistingServiceItem, PaymentRequestError, StatusTransitionService, build_replacement,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::{payment_requests, prime_uploads, proof_of_service_docs};

use super::creator::PaymentRequestCreator;
use super::payment_request::{
    PaymentRequestWithItems, ProofOfServiceDocDetail, ServiceItemDetail, load_payment_request, now,
};
use super::status_updater::PaymentRequestStatusUpdater;

/// Whether an operation owns its transaction or joins the caller's.
#[derive(Debug, Clone, Copy)]
pub enum TransactionScope<'a> {
    /// Begin, commit and roll back a transaction of its own.
    StartNew,
    /// Run inside the caller's transaction. The caller commits.
    Participate(&'a DatabaseTransaction),
}

/// Rows written while moving documents and linking the replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatedEntity {
    /// A proof-of-service document.
    ProofOfServiceDoc,
    /// A prime upload attached to a document.
    PrimeUpload,
    /// The link from the replacement to the request it replaces.
    PaymentRequestLink,
}

impl DuplicatedEntity {
    /// Entity name used in error reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProofOfServiceDoc => "ProofOfServiceDoc",
            Self::PrimeUpload => "PrimeUpload",
            Self::PaymentRequestLink => "PaymentRequest",
        }
    }

    fn save_failed(self, err: impl std::fmt::Display) -> PaymentRequestError {
        PaymentRequestError::query(self.as_str(), err)
    }
}

/// Replaces pending payment requests with freshly priced ones.
#[derive(Clone)]
pub struct PaymentRequestRecalculator {
    db: DatabaseConnection,
    creator: Arc<dyn PaymentRequestCreator>,
    status_updater: PaymentRequestStatusUpdater,
}

impl PaymentRequestRecalculator {
    /// Creates a new recalculator.
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

    /// Deprecates a pending request and returns its replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request does not exist (`NotFound`)
    /// - The request is not pending (`Conflict`)
    /// - The request changed since it was read (`PreconditionFailed`)
    /// - Creating or pricing the replacement fails (propagated unchanged)
    /// - Moving documents or linking the replacement fails (`Query`)
    ///
    /// Nothing is persisted on error when the scope is `StartNew`.
    #[instrument(skip(self, scope))]
    pub async fn recalculate(
        &self,
        scope: TransactionScope<'_>,
        payment_request_id: Uuid,
    ) -> Result<PaymentRequestWithItems, PaymentRequestError> {
        match scope {
            TransactionScope::Participate(txn) => {
                self.recalculate_in(txn, payment_request_id).await
            }
            TransactionScope::StartNew => {
                let txn = self
                    .db
                    .begin()
                    .await
                    .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;
                let replacement = self.recalculate_in(&txn, payment_request_id).await?;
                txn.commit()
                    .await
                    .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;
                Ok(replacement)
            }
        }
    }

    async fn recalculate_in(
        &self,
        txn: &DatabaseTransaction,
        payment_request_id: Uuid,
    ) -> Result<PaymentRequestWithItems, PaymentRequestError> {
        let old = load_payment_request(txn, payment_request_id).await?;
        let status = old.request.status.into();
        StatusTransitionService::require_pending(payment_request_id, status, "recalculated")?;

        let etag = ETag::generate(&old.request.updated_at);
        let action = StatusTransitionService::deprecate(payment_request_id, status)?;
        self.status_updater
            .update_status(txn, &old.request, &action, &etag)
            .await?;

        let existing: Vec<ExistingServiceItem> = old
            .service_items
            .iter()
            .map(ServiceItemDetail::to_existing)
            .collect();
        let input = build_replacement(old.request.move_id, old.request.is_final, &existing);

        let created = self.creator.create_payment_request(txn, &input).await?;
        let new_id = created.request.id;

        move_proof_of_service_docs(txn, &old.proof_of_service_docs, new_id).await?;
        link_replacement(txn, created.request, payment_request_id).await?;

        info!(
            old_payment_request_id = %payment_request_id,
            new_payment_request_id = %new_id,
            documents = old.proof_of_service_docs.len(),
            "payment request recalculated"
        );
        load_payment_request(txn, new_id).await
    }
}

/// Copies documents and uploads onto the replacement, then removes the originals.
async fn move_proof_of_service_docs(
    txn: &DatabaseTransaction,
    docs: &[ProofOfServiceDocDetail],
    new_payment_request_id: Uuid,
) -> Result<(), PaymentRequestError> {
    if docs.is_empty() {
        return Ok(());
    }

    for detail in docs {
        let now = now();
        let doc = proof_of_service_docs::ActiveModel {
            id: Set(Uuid::now_v7()),
            payment_request_id: Set(new_payment_request_id),
            is_weight_ticket: Set(detail.doc.is_weight_ticket),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| DuplicatedEntity::ProofOfServiceDoc.save_failed(e))?;

        for upload in &detail.prime_uploads {
            prime_uploads::ActiveModel {
                id: Set(Uuid::now_v7()),
                proof_of_service_docs_id: Set(doc.id),
                contractor_id: Set(upload.contractor_id),
                upload_id: Set(upload.upload_id),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(upload.deleted_at),
            }
            .insert(txn)
            .await
            .map_err(|e| DuplicatedEntity::PrimeUpload.save_failed(e))?;
        }
    }

    let old_doc_ids: Vec<Uuid> = docs.iter().map(|d| d.doc.id).collect();
    prime_uploads::Entity::delete_many()
        .filter(prime_uploads::Column::ProofOfServiceDocsId.is_in(old_doc_ids.clone()))
        .exec(txn)
        .await
        .map_err(|e| DuplicatedEntity::PrimeUpload.save_failed(e))?;
    proof_of_service_docs::Entity::delete_many()
        .filter(proof_of_service_docs::Column::Id.is_in(old_doc_ids))
        .exec(txn)
        .await
        .map_err(|e| DuplicatedEntity::ProofOfServiceDoc.save_failed(e))?;

    Ok(())
}

async fn link_replacement(
    txn: &DatabaseTransaction,
    replacement: payment_requests::Model,
    replaced_id: Uuid,
) -> Result<(), PaymentRequestError> {
    let mut active: payment_requests::ActiveModel = replacement.into();
    active.recalculation_of_payment_request_id = Set(Some(replaced_id));
    active.updated_at = Set(now());
    active
        .update(txn)
        .await
        .map_err(|e| DuplicatedEntity::PaymentRequestLink.save_failed(e))?;
    Ok(())
}
