//! Recalculating every pending payment request affected by a shipment change.

use std::collections::HashMap;

use relo_core::payment_request::{
    CandidateServiceItem, PaymentRequestError, is_recalculation_candidate,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::{
    mto_service_items, payment_requests, payment_service_item_params, payment_service_items,
    service_item_param_keys,
};

use super::payment_request::PaymentRequestWithItems;
use super::recalculator::{PaymentRequestRecalculator, TransactionScope};

/// Recalculates the pending requests priced with a shipment's weight.
#[derive(Clone)]
pub struct ShipmentRecalculator {
    db: DatabaseConnection,
    recalculator: PaymentRequestRecalculator,
}

impl ShipmentRecalculator {
    /// Creates a new shipment recalculator.
    #[must_use]
    pub fn new(db: DatabaseConnection, recalculator: PaymentRequestRecalculator) -> Self {
        Self { db, recalculator }
    }

    /// Returns the ids of the requests a recalculation of `shipment_id` would
    /// replace, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Query` on database failure.
    pub async fn find_candidates<C: ConnectionTrait>(
        db: &C,
        shipment_id: Uuid,
    ) -> Result<Vec<Uuid>, PaymentRequestError> {
        let rows = payment_service_items::Entity::find()
            .join(
                JoinType::InnerJoin,
                payment_service_items::Relation::MtoServiceItems.def(),
            )
            .filter(mto_service_items::Column::MtoShipmentId.eq(shipment_id))
            .find_also_related(payment_requests::Entity)
            .order_by_asc(payment_requests::Column::CreatedAt)
            .order_by_asc(payment_requests::Column::Id)
            .all(db)
            .await
            .map_err(|e| PaymentRequestError::query("PaymentServiceItem", e))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let item_ids: Vec<Uuid> = rows.iter().map(|(item, _)| item.id).collect();
        let mut keys_by_item: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (param, key) in payment_service_item_params::Entity::find()
            .filter(payment_service_item_params::Column::PaymentServiceItemId.is_in(item_ids))
            .find_also_related(service_item_param_keys::Entity)
            .all(db)
            .await
            .map_err(|e| PaymentRequestError::query("PaymentServiceItemParam", e))?
        {
            if let Some(key) = key {
                keys_by_item
                    .entry(param.payment_service_item_id)
                    .or_default()
                    .push(key.key);
            }
        }

        let mut requests: Vec<(payment_requests::Model, Vec<CandidateServiceItem>)> = Vec::new();
        for (item, request) in rows {
            let Some(request) = request else { continue };
            let candidate = CandidateServiceItem {
                shipment_id: Some(shipment_id),
                param_keys: keys_by_item.remove(&item.id).unwrap_or_default(),
            };
            match requests.iter_mut().find(|(r, _)| r.id == request.id) {
                Some((_, items)) => items.push(candidate),
                None => requests.push((request, vec![candidate])),
            }
        }

        Ok(requests
            .into_iter()
            .filter(|(request, items)| {
                is_recalculation_candidate(shipment_id, request.status.into(), items)
            })
            .map(|(request, _)| request.id)
            .collect())
    }

    /// Recalculates every candidate request in one transaction.
    ///
    /// Either all candidates are replaced or none are. A shipment without
    /// candidates, or an unknown shipment, yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns the first recalculation error. Nothing is persisted on error.
    #[instrument(skip(self))]
    pub async fn recalculate_for_shipment(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<PaymentRequestWithItems>, PaymentRequestError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;

        let candidates = Self::find_candidates(&txn, shipment_id).await?;
        let mut replacements = Vec::with_capacity(candidates.len());
        for payment_request_id in candidates {
            let replacement = self
                .recalculator
                .recalculate(TransactionScope::Participate(&txn), payment_request_id)
                .await?;
            replacements.push(replacement);
        }

        txn.commit()
            .await
            .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;

        info!(
            %shipment_id,
            recalculated = replacements.len(),
            "shipment payment requests recalculated"
        );
        Ok(replacements)
    }
}
