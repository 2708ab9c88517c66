//! Loading payment requests with their service items and documents.
//!
//! Related rows are fetched in batches and stitched together in memory, so a
//! request with many items costs a fixed number of queries.

use std::collections::HashMap;

use chrono::{SubsecRound, Utc};
use relo_core::payment_request::{
    ExistingParam, ExistingServiceItem, PaymentRequestError, ReServiceCode,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{
    mto_service_items, mto_shipments, payment_requests, payment_service_item_params,
    payment_service_items, prime_uploads, proof_of_service_docs, re_services,
    service_item_param_keys,
};

/// A stored param together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamWithKey {
    /// The stored value.
    pub param: payment_service_item_params::Model,
    /// The key it belongs to.
    pub key: service_item_param_keys::Model,
}

/// A payment service item with the rows needed to price or report on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceItemDetail {
    /// The payment service item.
    pub item: payment_service_items::Model,
    /// The MTO service item being billed.
    pub mto_service_item: mto_service_items::Model,
    /// The service the MTO service item provides.
    pub re_service: re_services::Model,
    /// The shipment, when the MTO service item is shipment level.
    pub shipment: Option<mto_shipments::Model>,
    /// Stored params with keys.
    pub params: Vec<ParamWithKey>,
}

impl ServiceItemDetail {
    /// Parsed service code. `None` for codes this engine does not know.
    pub fn code(&self) -> Option<ReServiceCode> {
        ReServiceCode::parse(&self.re_service.code)
    }

    /// Value of the first param with `key`.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key.key == key)
            .map(|p| p.param.value.as_str())
    }

    /// The item as input for a replacement request.
    pub fn to_existing(&self) -> ExistingServiceItem {
        ExistingServiceItem {
            mto_service_item_id: self.item.mto_service_item_id,
            priority: self.re_service.priority,
            params: self
                .params
                .iter()
                .map(|p| ExistingParam {
                    key: p.key.key.clone(),
                    origin: p.key.origin.into(),
                    value: p.param.value.clone(),
                })
                .collect(),
        }
    }
}

/// A proof-of-service document with its uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofOfServiceDocDetail {
    /// The document row.
    pub doc: proof_of_service_docs::Model,
    /// Uploads attached to the document, soft-deleted ones included.
    pub prime_uploads: Vec<prime_uploads::Model>,
}

/// A payment request with its service items and documents.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequestWithItems {
    /// The payment request row.
    pub request: payment_requests::Model,
    /// Service items in creation order.
    pub service_items: Vec<ServiceItemDetail>,
    /// Proof-of-service documents in creation order.
    pub proof_of_service_docs: Vec<ProofOfServiceDocDetail>,
}

/// Current time at the precision the database stores.
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

/// Fetches a payment request row.
pub async fn find_payment_request<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<payment_requests::Model, PaymentRequestError> {
    payment_requests::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?
        .ok_or_else(|| PaymentRequestError::not_found(id, "for PaymentRequest"))
}

/// Fetches a payment request with service items and documents.
pub async fn load_payment_request<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<PaymentRequestWithItems, PaymentRequestError> {
    let request = find_payment_request(db, id).await?;

    let items = payment_service_items::Entity::find()
        .filter(payment_service_items::Column::PaymentRequestId.eq(id))
        .order_by_asc(payment_service_items::Column::CreatedAt)
        .order_by_asc(payment_service_items::Column::Id)
        .all(db)
        .await
        .map_err(|e| PaymentRequestError::query("PaymentServiceItem", e))?;

    let service_items = load_service_items(db, items).await?;
    let proof_of_service_docs = load_proof_of_service_docs(db, id).await?;

    Ok(PaymentRequestWithItems {
        request,
        service_items,
        proof_of_service_docs,
    })
}

/// Attaches MTO service items, services, shipments and params to payment
/// service items. The input order is preserved.
pub async fn load_service_items<C: ConnectionTrait>(
    db: &C,
    items: Vec<payment_service_items::Model>,
) -> Result<Vec<ServiceItemDetail>, PaymentRequestError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let mto_ids: Vec<Uuid> = items.iter().map(|i| i.mto_service_item_id).collect();
    let mto_items: HashMap<Uuid, mto_service_items::Model> = mto_service_items::Entity::find()
        .filter(mto_service_items::Column::Id.is_in(mto_ids))
        .all(db)
        .await
        .map_err(|e| PaymentRequestError::query("MTOServiceItem", e))?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let service_ids: Vec<Uuid> = mto_items.values().map(|m| m.re_service_id).collect();
    let services: HashMap<Uuid, re_services::Model> = re_services::Entity::find()
        .filter(re_services::Column::Id.is_in(service_ids))
        .all(db)
        .await
        .map_err(|e| PaymentRequestError::query("ReService", e))?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let shipment_ids: Vec<Uuid> = mto_items.values().filter_map(|m| m.mto_shipment_id).collect();
    let shipments: HashMap<Uuid, mto_shipments::Model> = if shipment_ids.is_empty() {
        HashMap::new()
    } else {
        mto_shipments::Entity::find()
            .filter(mto_shipments::Column::Id.is_in(shipment_ids))
            .all(db)
            .await
            .map_err(|e| PaymentRequestError::query("MTOShipment", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };

    let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let mut params_by_item = load_params(db, item_ids).await?;

    items
        .into_iter()
        .map(|item| {
            let mto_service_item = mto_items
                .get(&item.mto_service_item_id)
                .cloned()
                .ok_or_else(|| {
                    PaymentRequestError::not_found(item.mto_service_item_id, "for MTO Service Item")
                })?;
            let re_service = services
                .get(&mto_service_item.re_service_id)
                .cloned()
                .ok_or_else(|| {
                    PaymentRequestError::not_found(mto_service_item.re_service_id, "for ReService")
                })?;
            let shipment = mto_service_item
                .mto_shipment_id
                .and_then(|id| shipments.get(&id).cloned());
            let params = params_by_item.remove(&item.id).unwrap_or_default();

            Ok(ServiceItemDetail {
                item,
                mto_service_item,
                re_service,
                shipment,
                params,
            })
        })
        .collect()
}

async fn load_params<C: ConnectionTrait>(
    db: &C,
    item_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<ParamWithKey>>, PaymentRequestError> {
    let rows = payment_service_item_params::Entity::find()
        .filter(payment_service_item_params::Column::PaymentServiceItemId.is_in(item_ids))
        .find_also_related(service_item_param_keys::Entity)
        .order_by_asc(payment_service_item_params::Column::CreatedAt)
        .order_by_asc(payment_service_item_params::Column::Id)
        .all(db)
        .await
        .map_err(|e| PaymentRequestError::query("PaymentServiceItemParam", e))?;

    let mut by_item: HashMap<Uuid, Vec<ParamWithKey>> = HashMap::new();
    for (param, key) in rows {
        let key = key.ok_or_else(|| {
            PaymentRequestError::not_found(
                param.service_item_param_key_id,
                "Service Item Param Key ID",
            )
        })?;
        by_item
            .entry(param.payment_service_item_id)
            .or_default()
            .push(ParamWithKey { param, key });
    }
    Ok(by_item)
}

async fn load_proof_of_service_docs<C: ConnectionTrait>(
    db: &C,
    payment_request_id: Uuid,
) -> Result<Vec<ProofOfServiceDocDetail>, PaymentRequestError> {
    let docs = proof_of_service_docs::Entity::find()
        .filter(proof_of_service_docs::Column::PaymentRequestId.eq(payment_request_id))
        .order_by_asc(proof_of_service_docs::Column::CreatedAt)
        .order_by_asc(proof_of_service_docs::Column::Id)
        .all(db)
        .await
        .map_err(|e| PaymentRequestError::query("ProofOfServiceDoc", e))?;

    if docs.is_empty() {
        return Ok(Vec::new());
    }

    let doc_ids: Vec<Uuid> = docs.iter().map(|d| d.id).collect();
    let mut uploads_by_doc: HashMap<Uuid, Vec<prime_uploads::Model>> = HashMap::new();
    for upload in prime_uploads::Entity::find()
        .filter(prime_uploads::Column::ProofOfServiceDocsId.is_in(doc_ids))
        .order_by_asc(prime_uploads::Column::CreatedAt)
        .order_by_asc(prime_uploads::Column::Id)
        .all(db)
        .await
        .map_err(|e| PaymentRequestError::query("PrimeUpload", e))?
    {
        uploads_by_doc
            .entry(upload.proof_of_service_docs_id)
            .or_default()
            .push(upload);
    }

    Ok(docs
        .into_iter()
        .map(|doc| {
            let prime_uploads = uploads_by_doc.remove(&doc.id).unwrap_or_default();
            ProofOfServiceDocDetail { doc, prime_uploads }
        })
        .collect())
}
