//! Creating payment requests and pricing their service items.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use relo_core::payment_request::{
    CreationRules, NewPaymentRequest, NewPaymentServiceItem, PaymentRequestError,
    PaymentRequestFields, PaymentRequestStatus, PaymentServiceItemStatus, PricingError,
    StatusTransitionService, ValidationErrors,
};
use relo_shared::types::Cents;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::entities::{
    moves, mto_service_items, mto_shipments, payment_requests, payment_service_item_params,
    payment_service_items, re_services, service_item_param_keys,
};

use super::payment_request::{PaymentRequestWithItems, load_payment_request, now};
use super::price_lookup::PriceLookupService;

/// Creates payment requests inside a caller-owned transaction.
#[async_trait]
pub trait PaymentRequestCreator: Send + Sync {
    /// Creates and prices a payment request.
    async fn create_payment_request(
        &self,
        txn: &DatabaseTransaction,
        input: &NewPaymentRequest,
    ) -> Result<PaymentRequestWithItems, PaymentRequestError>;
}

/// Price and display params returned by the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedServiceItem {
    /// Price of the service item.
    pub price: Cents,
    /// Params the pricer derived, stored for display.
    pub display_params: Vec<(String, String)>,
}

/// The pricing engine.
#[async_trait]
pub trait ServiceItemPricer: Send + Sync {
    /// Prices a service item from its param values, keyed by param key name.
    async fn price_service_item(
        &self,
        txn: &DatabaseTransaction,
        code: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<PricedServiceItem, PricingError>;
}

/// What a param value lookup knows about the item being priced.
#[derive(Debug, Clone, Copy)]
pub struct LookupContext<'a> {
    /// Request being created.
    pub payment_request_id: Uuid,
    /// Owning move.
    pub move_id: Uuid,
    /// MTO service item being billed.
    pub mto_service_item: &'a mto_service_items::Model,
    /// Shipment of the MTO service item, if any.
    pub shipment: Option<&'a mto_shipments::Model>,
    /// Service of the MTO service item.
    pub service: &'a re_services::Model,
}

/// Derives param values the prime did not supply.
#[async_trait]
pub trait ServiceParamValueLookup: Send + Sync {
    /// Returns the value of `key` for the item in `context`.
    async fn lookup(
        &self,
        txn: &DatabaseTransaction,
        context: &LookupContext<'_>,
        key: &str,
    ) -> Result<String, PaymentRequestError>;
}

/// Default creator backed by the pricing engine and param lookups.
#[derive(Clone)]
pub struct PaymentRequestCreatorService {
    price_lookup: PriceLookupService,
    pricer: Arc<dyn ServiceItemPricer>,
    lookup: Arc<dyn ServiceParamValueLookup>,
}

impl PaymentRequestCreatorService {
    /// Creates a new creator.
    #[must_use]
    pub fn new(
        price_lookup: PriceLookupService,
        pricer: Arc<dyn ServiceItemPricer>,
        lookup: Arc<dyn ServiceParamValueLookup>,
    ) -> Self {
        Self {
            price_lookup,
            pricer,
            lookup,
        }
    }

    async fn create_service_item(
        &self,
        txn: &DatabaseTransaction,
        request: &payment_requests::Model,
        input: &NewPaymentServiceItem,
        shipments: &mut HashMap<Uuid, mto_shipments::Model>,
        keys: &mut ParamKeyCache,
    ) -> Result<(), PaymentRequestError> {
        let mto_service_item = mto_service_items::Entity::find_by_id(input.mto_service_item_id)
            .one(txn)
            .await
            .map_err(|e| PaymentRequestError::query("MTOServiceItem", e))?
            .ok_or_else(|| {
                PaymentRequestError::not_found(input.mto_service_item_id, "for MTO Service Item")
            })?;
        CreationRules::require_same_move(
            request.move_id,
            mto_service_item.id,
            mto_service_item.move_id,
        )?;

        let shipment = match mto_service_item.mto_shipment_id {
            Some(shipment_id) => Some(verified_shipment(txn, shipments, shipment_id).await?),
            None => None,
        };

        let service = re_services::Entity::find_by_id(mto_service_item.re_service_id)
            .one(txn)
            .await
            .map_err(|e| PaymentRequestError::query("ReService", e))?
            .ok_or_else(|| {
                PaymentRequestError::not_found(mto_service_item.re_service_id, "for ReService")
            })?;

        let now = now();
        let item = payment_service_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            payment_request_id: Set(request.id),
            mto_service_item_id: Set(mto_service_item.id),
            status: Set(PaymentServiceItemStatus::Requested.into()),
            price_cents: Set(None),
            rejection_reason: Set(None),
            requested_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| PaymentRequestError::query("PaymentServiceItem", e))?;

        let mut values: BTreeMap<String, String> = BTreeMap::new();
        for param in &input.incoming_params {
            let key = keys.get(txn, &param.key).await?;
            insert_param(txn, item.id, &key, &param.value).await?;
            values.insert(param.key.clone(), param.value.clone());
        }

        let (priced_as, required) = self
            .price_lookup
            .fetch_service_param_list(txn, &service)
            .await?;

        let context = LookupContext {
            payment_request_id: request.id,
            move_id: request.move_id,
            mto_service_item: &mto_service_item,
            shipment: shipment.as_ref(),
            service: &service,
        };
        for requirement in &required {
            if values.contains_key(&requirement.key.key) {
                continue;
            }
            let value = self
                .lookup
                .lookup(txn, &context, &requirement.key.key)
                .await?;
            if value.is_empty() && requirement.service_param.is_optional {
                continue;
            }
            insert_param(txn, item.id, &requirement.key, &value).await?;
            values.insert(requirement.key.key.clone(), value);
        }

        self.price_lookup
            .valid_service_param_list(
                mto_service_item.id,
                &priced_as,
                &required,
                values.keys().map(String::as_str),
            )
            .map_err(|missing| {
                let mut errors = ValidationErrors::new();
                for key in &missing.missing_keys {
                    errors.add("service_params", format!("{key} is required for pricing"));
                }
                PaymentRequestError::InvalidInput {
                    id: item.id,
                    errors,
                    message: missing.to_string(),
                }
            })?;

        match self
            .pricer
            .price_service_item(txn, &service.code, &values)
            .await
        {
            Ok(priced) => {
                for (key_name, value) in &priced.display_params {
                    let key = keys.get(txn, key_name).await?;
                    insert_param(txn, item.id, &key, value).await?;
                }
                let mut active: payment_service_items::ActiveModel = item.into();
                active.price_cents = Set(Some(priced.price.get()));
                active
                    .update(txn)
                    .await
                    .map_err(|e| PaymentRequestError::query("PaymentServiceItem", e))?;
            }
            Err(PricingError::NotImplemented { code }) => {
                debug!(%code, payment_service_item_id = %item.id, "no pricer, item left unpriced");
            }
            Err(err) => return Err(err.into()),
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentRequestCreator for PaymentRequestCreatorService {
    #[instrument(
        skip(self, txn, input),
        fields(move_id = %input.move_id, items = input.service_items.len())
    )]
    async fn create_payment_request(
        &self,
        txn: &DatabaseTransaction,
        input: &NewPaymentRequest,
    ) -> Result<PaymentRequestWithItems, PaymentRequestError> {
        CreationRules::require_move_id(input.move_id)?;

        let request = insert_request(txn, input).await?;

        let mut shipments = HashMap::new();
        let mut keys = ParamKeyCache::default();
        for item in &input.service_items {
            self.create_service_item(txn, &request, item, &mut shipments, &mut keys)
                .await?;
        }

        info!(
            payment_request_id = %request.id,
            payment_request_number = %request.payment_request_number,
            "payment request created"
        );
        load_payment_request(txn, request.id).await
    }
}

async fn insert_request(
    txn: &DatabaseTransaction,
    input: &NewPaymentRequest,
) -> Result<payment_requests::Model, PaymentRequestError> {
    let move_row = moves::Entity::find_by_id(input.move_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| PaymentRequestError::query("Move", e))?
        .ok_or_else(|| PaymentRequestError::not_found(input.move_id, "for Move"))?;

    let existing = payment_requests::Entity::find()
        .filter(payment_requests::Column::MoveId.eq(input.move_id))
        .all(txn)
        .await
        .map_err(|e| PaymentRequestError::query("PaymentRequest", e))?;

    CreationRules::require_no_final(
        input.move_id,
        existing.iter().map(|r| (r.is_final, r.status.into())),
    )?;
    let reference_id =
        CreationRules::require_reference_id(move_row.id, move_row.reference_id.as_deref())?;

    let sequence_number =
        CreationRules::next_sequence(existing.iter().map(|r| r.sequence_number).max());
    let payment_request_number =
        CreationRules::payment_request_number(reference_id, sequence_number);

    StatusTransitionService::validate(&PaymentRequestFields {
        move_id: input.move_id,
        payment_request_number: &payment_request_number,
        sequence_number,
    })
    .into_result()
    .map_err(|errors| PaymentRequestError::InvalidCreateInput {
        errors,
        message: "validation error creating payment request".to_string(),
    })?;

    let now = now();
    payment_requests::ActiveModel {
        id: Set(Uuid::now_v7()),
        move_id: Set(input.move_id),
        is_final: Set(input.is_final),
        rejection_reason: Set(None),
        status: Set(PaymentRequestStatus::Pending.into()),
        requested_at: Set(now),
        reviewed_at: Set(None),
        sent_to_gex_at: Set(None),
        received_by_gex_at: Set(None),
        paid_at: Set(None),
        payment_request_number: Set(payment_request_number),
        sequence_number: Set(sequence_number),
        recalculation_of_payment_request_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
    .map_err(|e| PaymentRequestError::query("PaymentRequest", e))
}

async fn verified_shipment(
    txn: &DatabaseTransaction,
    verified: &mut HashMap<Uuid, mto_shipments::Model>,
    shipment_id: Uuid,
) -> Result<mto_shipments::Model, PaymentRequestError> {
    if let Some(shipment) = verified.get(&shipment_id) {
        return Ok(shipment.clone());
    }

    let shipment = mto_shipments::Entity::find_by_id(shipment_id)
        .one(txn)
        .await
        .map_err(|e| PaymentRequestError::query("MTOShipment", e))?
        .ok_or_else(|| PaymentRequestError::not_found(shipment_id, "for MTO Shipment"))?;
    CreationRules::require_prime_shipment(shipment.id, shipment.uses_external_vendor)?;

    verified.insert(shipment_id, shipment.clone());
    Ok(shipment)
}

/// Param keys already fetched by name.
#[derive(Default)]
struct ParamKeyCache(HashMap<String, service_item_param_keys::Model>);

impl ParamKeyCache {
    async fn get(
        &mut self,
        txn: &DatabaseTransaction,
        name: &str,
    ) -> Result<service_item_param_keys::Model, PaymentRequestError> {
        if let Some(key) = self.0.get(name) {
            return Ok(key.clone());
        }

        let key = service_item_param_keys::Entity::find()
            .filter(service_item_param_keys::Column::Key.eq(name))
            .one(txn)
            .await
            .map_err(|e| PaymentRequestError::query("ServiceItemParamKey", e))?
            .ok_or_else(|| {
                PaymentRequestError::not_found(
                    Uuid::nil(),
                    format!("Service Item Param Key {name}: FETCH_NOT_FOUND"),
                )
            })?;

        self.0.insert(name.to_string(), key.clone());
        Ok(key)
    }
}

async fn insert_param(
    txn: &DatabaseTransaction,
    payment_service_item_id: Uuid,
    key: &service_item_param_keys::Model,
    value: &str,
) -> Result<(), PaymentRequestError> {
    let now = now();
    payment_service_item_params::ActiveModel {
        id: Set(Uuid::now_v7()),
        payment_service_item_id: Set(payment_service_item_id),
        service_item_param_key_id: Set(key.id),
        value: Set(value.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
    .map_err(|e| PaymentRequestError::query("PaymentServiceItemParam", e))?;
    Ok(())
}
