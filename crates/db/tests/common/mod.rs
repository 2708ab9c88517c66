//! Shared fixtures for the database integration tests.
//!
//! Every test gets its own in-memory SQLite database with the schema built
//! from the entities.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, SubsecRound, Utc};
use relo_core::payment_request::{
    NewPaymentRequest, PaymentRequestError, PaymentRequestStatus, PaymentServiceItemStatus,
    PricingError, ServiceCodeSwaps, param_keys,
};
use relo_db::entities::sea_orm_active_enums::ServiceItemParamOrigin;
use relo_db::entities::{
    moves, mto_service_items, mto_shipments, payment_requests, payment_service_item_params,
    payment_service_items, prime_uploads, proof_of_service_docs, re_services,
    service_item_param_keys, service_params,
};
use relo_db::repositories::{
    LookupContext, PaymentRequestCreator, PaymentRequestCreatorService, PaymentRequestRecalculator,
    PaymentRequestStatusUpdater, PaymentRequestWithItems, PriceLookupService, PricedServiceItem,
    ServiceItemPricer, ServiceParamValueLookup,
};
use relo_shared::types::Cents;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, EntityTrait, Schema, Set,
};
use uuid::Uuid;

/// Price the stub pricer gives every item it knows.
pub const STUB_PRICE: i64 = 12_345;

pub fn ts() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

/// Opens a fresh in-memory database with every table created.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    macro_rules! create {
        ($($entity:path),+ $(,)?) => {
            $(
                db.execute(backend.build(&schema.create_table_from_entity($entity)))
                    .await
                    .expect("Failed to create table");
            )+
        };
    }
    create!(
        moves::Entity,
        mto_shipments::Entity,
        re_services::Entity,
        service_item_param_keys::Entity,
        service_params::Entity,
        mto_service_items::Entity,
        payment_requests::Entity,
        payment_service_items::Entity,
        payment_service_item_params::Entity,
        proof_of_service_docs::Entity,
        prime_uploads::Entity,
    );

    db
}

// ============================================================================
// Reference data
// ============================================================================

/// Services and param keys most tests need.
pub struct Catalog {
    pub dlh: re_services::Model,
    pub fsc: re_services::Model,
    pub ms: re_services::Model,
    pub doasit: re_services::Model,
    pub ddasit: re_services::Model,
    pub weight_original: service_item_param_keys::Model,
    pub weight_billed: service_item_param_keys::Model,
    pub contract_code: service_item_param_keys::Model,
    pub price_rate: service_item_param_keys::Model,
    pub sit_start: service_item_param_keys::Model,
    pub sit_end: service_item_param_keys::Model,
    pub number_days_sit: service_item_param_keys::Model,
}

impl Catalog {
    /// Inserts the catalog.
    ///
    /// Priorities: DLH 1, DOASIT 2, DDASIT 2, FSC 3, MS 5.
    /// DLH needs WeightOriginal, WeightBilled and the pricer key
    /// PriceRateOrFactor. FSC needs WeightOriginal. MS needs an optional
    /// ContractCode.
    pub async fn insert<C: ConnectionTrait>(db: &C) -> Self {
        let dlh = insert_service(db, "DLH", 1).await;
        let fsc = insert_service(db, "FSC", 3).await;
        let ms = insert_service(db, "MS", 5).await;
        let doasit = insert_service(db, "DOASIT", 2).await;
        let ddasit = insert_service(db, "DDASIT", 2).await;

        let weight_original =
            insert_param_key(db, param_keys::WEIGHT_ORIGINAL, ServiceItemParamOrigin::Prime).await;
        let weight_billed =
            insert_param_key(db, param_keys::WEIGHT_BILLED, ServiceItemParamOrigin::System).await;
        let contract_code =
            insert_param_key(db, "ContractCode", ServiceItemParamOrigin::System).await;
        let price_rate =
            insert_param_key(db, "PriceRateOrFactor", ServiceItemParamOrigin::Pricer).await;
        let sit_start = insert_param_key(
            db,
            param_keys::SIT_PAYMENT_REQUEST_START,
            ServiceItemParamOrigin::Prime,
        )
        .await;
        let sit_end = insert_param_key(
            db,
            param_keys::SIT_PAYMENT_REQUEST_END,
            ServiceItemParamOrigin::Prime,
        )
        .await;
        let number_days_sit =
            insert_param_key(db, param_keys::NUMBER_DAYS_SIT, ServiceItemParamOrigin::System).await;

        insert_service_param(db, dlh.id, weight_original.id, false).await;
        insert_service_param(db, dlh.id, weight_billed.id, false).await;
        insert_service_param(db, dlh.id, price_rate.id, false).await;
        insert_service_param(db, fsc.id, weight_original.id, false).await;
        insert_service_param(db, ms.id, contract_code.id, true).await;

        Self {
            dlh,
            fsc,
            ms,
            doasit,
            ddasit,
            weight_original,
            weight_billed,
            contract_code,
            price_rate,
            sit_start,
            sit_end,
            number_days_sit,
        }
    }
}

pub async fn insert_service<C: ConnectionTrait>(
    db: &C,
    code: &str,
    priority: i32,
) -> re_services::Model {
    let now = ts();
    re_services::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set(code.to_string()),
        name: Set(format!("{code} service")),
        priority: Set(priority),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert service")
}

pub async fn insert_param_key<C: ConnectionTrait>(
    db: &C,
    key: &str,
    origin: ServiceItemParamOrigin,
) -> service_item_param_keys::Model {
    let now = ts();
    service_item_param_keys::ActiveModel {
        id: Set(Uuid::now_v7()),
        key: Set(key.to_string()),
        description: Set(format!("{key} param")),
        param_type: Set("STRING".to_string()),
        origin: Set(origin),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert param key")
}

pub async fn insert_service_param<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    key_id: Uuid,
    is_optional: bool,
) -> service_params::Model {
    let now = ts();
    service_params::ActiveModel {
        id: Set(Uuid::now_v7()),
        service_id: Set(service_id),
        service_item_param_key_id: Set(key_id),
        is_optional: Set(is_optional),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert service param")
}

// ============================================================================
// Moves and shipments
// ============================================================================

pub async fn insert_move<C: ConnectionTrait>(db: &C, reference_id: Option<&str>) -> moves::Model {
    let now = ts();
    moves::ActiveModel {
        id: Set(Uuid::now_v7()),
        locator: Set(Uuid::new_v4().simple().to_string()[..6].to_uppercase()),
        reference_id: Set(reference_id.map(str::to_string)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert move")
}

pub async fn insert_shipment<C: ConnectionTrait>(
    db: &C,
    move_id: Uuid,
    sit_days_allowance: Option<i32>,
    uses_external_vendor: bool,
) -> mto_shipments::Model {
    let now = ts();
    mto_shipments::ActiveModel {
        id: Set(Uuid::now_v7()),
        move_id: Set(move_id),
        sit_days_allowance: Set(sit_days_allowance),
        prime_actual_weight: Set(Some(4_000)),
        uses_external_vendor: Set(uses_external_vendor),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert shipment")
}

pub async fn insert_mto_service_item<C: ConnectionTrait>(
    db: &C,
    move_id: Uuid,
    shipment_id: Option<Uuid>,
    service_id: Uuid,
    sit_entry_date: Option<NaiveDate>,
) -> mto_service_items::Model {
    let now = ts();
    mto_service_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        move_id: Set(move_id),
        mto_shipment_id: Set(shipment_id),
        re_service_id: Set(service_id),
        status: Set("APPROVED".to_string()),
        sit_entry_date: Set(sit_entry_date),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert MTO service item")
}

// ============================================================================
// Payment requests
// ============================================================================

pub async fn insert_payment_request<C: ConnectionTrait>(
    db: &C,
    move_id: Uuid,
    sequence_number: i32,
    status: PaymentRequestStatus,
    is_final: bool,
) -> payment_requests::Model {
    let now = ts();
    payment_requests::ActiveModel {
        id: Set(Uuid::now_v7()),
        move_id: Set(move_id),
        is_final: Set(is_final),
        rejection_reason: Set(None),
        status: Set(status.into()),
        requested_at: Set(now),
        reviewed_at: Set(None),
        sent_to_gex_at: Set(None),
        received_by_gex_at: Set(None),
        paid_at: Set(None),
        payment_request_number: Set(format!("{move_id}-{sequence_number}")),
        sequence_number: Set(sequence_number),
        recalculation_of_payment_request_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert payment request")
}

pub async fn insert_payment_service_item<C: ConnectionTrait>(
    db: &C,
    payment_request_id: Uuid,
    mto_service_item_id: Uuid,
    status: PaymentServiceItemStatus,
) -> payment_service_items::Model {
    let now = ts();
    payment_service_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        payment_request_id: Set(payment_request_id),
        mto_service_item_id: Set(mto_service_item_id),
        status: Set(status.into()),
        price_cents: Set(Some(STUB_PRICE)),
        rejection_reason: Set(None),
        requested_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert payment service item")
}

pub async fn insert_item_param<C: ConnectionTrait>(
    db: &C,
    payment_service_item_id: Uuid,
    key_id: Uuid,
    value: &str,
) -> payment_service_item_params::Model {
    let now = ts();
    payment_service_item_params::ActiveModel {
        id: Set(Uuid::now_v7()),
        payment_service_item_id: Set(payment_service_item_id),
        service_item_param_key_id: Set(key_id),
        value: Set(value.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert payment service item param")
}

pub async fn insert_doc<C: ConnectionTrait>(
    db: &C,
    payment_request_id: Uuid,
    is_weight_ticket: bool,
) -> proof_of_service_docs::Model {
    let now = ts();
    proof_of_service_docs::ActiveModel {
        id: Set(Uuid::now_v7()),
        payment_request_id: Set(payment_request_id),
        is_weight_ticket: Set(is_weight_ticket),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert proof of service doc")
}

pub async fn insert_upload<C: ConnectionTrait>(
    db: &C,
    doc_id: Uuid,
    deleted: bool,
) -> prime_uploads::Model {
    let now = ts();
    prime_uploads::ActiveModel {
        id: Set(Uuid::now_v7()),
        proof_of_service_docs_id: Set(doc_id),
        contractor_id: Set(Uuid::now_v7()),
        upload_id: Set(Uuid::now_v7()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(deleted.then_some(now)),
    }
    .insert(db)
    .await
    .expect("Failed to insert prime upload")
}

pub async fn reload_request(db: &DatabaseConnection, id: Uuid) -> payment_requests::Model {
    payment_requests::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to query payment request")
        .expect("payment request should exist")
}

// ============================================================================
// A move with one shipment and a pending request billing DLH and FSC
// ============================================================================

pub struct PendingScenario {
    pub catalog: Catalog,
    pub move_row: moves::Model,
    pub shipment: mto_shipments::Model,
    pub dlh_item: mto_service_items::Model,
    pub fsc_item: mto_service_items::Model,
    pub request: payment_requests::Model,
}

impl PendingScenario {
    /// The pending request lists FSC before DLH and both carry WeightOriginal.
    pub async fn insert(db: &DatabaseConnection) -> Self {
        let catalog = Catalog::insert(db).await;
        let move_row = insert_move(db, Some("1234-5678")).await;
        let shipment = insert_shipment(db, move_row.id, Some(90), false).await;
        let dlh_item =
            insert_mto_service_item(db, move_row.id, Some(shipment.id), catalog.dlh.id, None).await;
        let fsc_item =
            insert_mto_service_item(db, move_row.id, Some(shipment.id), catalog.fsc.id, None).await;

        let request =
            insert_payment_request(db, move_row.id, 1, PaymentRequestStatus::Pending, false).await;
        let fsc = insert_payment_service_item(
            db,
            request.id,
            fsc_item.id,
            PaymentServiceItemStatus::Requested,
        )
        .await;
        insert_item_param(db, fsc.id, catalog.weight_original.id, "3500").await;
        let dlh = insert_payment_service_item(
            db,
            request.id,
            dlh_item.id,
            PaymentServiceItemStatus::Requested,
        )
        .await;
        insert_item_param(db, dlh.id, catalog.weight_original.id, "3500").await;
        insert_item_param(db, dlh.id, catalog.weight_billed.id, "3500").await;
        insert_item_param(db, dlh.id, catalog.price_rate.id, "1.25").await;

        Self {
            catalog,
            move_row,
            shipment,
            dlh_item,
            fsc_item,
            request,
        }
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Prices every item at [`STUB_PRICE`]. `MS` has no pricer and `fail_code`
/// fails.
#[derive(Default)]
pub struct StubPricer {
    pub fail_code: Option<String>,
}

#[async_trait]
impl ServiceItemPricer for StubPricer {
    async fn price_service_item(
        &self,
        _txn: &DatabaseTransaction,
        code: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<PricedServiceItem, PricingError> {
        if code == "MS" {
            return Err(PricingError::NotImplemented {
                code: code.to_string(),
            });
        }
        if self.fail_code.as_deref() == Some(code) {
            return Err(PricingError::Failed {
                code: code.to_string(),
                message: "rate table missing".to_string(),
            });
        }

        let display_params = if code == "DLH" && params.contains_key(param_keys::WEIGHT_BILLED) {
            vec![("PriceRateOrFactor".to_string(), "1.25".to_string())]
        } else {
            Vec::new()
        };
        Ok(PricedServiceItem {
            price: Cents::new(STUB_PRICE),
            display_params,
        })
    }
}

/// Derives billed weight from the shipment. Every other key is empty.
pub struct StubLookup;

#[async_trait]
impl ServiceParamValueLookup for StubLookup {
    async fn lookup(
        &self,
        _txn: &DatabaseTransaction,
        context: &LookupContext<'_>,
        key: &str,
    ) -> Result<String, PaymentRequestError> {
        if key == param_keys::WEIGHT_BILLED || key == param_keys::WEIGHT_ORIGINAL {
            let shipment = context.shipment.ok_or_else(|| {
                PaymentRequestError::not_found(context.mto_service_item.id, "for MTO Shipment")
            })?;
            return Ok(shipment
                .prime_actual_weight
                .map(|w| w.to_string())
                .unwrap_or_default());
        }
        Ok(String::new())
    }
}

pub fn creator_with(pricer: StubPricer) -> Arc<PaymentRequestCreatorService> {
    Arc::new(PaymentRequestCreatorService::new(
        PriceLookupService::new(Arc::new(ServiceCodeSwaps::standard())),
        Arc::new(pricer),
        Arc::new(StubLookup),
    ))
}

pub fn creator() -> Arc<PaymentRequestCreatorService> {
    creator_with(StubPricer::default())
}

pub fn recalculator(db: &DatabaseConnection) -> PaymentRequestRecalculator {
    PaymentRequestRecalculator::new(db.clone(), creator(), PaymentRequestStatusUpdater::new())
}

/// Delegates to the default creator and fails on call number `fail_on`.
pub struct FailingCreator {
    inner: Arc<PaymentRequestCreatorService>,
    calls: AtomicUsize,
    fail_on: usize,
}

impl FailingCreator {
    pub fn failing_on(fail_on: usize) -> Self {
        Self {
            inner: creator(),
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl PaymentRequestCreator for FailingCreator {
    async fn create_payment_request(
        &self,
        txn: &DatabaseTransaction,
        input: &NewPaymentRequest,
    ) -> Result<PaymentRequestWithItems, PaymentRequestError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(PricingError::Failed {
                code: "DLH".to_string(),
                message: "pricing engine unavailable".to_string(),
            }
            .into());
        }
        self.inner.create_payment_request(txn, input).await
    }
}
