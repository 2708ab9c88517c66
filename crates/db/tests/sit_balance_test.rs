//! Integration tests for shipment SIT balances.

mod common;

use chrono::NaiveDate;
use common::{
    Catalog, PendingScenario, insert_item_param, insert_move, insert_mto_service_item,
    insert_payment_request, insert_payment_service_item, insert_shipment, setup,
};
use relo_core::payment_request::{
    PaymentRequestError, PaymentRequestStatus, PaymentServiceItemStatus,
};
use relo_db::entities::{moves, mto_service_items, mto_shipments};
use relo_db::repositories::ShipmentPaymentSitBalanceService;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

struct SitMove {
    catalog: Catalog,
    move_row: moves::Model,
    shipment: mto_shipments::Model,
    doasit: mto_service_items::Model,
}

impl SitMove {
    async fn insert(db: &DatabaseConnection, allowance: Option<i32>) -> Self {
        let catalog = Catalog::insert(db).await;
        let move_row = insert_move(db, Some("5555-0001")).await;
        let shipment = insert_shipment(db, move_row.id, allowance, false).await;
        let doasit = insert_mto_service_item(
            db,
            move_row.id,
            Some(shipment.id),
            catalog.doasit.id,
            Some(date(2024, 1, 1)),
        )
        .await;
        Self {
            catalog,
            move_row,
            shipment,
            doasit,
        }
    }

    /// Adds a request billing `days` of additional SIT between `start` and `end`.
    async fn bill(
        &self,
        db: &DatabaseConnection,
        sequence_number: i32,
        status: PaymentRequestStatus,
        item_status: PaymentServiceItemStatus,
        (start, end, days): (&str, &str, &str),
    ) -> Uuid {
        let request =
            insert_payment_request(db, self.move_row.id, sequence_number, status, false).await;
        let item = insert_payment_service_item(db, request.id, self.doasit.id, item_status).await;
        insert_item_param(db, item.id, self.catalog.sit_start.id, start).await;
        insert_item_param(db, item.id, self.catalog.sit_end.id, end).await;
        insert_item_param(db, item.id, self.catalog.number_days_sit.id, days).await;
        request.id
    }
}

#[tokio::test]
async fn test_request_without_sit_has_no_balance() {
    let db = setup().await;
    let scenario = PendingScenario::insert(&db).await;

    let balances = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(scenario.request.id)
        .await
        .expect("balance should load");
    assert_eq!(balances, None);
}

#[tokio::test]
async fn test_pending_only_balance() {
    let db = setup().await;
    let sit = SitMove::insert(&db, Some(90)).await;
    let pending = sit
        .bill(
            &db,
            1,
            PaymentRequestStatus::Pending,
            PaymentServiceItemStatus::Requested,
            ("2024-01-31", "2024-02-29", "30"),
        )
        .await;

    let balances = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(pending)
        .await
        .expect("balance should load")
        .expect("request bills SIT");

    assert_eq!(balances.len(), 1);
    let balance = &balances[0];
    assert_eq!(balance.shipment_id, sit.shipment.id);
    assert_eq!(balance.total_sit_days_authorized, 90);
    assert_eq!(balance.pending_sit_days_invoiced, 30);
    assert_eq!(balance.total_sit_days_remaining, 60);
    assert_eq!(balance.pending_billed_start_date, Some(date(2024, 1, 31)));
    assert_eq!(balance.pending_billed_end_date, Some(date(2024, 2, 29)));
    assert_eq!(balance.total_sit_end_date, Some(date(2024, 4, 30)));
    assert_eq!(balance.previously_billed_days, None);
}

#[tokio::test]
async fn test_reviewed_then_pending_balance() {
    let db = setup().await;
    let sit = SitMove::insert(&db, Some(90)).await;
    sit.bill(
        &db,
        1,
        PaymentRequestStatus::Reviewed,
        PaymentServiceItemStatus::Approved,
        ("2024-01-01", "2024-01-30", "30"),
    )
    .await;
    let pending = sit
        .bill(
            &db,
            2,
            PaymentRequestStatus::Pending,
            PaymentServiceItemStatus::Requested,
            ("2024-01-31", "2024-02-29", "30"),
        )
        .await;

    let balances = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(pending)
        .await
        .expect("balance should load")
        .expect("request bills SIT");

    let balance = &balances[0];
    assert_eq!(balance.previously_billed_days, Some(30));
    assert_eq!(balance.previously_billed_end_date, Some(date(2024, 1, 30)));
    assert_eq!(balance.pending_sit_days_invoiced, 30);
    assert_eq!(balance.total_sit_days_remaining, 30);
    assert_eq!(balance.total_sit_end_date, Some(date(2024, 3, 31)));
}

#[tokio::test]
async fn test_denied_and_unreviewed_billing_excluded() {
    let db = setup().await;
    let sit = SitMove::insert(&db, Some(90)).await;
    sit.bill(
        &db,
        1,
        PaymentRequestStatus::Reviewed,
        PaymentServiceItemStatus::Denied,
        ("2024-01-01", "2024-01-30", "30"),
    )
    .await;
    sit.bill(
        &db,
        2,
        PaymentRequestStatus::Pending,
        PaymentServiceItemStatus::Requested,
        ("2024-01-01", "2024-01-30", "30"),
    )
    .await;
    let pending = sit
        .bill(
            &db,
            3,
            PaymentRequestStatus::Pending,
            PaymentServiceItemStatus::Requested,
            ("2024-01-31", "2024-02-09", "10"),
        )
        .await;

    let balances = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(pending)
        .await
        .expect("balance should load")
        .expect("request bills SIT");

    let balance = &balances[0];
    assert_eq!(balance.previously_billed_days, None);
    assert_eq!(balance.total_sit_days_remaining, 80);
}

#[tokio::test]
async fn test_overage_goes_negative() {
    let db = setup().await;
    let sit = SitMove::insert(&db, Some(20)).await;
    let pending = sit
        .bill(
            &db,
            1,
            PaymentRequestStatus::Pending,
            PaymentServiceItemStatus::Requested,
            ("2024-01-01", "2024-01-30", "30"),
        )
        .await;

    let balances = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(pending)
        .await
        .expect("balance should load")
        .expect("request bills SIT");

    assert_eq!(balances[0].total_sit_days_remaining, -10);
    assert_eq!(balances[0].total_sit_end_date, Some(date(2024, 1, 21)));
}

#[tokio::test]
async fn test_malformed_dates_fail() {
    let db = setup().await;
    let sit = SitMove::insert(&db, Some(90)).await;
    let pending = sit
        .bill(
            &db,
            1,
            PaymentRequestStatus::Pending,
            PaymentServiceItemStatus::Requested,
            ("01/31/2024", "2024-02-29", "30"),
        )
        .await;

    let err = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(pending)
        .await
        .expect_err("malformed date should fail");
    assert!(matches!(err, PaymentRequestError::SitBalance(_)));
}

#[tokio::test]
async fn test_unknown_request_not_found() {
    let db = setup().await;

    let err = ShipmentPaymentSitBalanceService::new(db.clone())
        .list_shipment_payment_sit_balance(Uuid::now_v7())
        .await
        .expect_err("unknown request should fail");
    assert!(matches!(err, PaymentRequestError::NotFound { .. }));
}
