//! SIT balance input and output types.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::payment_request::types::{PaymentServiceItemStatus, ReServiceCode};

/// A key/value param stored on a payment service item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitParam {
    /// Parameter key name.
    pub key: String,
    /// Raw value.
    pub value: String,
}

impl SitParam {
    /// Creates a param.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A payment service item with the shipment data the balance needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitServiceItem {
    /// Shipment the MTO service item belongs to.
    pub shipment_id: Uuid,
    /// SIT days authorized for the shipment, if any were configured.
    pub sit_days_allowance: Option<i32>,
    /// Service code of the MTO service item.
    pub code: ReServiceCode,
    /// Reviewer decision on the payment service item.
    pub status: PaymentServiceItemStatus,
    /// Params stored on the payment service item.
    pub params: Vec<SitParam>,
}

/// SIT days billed and remaining for one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentPaymentSitBalance {
    /// Shipment the balance is for.
    pub shipment_id: Uuid,
    /// Days authorized. Zero without an allowance.
    pub total_sit_days_authorized: i32,
    /// Days left after reviewed and pending billing. Negative on overage.
    pub total_sit_days_remaining: i32,
    /// Last day of SIT covered by the remaining days.
    pub total_sit_end_date: Option<NaiveDate>,
    /// Days billed on reviewed requests. `None` without reviewed billing.
    pub previously_billed_days: Option<i32>,
    /// Latest end date billed on reviewed requests.
    pub previously_billed_end_date: Option<NaiveDate>,
    /// Days billed on the request under review.
    pub pending_sit_days_invoiced: i32,
    /// Start date billed on the request under review.
    pub pending_billed_start_date: Option<NaiveDate>,
    /// End date billed on the request under review.
    pub pending_billed_end_date: Option<NaiveDate>,
}

impl ShipmentPaymentSitBalance {
    pub(crate) fn new(shipment_id: Uuid, sit_days_allowance: Option<i32>) -> Self {
        let authorized = sit_days_allowance.unwrap_or(0);
        Self {
            shipment_id,
            total_sit_days_authorized: authorized,
            total_sit_days_remaining: authorized,
            total_sit_end_date: None,
            previously_billed_days: None,
            previously_billed_end_date: None,
            pending_sit_days_invoiced: 0,
            pending_billed_start_date: None,
            pending_billed_end_date: None,
        }
    }
}
