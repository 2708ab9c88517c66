//! Input for the payment request that replaces a recalculated or repriced one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payment_request::types::ServiceItemParamOrigin;

/// A parameter supplied with a new payment service item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingParam {
    /// Parameter key name.
    pub key: String,
    /// Raw value.
    pub value: String,
}

/// A service item to be priced on a new payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPaymentServiceItem {
    /// MTO service item being billed.
    pub mto_service_item_id: Uuid,
    /// Params supplied by the prime.
    pub incoming_params: Vec<IncomingParam>,
}

/// Everything needed to create a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPaymentRequest {
    /// Owning move.
    pub move_id: Uuid,
    /// Whether this is the final request for the move.
    pub is_final: bool,
    /// Service items in pricing order.
    pub service_items: Vec<NewPaymentServiceItem>,
}

/// A stored param on an existing payment service item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingParam {
    /// Parameter key name.
    pub key: String,
    /// Key origin.
    pub origin: ServiceItemParamOrigin,
    /// Stored value.
    pub value: String,
}

/// A service item on the request being replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingServiceItem {
    /// MTO service item being billed.
    pub mto_service_item_id: Uuid,
    /// Pricing priority of the item's service. Lower prices first.
    pub priority: i32,
    /// Stored params.
    pub params: Vec<ExistingParam>,
}

/// Builds the replacement request input.
///
/// Only prime-supplied params are carried over; system and pricer params are
/// looked up or derived again. Items are ordered by service priority, keeping
/// the original order among equal priorities.
#[must_use]
pub fn build_replacement(
    move_id: Uuid,
    is_final: bool,
    existing: &[ExistingServiceItem],
) -> NewPaymentRequest {
    let mut ordered: Vec<&ExistingServiceItem> = existing.iter().collect();
    ordered.sort_by_key(|item| item.priority);

    let service_items = ordered
        .into_iter()
        .map(|item| NewPaymentServiceItem {
            mto_service_item_id: item.mto_service_item_id,
            incoming_params: item
                .params
                .iter()
                .filter(|param| param.origin == ServiceItemParamOrigin::Prime)
                .map(|param| IncomingParam {
                    key: param.key.clone(),
                    value: param.value.clone(),
                })
                .collect(),
        })
        .collect();

    NewPaymentRequest {
        move_id,
        is_final,
        service_items,
    }
}
