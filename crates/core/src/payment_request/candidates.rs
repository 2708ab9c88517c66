//! Selection of payment requests affected by a shipment change.

use uuid::Uuid;

use crate::payment_request::types::{PaymentRequestStatus, param_keys};

/// A payment service item as seen by candidate selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateServiceItem {
    /// Shipment the MTO service item belongs to.
    pub shipment_id: Option<Uuid>,
    /// Keys of the params stored on the payment service item.
    pub param_keys: Vec<String>,
}

/// Returns true if the request must be recalculated when `shipment_id` changes.
///
/// The request must be pending and must contain at least one service item on
/// the shipment that was priced with the shipment's original weight.
#[must_use]
pub fn is_recalculation_candidate(
    shipment_id: Uuid,
    status: PaymentRequestStatus,
    items: &[CandidateServiceItem],
) -> bool {
    status == PaymentRequestStatus::Pending
        && items.iter().any(|item| {
            item.shipment_id == Some(shipment_id)
                && item
                    .param_keys
                    .iter()
                    .any(|key| key == param_keys::WEIGHT_ORIGINAL)
        })
}
