//! Rules checked before a payment request is created.

use uuid::Uuid;

use crate::payment_request::error::{PaymentRequestError, ValidationErrors};
use crate::payment_request::types::PaymentRequestStatus;

/// Stateless checks used by the payment request creator.
pub struct CreationRules;

impl CreationRules {
    /// The move id is required.
    pub fn require_move_id(move_id: Uuid) -> Result<(), PaymentRequestError> {
        if move_id.is_nil() {
            let mut errors = ValidationErrors::new();
            errors.add("move_id", "MoveTaskOrderID is required on PaymentRequest create");
            return Err(PaymentRequestError::InvalidCreateInput {
                errors,
                message: "Invalid Create Input Error: MoveTaskOrderID is required on PaymentRequest create".to_string(),
            });
        }
        Ok(())
    }

    /// Every MTO service item billed must belong to the request's move.
    pub fn require_same_move(
        move_id: Uuid,
        mto_service_item_id: Uuid,
        item_move_id: Uuid,
    ) -> Result<(), PaymentRequestError> {
        if item_move_id == move_id {
            Ok(())
        } else {
            Err(PaymentRequestError::Conflict {
                id: mto_service_item_id,
                message: format!(
                    "MTO service item belongs to move {item_move_id}, not to move {move_id}"
                ),
            })
        }
    }

    /// The move needs a reference id to number its payment requests.
    pub fn require_reference_id(
        move_id: Uuid,
        reference_id: Option<&str>,
    ) -> Result<&str, PaymentRequestError> {
        match reference_id.map(str::trim) {
            Some(reference) if !reference.is_empty() => Ok(reference),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("reference_id", "can not be blank");
                Err(PaymentRequestError::InvalidCreateInput {
                    errors,
                    message: format!(
                        "issue creating payment request unique identifier: MTO {move_id} has missing ReferenceID"
                    ),
                })
            }
        }
    }

    /// Returns true if an existing final request prevents new requests.
    #[must_use]
    pub fn blocks_new_requests(is_final: bool, status: PaymentRequestStatus) -> bool {
        is_final
            && !matches!(
                status,
                PaymentRequestStatus::ReviewedAllRejected | PaymentRequestStatus::Deprecated
            )
    }

    /// Fails if a blocking final request has already been submitted.
    pub fn require_no_final(
        move_id: Uuid,
        existing: impl IntoIterator<Item = (bool, PaymentRequestStatus)>,
    ) -> Result<(), PaymentRequestError> {
        if existing
            .into_iter()
            .any(|(is_final, status)| Self::blocks_new_requests(is_final, status))
        {
            return Err(PaymentRequestError::InvalidInput {
                id: move_id,
                errors: ValidationErrors::new(),
                message: format!(
                    "Cannot create PaymentRequest because a final PaymentRequest has already been submitted for MoveTaskOrder (ID: {move_id})"
                ),
            });
        }
        Ok(())
    }

    /// Shipments moved by an external vendor are not billed through the prime.
    pub fn require_prime_shipment(
        shipment_id: Uuid,
        uses_external_vendor: bool,
    ) -> Result<(), PaymentRequestError> {
        if uses_external_vendor {
            Err(PaymentRequestError::Conflict {
                id: shipment_id,
                message: format!("Shipment uses external vendor for MTOShipmentID {shipment_id}"),
            })
        } else {
            Ok(())
        }
    }

    /// Next sequence number after the highest one used by the move.
    #[must_use]
    pub fn next_sequence(max_existing: Option<i32>) -> i32 {
        max_existing.unwrap_or(0) + 1
    }

    /// `<reference id>-<sequence>`.
    #[must_use]
    pub fn payment_request_number(reference_id: &str, sequence_number: i32) -> String {
        format!("{reference_id}-{sequence_number}")
    }
}
