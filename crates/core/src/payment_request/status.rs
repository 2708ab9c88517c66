//! Payment request status transitions.
//!
//! Pure checks for the reviewer and invoicing transitions. The persistence
//! layer applies the returned `StatusAction` and performs the ETag check.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::payment_request::error::{PaymentRequestError, ValidationErrors};
use crate::payment_request::types::{PaymentRequestStatus, PaymentServiceItemStatus};

/// Timestamp set by an invoicing transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessedTimestamp {
    /// Sets `sent_to_gex_at`.
    SentToGex(DateTime<Utc>),
    /// Sets `received_by_gex_at`.
    ReceivedByGex(DateTime<Utc>),
    /// Sets `paid_at`.
    Paid(DateTime<Utc>),
}

/// A validated status change, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAction {
    /// Reviewer decision on a pending request.
    Review {
        /// Reviewed or ReviewedAllRejected.
        new_status: PaymentRequestStatus,
        /// When the review happened.
        reviewed_at: DateTime<Utc>,
    },
    /// Invoicing progress reported by the payment gateway.
    Process {
        /// SentToGex, ReceivedByGex, EdiError or Paid.
        new_status: PaymentRequestStatus,
        /// Timestamp to set, if the status carries one.
        timestamp: Option<ProcessedTimestamp>,
    },
    /// Superseded by a recalculated request.
    Deprecate {
        /// Always Deprecated.
        new_status: PaymentRequestStatus,
    },
}

impl StatusAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> PaymentRequestStatus {
        match self {
            Self::Review { new_status, .. }
            | Self::Process { new_status, .. }
            | Self::Deprecate { new_status } => *new_status,
        }
    }
}

/// Stored fields checked before any payment request write.
#[derive(Debug, Clone, Copy)]
pub struct PaymentRequestFields<'a> {
    /// Owning move.
    pub move_id: Uuid,
    /// `<move reference id>-<sequence>`.
    pub payment_request_number: &'a str,
    /// Position of the request within its move.
    pub sequence_number: i32,
}

/// Stateless service for payment request status transitions.
pub struct StatusTransitionService;

impl StatusTransitionService {
    /// Validates a reviewer decision.
    ///
    /// The target must be `Reviewed` or `ReviewedAllRejected`. A `Reviewed`
    /// request may not contain any service item still awaiting a decision.
    pub fn review(
        id: Uuid,
        target: PaymentRequestStatus,
        item_statuses: &[PaymentServiceItemStatus],
    ) -> Result<StatusAction, PaymentRequestError> {
        match target {
            PaymentRequestStatus::Reviewed => {
                if item_statuses.contains(&PaymentServiceItemStatus::Requested) {
                    return Err(PaymentRequestError::Conflict {
                        id,
                        message: "All PaymentServiceItems must be approved or denied to review this PaymentRequest".to_string(),
                    });
                }
            }
            PaymentRequestStatus::ReviewedAllRejected => {}
            other => {
                return Err(PaymentRequestError::Conflict {
                    id,
                    message: format!("{other} is not a reviewed status"),
                });
            }
        }

        Ok(StatusAction::Review {
            new_status: target,
            reviewed_at: Utc::now(),
        })
    }

    /// Validates an invoicing transition.
    pub fn process(
        id: Uuid,
        target: PaymentRequestStatus,
    ) -> Result<StatusAction, PaymentRequestError> {
        let now = Utc::now();
        let timestamp = match target {
            PaymentRequestStatus::SentToGex => Some(ProcessedTimestamp::SentToGex(now)),
            PaymentRequestStatus::ReceivedByGex => Some(ProcessedTimestamp::ReceivedByGex(now)),
            PaymentRequestStatus::Paid => Some(ProcessedTimestamp::Paid(now)),
            PaymentRequestStatus::EdiError => None,
            other => {
                return Err(PaymentRequestError::Conflict {
                    id,
                    message: format!("{other} is not a processed status"),
                });
            }
        };

        Ok(StatusAction::Process {
            new_status: target,
            timestamp,
        })
    }

    /// Requires a request to still be awaiting review.
    pub fn require_pending(
        id: Uuid,
        current: PaymentRequestStatus,
        action: &str,
    ) -> Result<(), PaymentRequestError> {
        if current == PaymentRequestStatus::Pending {
            Ok(())
        } else {
            Err(PaymentRequestError::unexpected_status(id, current, action))
        }
    }

    /// Validates that a request can be superseded by a recalculation.
    pub fn deprecate(
        id: Uuid,
        current: PaymentRequestStatus,
    ) -> Result<StatusAction, PaymentRequestError> {
        Self::require_transition(id, current, PaymentRequestStatus::Deprecated)?;
        Ok(StatusAction::Deprecate {
            new_status: PaymentRequestStatus::Deprecated,
        })
    }

    /// Requires the stored status to be able to move to `target`.
    ///
    /// Terminal statuses accept no further transition.
    pub fn require_transition(
        id: Uuid,
        current: PaymentRequestStatus,
        target: PaymentRequestStatus,
    ) -> Result<(), PaymentRequestError> {
        if PaymentRequestStatus::is_valid_transition(current, target) {
            Ok(())
        } else {
            Err(PaymentRequestError::Conflict {
                id,
                message: format!("payment request in status {current} cannot move to {target}"),
            })
        }
    }

    /// Field validation run before every payment request write.
    #[must_use]
    pub fn validate(fields: &PaymentRequestFields<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if fields.move_id.is_nil() {
            errors.add("move_id", "MoveTaskOrderID can not be blank.");
        }
        if fields.payment_request_number.trim().is_empty() {
            errors.add(
                "payment_request_number",
                "PaymentRequestNumber can not be blank.",
            );
        }
        if fields.sequence_number < 1 {
            errors.add(
                "sequence_number",
                format!(
                    "{} is not greater than or equal to 1.",
                    fields.sequence_number
                ),
            );
        }

        errors
    }
}
