//! Property-based tests for payment request status transitions.

use proptest::prelude::*;
use uuid::Uuid;

use crate::payment_request::error::PaymentRequestError;
use crate::payment_request::status::{StatusAction, StatusTransitionService};
use crate::payment_request::types::{PaymentRequestStatus, PaymentServiceItemStatus};

fn arb_status() -> impl Strategy<Value = PaymentRequestStatus> {
    prop_oneof![
        Just(PaymentRequestStatus::Pending),
        Just(PaymentRequestStatus::Reviewed),
        Just(PaymentRequestStatus::ReviewedAllRejected),
        Just(PaymentRequestStatus::SentToGex),
        Just(PaymentRequestStatus::ReceivedByGex),
        Just(PaymentRequestStatus::Paid),
        Just(PaymentRequestStatus::EdiError),
        Just(PaymentRequestStatus::Deprecated),
    ]
}

fn arb_item_status() -> impl Strategy<Value = PaymentServiceItemStatus> {
    prop_oneof![
        Just(PaymentServiceItemStatus::Requested),
        Just(PaymentServiceItemStatus::Approved),
        Just(PaymentServiceItemStatus::Denied),
    ]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Review succeeds only for the two reviewed targets.
    #[test]
    fn prop_review_accepts_only_reviewed_targets(
        id in arb_uuid(),
        target in arb_status(),
    ) {
        let decided = [PaymentServiceItemStatus::Approved, PaymentServiceItemStatus::Denied];
        let result = StatusTransitionService::review(id, target, &decided);
        let is_review_target = matches!(
            target,
            PaymentRequestStatus::Reviewed | PaymentRequestStatus::ReviewedAllRejected
        );
        prop_assert_eq!(result.is_ok(), is_review_target);
        if let Ok(action) = result {
            prop_assert_eq!(action.new_status(), target);
        }
    }

    /// Reviewed fails exactly when some item is still requested.
    #[test]
    fn prop_reviewed_requires_decided_items(
        id in arb_uuid(),
        items in prop::collection::vec(arb_item_status(), 0..10),
    ) {
        let result = StatusTransitionService::review(id, PaymentRequestStatus::Reviewed, &items);
        let undecided = items.contains(&PaymentServiceItemStatus::Requested);
        prop_assert_eq!(result.is_err(), undecided);
        if let Err(err) = result {
            let is_conflict = matches!(err, PaymentRequestError::Conflict { .. });
            prop_assert!(is_conflict);
        }
    }

    /// Process succeeds only for invoicing targets.
    #[test]
    fn prop_process_accepts_only_invoicing_targets(
        id in arb_uuid(),
        target in arb_status(),
    ) {
        let result = StatusTransitionService::process(id, target);
        let is_processed = matches!(
            target,
            PaymentRequestStatus::SentToGex
                | PaymentRequestStatus::ReceivedByGex
                | PaymentRequestStatus::EdiError
                | PaymentRequestStatus::Paid
        );
        prop_assert_eq!(result.is_ok(), is_processed);
        if let Ok(StatusAction::Process { timestamp, .. }) = result {
            prop_assert_eq!(timestamp.is_none(), target == PaymentRequestStatus::EdiError);
        }
    }

    /// Deprecation is possible from every non-terminal status and no other.
    #[test]
    fn prop_deprecate_matches_terminal_flag(id in arb_uuid(), current in arb_status()) {
        let result = StatusTransitionService::deprecate(id, current);
        prop_assert_eq!(result.is_ok(), !current.is_terminal());
    }

    /// Only pending requests pass the pending check.
    #[test]
    fn prop_require_pending(id in arb_uuid(), current in arb_status()) {
        let result = StatusTransitionService::require_pending(id, current, "recalculated");
        prop_assert_eq!(result.is_ok(), current == PaymentRequestStatus::Pending);
    }

    /// Terminal statuses have no outgoing transitions.
    #[test]
    fn prop_terminal_has_no_transitions(from in arb_status(), to in arb_status()) {
        if from.is_terminal() {
            prop_assert!(!PaymentRequestStatus::is_valid_transition(from, to));
        }
    }
}
