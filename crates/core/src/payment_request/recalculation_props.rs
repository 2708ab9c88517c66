//! Property-based tests for replacement request input.

use proptest::prelude::*;
use uuid::Uuid;

use crate::payment_request::params::{RequiredServiceParam, valid_service_param_list};
use crate::payment_request::recalculation::{ExistingServiceItem, build_replacement};

fn arb_items() -> impl Strategy<Value = Vec<ExistingServiceItem>> {
    prop::collection::vec(0i32..5, 0..20).prop_map(|priorities| {
        priorities
            .into_iter()
            .enumerate()
            .map(|(index, priority)| ExistingServiceItem {
                mto_service_item_id: Uuid::from_u128(index as u128),
                priority,
                params: vec![],
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Items come out sorted by priority, stable on ties, none lost.
    #[test]
    fn prop_replacement_is_stably_sorted(items in arb_items()) {
        let input = build_replacement(Uuid::nil(), false, &items);
        prop_assert_eq!(input.service_items.len(), items.len());

        let priority_of = |id: Uuid| {
            items
                .iter()
                .find(|item| item.mto_service_item_id == id)
                .map(|item| item.priority)
        };

        for pair in input.service_items.windows(2) {
            let (a, b) = (pair[0].mto_service_item_id, pair[1].mto_service_item_id);
            let (pa, pb) = (priority_of(a), priority_of(b));
            prop_assert!(pa <= pb);
            if pa == pb {
                // ids encode the original position
                prop_assert!(a.as_u128() < b.as_u128());
            }
        }
    }

    /// The missing-param message names exactly the unsupplied keys.
    #[test]
    fn prop_missing_message_is_complete(
        keys in prop::collection::btree_set("[A-Z][a-zA-Z]{2,10}", 1..8),
        supplied_mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let service_id = Uuid::from_u128(1);
        let keys: Vec<String> = keys.into_iter().collect();
        let required: Vec<RequiredServiceParam> = keys
            .iter()
            .map(|key| RequiredServiceParam {
                service_id,
                key: key.clone(),
                is_optional: false,
            })
            .collect();
        let supplied: Vec<&str> = keys
            .iter()
            .zip(&supplied_mask)
            .filter(|(_, supplied)| **supplied)
            .map(|(key, _)| key.as_str())
            .collect();

        let result = valid_service_param_list(
            Uuid::from_u128(2),
            service_id,
            &required,
            supplied.iter().copied(),
        );

        if supplied.len() == keys.len() {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            let message = err.to_string();
            for key in &keys {
                let named = message.contains(&format!("Param Key <{key}>"));
                prop_assert_eq!(named, !supplied.contains(&key.as_str()));
            }
        }
    }
}
