//! Pricing parameter requirements.
//!
//! Some service codes borrow another code's parameter set. The swap table is
//! an immutable value injected into the lookup service.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use uuid::Uuid;

use crate::payment_request::types::ReServiceCode;

/// Maps a service code to the code whose parameter set prices it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCodeSwaps {
    swaps: BTreeMap<ReServiceCode, ReServiceCode>,
}

impl ServiceCodeSwaps {
    /// The production table: NTS packing is priced with the domestic packing parameters.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([(ReServiceCode::Dnpk, ReServiceCode::Dpk)])
    }

    /// Builds a table from `(from, to)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (ReServiceCode, ReServiceCode)>) -> Self {
        Self {
            swaps: pairs.into_iter().collect(),
        }
    }

    /// A table without swaps.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            swaps: BTreeMap::new(),
        }
    }

    /// Returns the code whose parameters price `code`, if it is swapped.
    pub fn swap_for(&self, code: ReServiceCode) -> Option<ReServiceCode> {
        self.swaps.get(&code).copied()
    }
}

impl Default for ServiceCodeSwaps {
    fn default() -> Self {
        Self::standard()
    }
}

/// A parameter the pricer needs for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredServiceParam {
    /// Service that owns the requirement.
    pub service_id: Uuid,
    /// Parameter key name.
    pub key: String,
    /// Whether an empty looked-up value may be omitted.
    pub is_optional: bool,
}

/// Required parameters absent from a payment service item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingServiceParams {
    /// MTO service item being priced.
    pub mto_service_item_id: Uuid,
    /// Keys that were not supplied, in requirement order.
    pub missing_keys: Vec<String>,
}

impl fmt::Display for MissingServiceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " MTO Service Item <{}> missing params needed for pricing: ",
            self.mto_service_item_id
        )?;
        for key in &self.missing_keys {
            write!(f, " Param Key <{key}>")?;
        }
        Ok(())
    }
}

/// Checks that every required parameter has been supplied.
///
/// A requirement is satisfied when a supplied parameter carries the same key
/// and the requirement belongs to `priced_service_id`, the service the item is
/// priced as after swaps are applied. Optional requirements may be absent.
pub fn valid_service_param_list<'a>(
    mto_service_item_id: Uuid,
    priced_service_id: Uuid,
    required: &[RequiredServiceParam],
    supplied_keys: impl IntoIterator<Item = &'a str>,
) -> Result<(), MissingServiceParams> {
    let supplied: HashSet<&str> = supplied_keys.into_iter().collect();

    let missing_keys: Vec<String> = required
        .iter()
        .filter(|param| {
            let supplied = param.service_id == priced_service_id
                && supplied.contains(param.key.as_str());
            !supplied && !param.is_optional
        })
        .map(|param| param.key.clone())
        .collect();

    if missing_keys.is_empty() {
        Ok(())
    } else {
        Err(MissingServiceParams {
            mto_service_item_id,
            missing_keys,
        })
    }
}
