//! Payment request review, recalculation and repricing rules.
//!
//! This module holds the pure side of the engine: statuses and their
//! transitions, ETags, pricing parameter requirements, and the input used to
//! rebuild a payment request.
//!
//! # Modules
//!
//! - `types` - Statuses, parameter origins, service codes
//! - `error` - Payment request error types
//! - `etag` - Optimistic concurrency tokens
//! - `status` - Reviewer and invoicing transitions
//! - `params` - Service code swaps and required parameter checks
//! - `recalculation` - Replacement request input
//! - `candidates` - Requests affected by a shipment change
//! - `rules` - Creation rules and numbering

pub mod candidates;
pub mod error;
pub mod etag;
pub mod params;
pub mod recalculation;
pub mod rules;
pub mod status;
pub mod types;

#[cfg(test)]
mod recalculation_props;
#[cfg(test)]
mod status_props;

pub use candidates::{CandidateServiceItem, is_recalculation_candidate};
pub use error::{PaymentRequestError, PricingError, ValidationErrors};
pub use etag::ETag;
pub use params::{
    MissingServiceParams, RequiredServiceParam, ServiceCodeSwaps, valid_service_param_list,
};
pub use recalculation::{
    ExistingParam, ExistingServiceItem, IncomingParam, NewPaymentRequest, NewPaymentServiceItem,
    build_replacement,
};
pub use rules::CreationRules;
pub use status::{PaymentRequestFields, ProcessedTimestamp, StatusAction, StatusTransitionService};
pub use types::{
    PaymentRequestStatus, PaymentServiceItemStatus, ReServiceCode, ServiceItemParamOrigin,
    param_keys,
};
