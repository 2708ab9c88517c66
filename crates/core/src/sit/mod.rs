//! Storage-in-transit day balances.
//!
//! Walks the additional-day SIT items billed on previously reviewed payment
//! requests, then the items on the request under review, and projects per
//! shipment how many authorized days remain.

pub mod balance;
pub mod error;
pub mod types;


pub use balance::SitBalanceCalculator;
pub use error::SitBalanceError;
pub use types::{ShipmentPaymentSitBalance, SitParam, SitServiceItem};
