//! Core billing logic for the relocation billing engine.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `payment_request` - Status machine, parameter validation, recalculation input
//! - `sit` - Storage-in-transit day balance calculation

pub mod payment_request;
pub mod sit;
