//! Common types used across the application.

pub mod cents;

pub use cents::Cents;
