//! SIT balance error types.

use thiserror::Error;

/// Errors raised while reading SIT payment parameters.
#[derive(Debug, Error)]
pub enum SitBalanceError {
    /// A start or end date parameter is not `YYYY-MM-DD`.
    #[error("invalid {key} value '{value}'")]
    InvalidDate {
        /// Parameter key.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Parse failure.
        source: chrono::ParseError,
    },

    /// The day count parameter is not an integer.
    #[error("invalid NumberDaysSIT value '{value}'")]
    InvalidDayCount {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::num::ParseIntError,
    },

    /// The day count parameter is below zero.
    #[error("negative NumberDaysSIT value '{value}'")]
    NegativeDayCount {
        /// Raw value.
        value: String,
    },

    /// Summing day counts for a shipment left the `i32` range.
    #[error("SIT day count overflow for shipment {shipment_id}")]
    DayCountOverflow {
        /// Shipment whose balance overflowed.
        shipment_id: uuid::Uuid,
    },
}
