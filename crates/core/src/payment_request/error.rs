//! Payment request error types.
//!
//! Validation and conflict errors are distinguishable from hard persistence
//! failures so callers can map each kind to its own response.

use std::collections::BTreeMap;
use std::fmt;

use relo_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::payment_request::types::PaymentRequestStatus;
use crate::sit::SitBalanceError;

/// Field-level validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns true when no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterates over fields and their messages in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Converts into a `Result`, failing when any message was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

/// Errors reported by the pricing engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// No pricer exists for the service code. The item is left unpriced.
    #[error("pricer not implemented for {code}")]
    NotImplemented {
        /// Service code without a pricer.
        code: String,
    },

    /// Pricing failed.
    #[error("failed to price {code}: {message}")]
    Failed {
        /// Service code being priced.
        code: String,
        /// Failure detail.
        message: String,
    },
}

/// Errors that can occur while reviewing, recalculating or repricing payment requests.
#[derive(Debug, Error)]
pub enum PaymentRequestError {
    /// A referenced entity does not exist.
    #[error("ID: {id} not found {message}")]
    NotFound {
        /// Identifier that was looked up. Nil when the lookup was by name.
        id: Uuid,
        /// What was looked up.
        message: String,
    },

    /// The operation is not valid for the entity's current state.
    #[error("ID: {id} is in a conflicting state {message}")]
    Conflict {
        /// Identifier of the entity in conflict.
        id: Uuid,
        /// Description of the conflict.
        message: String,
    },

    /// Validation failed for an existing entity.
    #[error("Invalid input for ID: {id}. {message} {errors}")]
    InvalidInput {
        /// Identifier of the entity that failed validation.
        id: Uuid,
        /// Field-level messages.
        errors: ValidationErrors,
        /// Summary message.
        message: String,
    },

    /// Validation failed for an entity that is being created.
    #[error("Invalid input for new payment request. {message} {errors}")]
    InvalidCreateInput {
        /// Field-level messages.
        errors: ValidationErrors,
        /// Summary message.
        message: String,
    },

    /// The supplied ETag does not match the stored row.
    #[error("Precondition failed on update to object with ID: '{id}'. {message}")]
    PreconditionFailed {
        /// Identifier of the row.
        id: Uuid,
        /// Description of the mismatch.
        message: String,
    },

    /// Unexpected persistence failure.
    #[error("Could not complete query related to object of type: {entity}. {message}")]
    Query {
        /// Entity kind being read or written.
        entity: &'static str,
        /// Underlying error text.
        message: String,
    },

    /// The pricing engine rejected a service item.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// SIT parameters could not be parsed.
    #[error(transparent)]
    SitBalance(#[from] SitBalanceError),
}

impl PaymentRequestError {
    /// Builds a `NotFound` error.
    pub fn not_found(id: Uuid, message: impl Into<String>) -> Self {
        Self::NotFound {
            id,
            message: message.into(),
        }
    }

    /// Builds a `Query` error from any displayable persistence failure.
    pub fn query(entity: &'static str, err: impl fmt::Display) -> Self {
        Self::Query {
            entity,
            message: err.to_string(),
        }
    }

    /// Builds the conflict reported when a request is not in the expected status.
    #[must_use]
    pub fn unexpected_status(id: Uuid, status: PaymentRequestStatus, action: &str) -> Self {
        Self::Conflict {
            id,
            message: format!(
                "only pending payment requests can be {action}, payment request is {status}"
            ),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::InvalidInput { .. } | Self::InvalidCreateInput { .. } => 422,
            Self::PreconditionFailed { .. } => 412,
            Self::Query { .. } | Self::Pricing(_) | Self::SitBalance(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InvalidCreateInput { .. } => "INVALID_CREATE_INPUT",
            Self::PreconditionFailed { .. } => "PRECONDITION_FAILED",
            Self::Query { .. } => "QUERY_ERROR",
            Self::Pricing(_) => "PRICING_ERROR",
            Self::SitBalance(_) => "SIT_BALANCE_ERROR",
        }
    }
}

impl From<PaymentRequestError> for AppError {
    fn from(err: PaymentRequestError) -> Self {
        let message = err.to_string();
        match err {
            PaymentRequestError::NotFound { .. } => Self::NotFound(message),
            PaymentRequestError::Conflict { .. } => Self::Conflict(message),
            PaymentRequestError::InvalidInput { .. }
            | PaymentRequestError::InvalidCreateInput { .. } => Self::BusinessRule(message),
            PaymentRequestError::PreconditionFailed { .. } => Self::PreconditionFailed(message),
            PaymentRequestError::Query { .. } => Self::Database(message),
            PaymentRequestError::Pricing(_) => Self::ExternalService(message),
            PaymentRequestError::SitBalance(_) => Self::Internal(message),
        }
    }
}
