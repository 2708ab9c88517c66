//! Status columns stored as strings.
//!
//! Each enum converts to and from its domain counterpart.

use relo_core::payment_request::types as domain;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
pub enum PaymentRequestStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "REVIEWED")]
    Reviewed,
    #[sea_orm(string_value = "REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED")]
    ReviewedAllRejected,
    #[sea_orm(string_value = "SENT_TO_GEX")]
    SentToGex,
    #[sea_orm(string_value = "RECEIVED_BY_GEX")]
    ReceivedByGex,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "EDI_ERROR")]
    EdiError,
    #[sea_orm(string_value = "DEPRECATED")]
    Deprecated,
}

impl From<PaymentRequestStatus> for domain::PaymentRequestStatus {
    fn from(status: PaymentRequestStatus) -> Self {
        match status {
            PaymentRequestStatus::Pending => Self::Pending,
            PaymentRequestStatus::Reviewed => Self::Reviewed,
            PaymentRequestStatus::ReviewedAllRejected => Self::ReviewedAllRejected,
            PaymentRequestStatus::SentToGex => Self::SentToGex,
            PaymentRequestStatus::ReceivedByGex => Self::ReceivedByGex,
            PaymentRequestStatus::Paid => Self::Paid,
            PaymentRequestStatus::EdiError => Self::EdiError,
            PaymentRequestStatus::Deprecated => Self::Deprecated,
        }
    }
}

impl From<domain::PaymentRequestStatus> for PaymentRequestStatus {
    fn from(status: domain::PaymentRequestStatus) -> Self {
        match status {
            domain::PaymentRequestStatus::Pending => Self::Pending,
            domain::PaymentRequestStatus::Reviewed => Self::Reviewed,
            domain::PaymentRequestStatus::ReviewedAllRejected => Self::ReviewedAllRejected,
            domain::PaymentRequestStatus::SentToGex => Self::SentToGex,
            domain::PaymentRequestStatus::ReceivedByGex => Self::ReceivedByGex,
            domain::PaymentRequestStatus::Paid => Self::Paid,
            domain::PaymentRequestStatus::EdiError => Self::EdiError,
            domain::PaymentRequestStatus::Deprecated => Self::Deprecated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentServiceItemStatus {
    #[sea_orm(string_value = "REQUESTED")]
    Requested,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "DENIED")]
    Denied,
    #[sea_orm(string_value = "SENT_TO_GEX")]
    SentToGex,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "EDI_ERROR")]
    EdiError,
}

impl From<PaymentServiceItemStatus> for domain::PaymentServiceItemStatus {
    fn from(status: PaymentServiceItemStatus) -> Self {
        match status {
            PaymentServiceItemStatus::Requested => Self::Requested,
            PaymentServiceItemStatus::Approved => Self::Approved,
            PaymentServiceItemStatus::Denied => Self::Denied,
            PaymentServiceItemStatus::SentToGex => Self::SentToGex,
            PaymentServiceItemStatus::Paid => Self::Paid,
            PaymentServiceItemStatus::EdiError => Self::EdiError,
        }
    }
}

impl From<domain::PaymentServiceItemStatus> for PaymentServiceItemStatus {
    fn from(status: domain::PaymentServiceItemStatus) -> Self {
        match status {
            domain::PaymentServiceItemStatus::Requested => Self::Requested,
            domain::PaymentServiceItemStatus::Approved => Self::Approved,
            domain::PaymentServiceItemStatus::Denied => Self::Denied,
            domain::PaymentServiceItemStatus::SentToGex => Self::SentToGex,
            domain::PaymentServiceItemStatus::Paid => Self::Paid,
            domain::PaymentServiceItemStatus::EdiError => Self::EdiError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum ServiceItemParamOrigin {
    #[sea_orm(string_value = "SYSTEM")]
    System,
    #[sea_orm(string_value = "PRIME")]
    Prime,
    #[sea_orm(string_value = "PRICER")]
    Pricer,
}

impl From<ServiceItemParamOrigin> for domain::ServiceItemParamOrigin {
    fn from(origin: ServiceItemParamOrigin) -> Self {
        match origin {
            ServiceItemParamOrigin::System => Self::System,
            ServiceItemParamOrigin::Prime => Self::Prime,
            ServiceItemParamOrigin::Pricer => Self::Pricer,
        }
    }
}
