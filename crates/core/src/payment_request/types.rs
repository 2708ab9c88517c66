//! Payment request domain types.
//!
//! Status enums for payment requests and their service items, parameter
//! origins, and the rate-service codes used to price service items.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment request status in the review and billing lifecycle.
///
/// The valid transitions are:
/// - Pending → Reviewed
/// - Pending → ReviewedAllRejected
/// - Reviewed → SentToGex
/// - SentToGex → ReceivedByGex
/// - SentToGex → EdiError
/// - ReceivedByGex → Paid
/// - ReceivedByGex → EdiError
/// - any non-terminal status → Deprecated (recalculation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentRequestStatus {
    /// Submitted by the prime and awaiting review.
    #[serde(rename = "PENDING")]
    Pending,
    /// Reviewed with at least one approved service item.
    #[serde(rename = "REVIEWED")]
    Reviewed,
    /// Reviewed and every service item was rejected.
    #[serde(rename = "REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED")]
    ReviewedAllRejected,
    /// Invoice has been sent to the payment gateway.
    #[serde(rename = "SENT_TO_GEX")]
    SentToGex,
    /// Payment gateway acknowledged the invoice.
    #[serde(rename = "RECEIVED_BY_GEX")]
    ReceivedByGex,
    /// Invoice was paid.
    #[serde(rename = "PAID")]
    Paid,
    /// Invoice transmission failed.
    #[serde(rename = "EDI_ERROR")]
    EdiError,
    /// Superseded by a recalculated payment request.
    #[serde(rename = "DEPRECATED")]
    Deprecated,
}

impl PaymentRequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Reviewed => "REVIEWED",
            Self::ReviewedAllRejected => "REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED",
            Self::SentToGex => "SENT_TO_GEX",
            Self::ReceivedByGex => "RECEIVED_BY_GEX",
            Self::Paid => "PAID",
            Self::EdiError => "EDI_ERROR",
            Self::Deprecated => "DEPRECATED",
        }
    }

    /// Parses a status from its stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "REVIEWED" => Some(Self::Reviewed),
            "REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED" => Some(Self::ReviewedAllRejected),
            "SENT_TO_GEX" => Some(Self::SentToGex),
            "RECEIVED_BY_GEX" => Some(Self::ReceivedByGex),
            "PAID" => Some(Self::Paid),
            "EDI_ERROR" => Some(Self::EdiError),
            "DEPRECATED" => Some(Self::Deprecated),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Paid | Self::ReviewedAllRejected | Self::Deprecated
        )
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        if to == Self::Deprecated {
            return !from.is_terminal();
        }

        matches!(
            (from, to),
            (Self::Pending, Self::Reviewed | Self::ReviewedAllRejected)
                | (Self::Reviewed, Self::SentToGex)
                | (Self::SentToGex, Self::ReceivedByGex | Self::EdiError)
                | (Self::ReceivedByGex, Self::Paid | Self::EdiError)
        )
    }
}

impl fmt::Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single billable line within a payment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentServiceItemStatus {
    /// Awaiting a reviewer decision.
    Requested,
    /// Approved by the reviewer.
    Approved,
    /// Denied by the reviewer.
    Denied,
    /// Sent to the payment gateway.
    SentToGex,
    /// Paid.
    Paid,
    /// Invoice transmission failed.
    EdiError,
}

impl PaymentServiceItemStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
            Self::SentToGex => "SENT_TO_GEX",
            Self::Paid => "PAID",
            Self::EdiError => "EDI_ERROR",
        }
    }

    /// Parses a status from its stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REQUESTED" => Some(Self::Requested),
            "APPROVED" => Some(Self::Approved),
            "DENIED" => Some(Self::Denied),
            "SENT_TO_GEX" => Some(Self::SentToGex),
            "PAID" => Some(Self::Paid),
            "EDI_ERROR" => Some(Self::EdiError),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentServiceItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the value of a service item parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceItemParamOrigin {
    /// Looked up by the system from move and shipment data.
    System,
    /// Supplied by the prime contractor when requesting payment.
    Prime,
    /// Produced by the pricer while pricing.
    Pricer,
}

impl ServiceItemParamOrigin {
    /// Returns the string representation of the origin.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Prime => "PRIME",
            Self::Pricer => "PRICER",
        }
    }

    /// Parses an origin from its stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SYSTEM" => Some(Self::System),
            "PRIME" => Some(Self::Prime),
            "PRICER" => Some(Self::Pricer),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceItemParamOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service item parameter key names referenced by the engine.
pub mod param_keys {
    /// Actual weight of the shipment at origin.
    pub const WEIGHT_ORIGINAL: &str = "WeightOriginal";
    /// Weight the shipment is billed at.
    pub const WEIGHT_BILLED: &str = "WeightBilled";
    /// First day of SIT covered by the payment request.
    pub const SIT_PAYMENT_REQUEST_START: &str = "SITPaymentRequestStart";
    /// Last day of SIT covered by the payment request.
    pub const SIT_PAYMENT_REQUEST_END: &str = "SITPaymentRequestEnd";
    /// Number of SIT days billed.
    pub const NUMBER_DAYS_SIT: &str = "NumberDaysSIT";
}

/// Macro to generate the rate-service code enum and its string table.
macro_rules! re_service_codes {
    ($($variant:ident => $code:literal, $doc:literal;)+) => {
        /// Code identifying a priceable service type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ReServiceCode {
            $(
                #[doc = $doc]
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl ReServiceCode {
            /// Returns the string representation of the code.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Parses a code from its stored representation.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

re_service_codes! {
    Cs => "CS", "Counseling";
    Dbhf => "DBHF", "Domestic haul away boat factor";
    Dbtf => "DBTF", "Domestic tow away boat factor";
    Dcrt => "DCRT", "Domestic crating";
    Dcrtsa => "DCRTSA", "Domestic crating - standalone";
    Ddasit => "DDASIT", "Domestic destination add'l SIT";
    Dddsit => "DDDSIT", "Domestic destination SIT delivery";
    Ddsfsc => "DDSFSC", "Domestic destination SIT FSC";
    Ddfsit => "DDFSIT", "Domestic destination 1st day SIT";
    Ddp => "DDP", "Domestic destination price";
    Ddshut => "DDSHUT", "Domestic destination shuttle service";
    Dlh => "DLH", "Domestic linehaul";
    Dmhf => "DMHF", "Domestic mobile home factor";
    Dnpk => "DNPK", "Domestic NTS packing";
    Doasit => "DOASIT", "Domestic origin add'l SIT";
    Dofsit => "DOFSIT", "Domestic origin 1st day SIT";
    Dop => "DOP", "Domestic origin price";
    Dopsit => "DOPSIT", "Domestic origin SIT pickup";
    Dosfsc => "DOSFSC", "Domestic origin SIT FSC";
    Doshut => "DOSHUT", "Domestic origin shuttle service";
    Dpk => "DPK", "Domestic packing";
    Dsh => "DSH", "Domestic shorthaul";
    Ducrt => "DUCRT", "Domestic uncrating";
    Dupk => "DUPK", "Domestic unpacking";
    Fsc => "FSC", "Fuel surcharge";
    Ibhf => "IBHF", "International haul away boat factor";
    Ibtf => "IBTF", "International tow away boat factor";
    Icolh => "ICOLH", "International C->O shipping & LH";
    Icoub => "ICOUB", "International C->O UB";
    Icrt => "ICRT", "International crating";
    Idasit => "IDASIT", "International destination add'l day SIT";
    Iddsit => "IDDSIT", "International destination SIT delivery";
    Idfsit => "IDFSIT", "International destination 1st day SIT";
    Idsfsc => "IDSFSC", "International destination SIT FSC";
    Idshut => "IDSHUT", "International destination shuttle service";
    Ihpk => "IHPK", "International HHG pack";
    Ihupk => "IHUPK", "International HHG unpack";
    Inpk => "INPK", "International NTS packing";
    Ioasit => "IOASIT", "International origin add'l day SIT";
    Ioclh => "IOCLH", "International O->C shipping & LH";
    Iocub => "IOCUB", "International O->C UB";
    Iofsit => "IOFSIT", "International origin 1st day SIT";
    Ioolh => "IOOLH", "International O->O shipping & LH";
    Iooub => "IOOUB", "International O->O UB";
    Iopsit => "IOPSIT", "International origin SIT pickup";
    Iosfsc => "IOSFSC", "International origin SIT FSC";
    Ioshut => "IOSHUT", "International origin shuttle service";
    Iubpk => "IUBPK", "International UB pack";
    Iubupk => "IUBUPK", "International UB unpack";
    Iucrt => "IUCRT", "International uncrating";
    Ms => "MS", "Move management";
    Nsth => "NSTH", "Nonstandard HHG";
    Nstub => "NSTUB", "Nonstandard UB";
    Ubp => "UBP", "International UB price";
    Islh => "ISLH", "Shipping & linehaul";
    Poefsc => "POEFSC", "International POE fuel surcharge";
    Podfsc => "PODFSC", "International POD fuel surcharge";
}

impl ReServiceCode {
    /// Codes that bill additional days of storage in transit.
    pub const ADDITIONAL_DAY_SIT: [Self; 2] = [Self::Doasit, Self::Ddasit];

    /// Returns true for the origin and destination additional-day SIT codes.
    #[must_use]
    pub fn is_additional_day_sit(&self) -> bool {
        Self::ADDITIONAL_DAY_SIT.contains(self)
    }
}

impl fmt::Display for ReServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
