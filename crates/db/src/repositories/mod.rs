//! Transactional payment request services.
//!
//! Services take a `DatabaseConnection` when they own their transaction and
//! a generic `ConnectionTrait` or `DatabaseTransaction` when they run inside
//! the caller's.

pub mod creator;
pub mod payment_request;
pub mod price_lookup;
pub mod recalculator;
pub mod repricer;
pub mod shipment_recalculator;
pub mod sit_balance;
pub mod status_updater;

pub use creator::{
    LookupContext, PaymentRequestCreator, PaymentRequestCreatorService, PricedServiceItem,
    ServiceItemPricer, ServiceParamValueLookup,
};
pub use payment_request::{
    ParamWithKey, PaymentRequestWithItems, ProofOfServiceDocDetail, ServiceItemDetail,
    find_payment_request, load_payment_request,
};
pub use price_lookup::{PriceLookupService, ServiceParamWithKey};
pub use recalculator::{DuplicatedEntity, PaymentRequestRecalculator, TransactionScope};
pub use repricer::PaymentRequestRepricer;
pub use shipment_recalculator::ShipmentRecalculator;
pub use sit_balance::ShipmentPaymentSitBalanceService;
pub use status_updater::PaymentRequestStatusUpdater;
