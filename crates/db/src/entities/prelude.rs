//! Entity re-exports.

pub use super::moves::Entity as Moves;
pub use super::mto_service_items::Entity as MtoServiceItems;
pub use super::mto_shipments::Entity as MtoShipments;
pub use super::payment_requests::Entity as PaymentRequests;
pub use super::payment_service_item_params::Entity as PaymentServiceItemParams;
pub use super::payment_service_items::Entity as PaymentServiceItems;
pub use super::prime_uploads::Entity as PrimeUploads;
pub use super::proof_of_service_docs::Entity as ProofOfServiceDocs;
pub use super::re_services::Entity as ReServices;
pub use super::service_item_param_keys::Entity as ServiceItemParamKeys;
pub use super::service_params::Entity as ServiceParams;
