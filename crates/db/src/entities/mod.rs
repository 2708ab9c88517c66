//! `SeaORM` entity definitions.

pub mod prelude;

pub mod moves;
pub mod mto_service_items;
pub mod mto_shipments;
pub mod payment_requests;
pub mod payment_service_item_params;
pub mod payment_service_items;
pub mod prime_uploads;
pub mod proof_of_service_docs;
pub mod re_services;
pub mod sea_orm_active_enums;
pub mod service_item_param_keys;
pub mod service_params;
