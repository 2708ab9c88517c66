//! `SeaORM` Entity for payment_service_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentServiceItemStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_service_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_request_id: Uuid,
    pub mto_service_item_id: Uuid,
    pub status: PaymentServiceItemStatus,
    pub price_cents: Option<i64>,
    pub rejection_reason: Option<String>,
    pub requested_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_requests::Entity",
        from = "Column::PaymentRequestId",
        to = "super::payment_requests::Column::Id"
    )]
    PaymentRequests,
    #[sea_orm(
        belongs_to = "super::mto_service_items::Entity",
        from = "Column::MtoServiceItemId",
        to = "super::mto_service_items::Column::Id"
    )]
    MtoServiceItems,
}

impl Related<super::payment_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentRequests.def()
    }
}

impl Related<super::mto_service_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MtoServiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
