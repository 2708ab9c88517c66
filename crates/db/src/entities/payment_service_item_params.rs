//! `SeaORM` Entity for payment_service_item_params table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_service_item_params")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_service_item_id: Uuid,
    pub service_item_param_key_id: Uuid,
    pub value: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_service_items::Entity",
        from = "Column::PaymentServiceItemId",
        to = "super::payment_service_items::Column::Id"
    )]
    PaymentServiceItems,
    #[sea_orm(
        belongs_to = "super::service_item_param_keys::Entity",
        from = "Column::ServiceItemParamKeyId",
        to = "super::service_item_param_keys::Column::Id"
    )]
    ServiceItemParamKeys,
}

impl Related<super::payment_service_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentServiceItems.def()
    }
}

impl Related<super::service_item_param_keys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItemParamKeys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
