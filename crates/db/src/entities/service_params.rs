//! `SeaORM` Entity for service_params table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "service_params")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_item_param_key_id: Uuid,
    pub is_optional: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::re_services::Entity",
        from = "Column::ServiceId",
        to = "super::re_services::Column::Id"
    )]
    ReServices,
    #[sea_orm(
        belongs_to = "super::service_item_param_keys::Entity",
        from = "Column::ServiceItemParamKeyId",
        to = "super::service_item_param_keys::Column::Id"
    )]
    ServiceItemParamKeys,
}

impl Related<super::re_services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReServices.def()
    }
}

impl Related<super::service_item_param_keys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItemParamKeys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
