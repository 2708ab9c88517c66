//! `SeaORM` Entity for mto_service_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "mto_service_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub move_id: Uuid,
    pub mto_shipment_id: Option<Uuid>,
    pub re_service_id: Uuid,
    pub status: String,
    pub sit_entry_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::moves::Entity",
        from = "Column::MoveId",
        to = "super::moves::Column::Id"
    )]
    Moves,
    #[sea_orm(
        belongs_to = "super::mto_shipments::Entity",
        from = "Column::MtoShipmentId",
        to = "super::mto_shipments::Column::Id"
    )]
    MtoShipments,
    #[sea_orm(
        belongs_to = "super::re_services::Entity",
        from = "Column::ReServiceId",
        to = "super::re_services::Column::Id"
    )]
    ReServices,
}

impl Related<super::moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Moves.def()
    }
}

impl Related<super::mto_shipments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MtoShipments.def()
    }
}

impl Related<super::re_services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
