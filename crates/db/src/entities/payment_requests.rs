//! `SeaORM` Entity for payment_requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentRequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub move_id: Uuid,
    pub is_final: bool,
    pub rejection_reason: Option<String>,
    pub status: PaymentRequestStatus,
    pub requested_at: DateTimeWithTimeZone,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub sent_to_gex_at: Option<DateTimeWithTimeZone>,
    pub received_by_gex_at: Option<DateTimeWithTimeZone>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(unique)]
    pub payment_request_number: String,
    pub sequence_number: i32,
    pub recalculation_of_payment_request_id: Option<Uuid>,
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
        belongs_to = "Entity",
        from = "Column::RecalculationOfPaymentRequestId",
        to = "Column::Id"
    )]
    RecalculationOf,
}

impl Related<super::moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Moves.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
