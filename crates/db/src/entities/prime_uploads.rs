//! `SeaORM` Entity for prime_uploads table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prime_uploads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub proof_of_service_docs_id: Uuid,
    pub contractor_id: Uuid,
    pub upload_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proof_of_service_docs::Entity",
        from = "Column::ProofOfServiceDocsId",
        to = "super::proof_of_service_docs::Column::Id"
    )]
    ProofOfServiceDocs,
}

impl Related<super::proof_of_service_docs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProofOfServiceDocs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
