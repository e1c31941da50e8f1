use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "delivery_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub request_id: i64,

    /// "delivered" or "failed".
    pub outcome: String,

    /// Raw messaging API response body, or the transport error text.
    #[sea_orm(column_type = "Text")]
    pub response: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::relay_requests::Entity",
        from = "Column::RequestId",
        to = "super::relay_requests::Column::Id"
    )]
    Request,
}

impl Related<super::relay_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
