use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "subscriber_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub streamer_id: i64,
    pub count: i64,
    /// Observation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::streamer::Entity",
        from = "Column::StreamerId",
        to = "super::streamer::Column::Id",
        on_delete = "Cascade"
    )]
    Streamer,
}

impl Related<super::streamer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Streamer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
