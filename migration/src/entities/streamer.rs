use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "streamers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub platform: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subscriber_history::Entity")]
    SubscriberHistory,
}

impl Related<super::subscriber_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubscriberHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
