use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity-provider subject id. Write-once, the sole join key
    /// between local profile data and the external account.
    #[sea_orm(unique)]
    pub uuid: String,
    pub experience: i64,
    pub level: i64,
    pub total_score: i64,
    pub play_count: i64,
    pub mastery: i16,
    pub performance_rating: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
