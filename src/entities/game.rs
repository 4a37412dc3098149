use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a game is best played.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    #[sea_orm(string_value = "OUT")]
    Outdoor,
    #[sea_orm(string_value = "IN")]
    Indoor,
    #[sea_orm(string_value = "BOTH")]
    Both,
}

impl Environment {
    /// Human readable label used in admin listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Outdoor => "Outdoor",
            Self::Indoor => "Indoor",
            Self::Both => "Indoor or Outdoor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub min_players: i16,
    pub max_players: i16,
    /// Minutes.
    pub min_duration: i16,
    pub max_duration: i16,
    pub environment: Environment,
    pub category_id: Option<i32>,
    /// Cleared instead of deleting the row.
    pub is_active: bool,
    pub attachments: Option<String>,
    pub created: DateTimeUtc,
    pub modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::game_equipment::Entity")]
    GameEquipment,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::game_equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameEquipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
