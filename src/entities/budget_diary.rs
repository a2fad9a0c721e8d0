//! Budget diary entity - An ownable, shareable container for a user's financial records.
//!
//! Stored in the `budget_sheets` table. The owner is the `user_id` column; the owner
//! never appears in `budget_sheet_members`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget diary database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_sheets")]
pub struct Model {
    /// Unique identifier for the diary
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the diary (exactly one per diary)
    pub user_id: String,
    /// Human-readable name (e.g., "Household", "Trip to Goa")
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Whether this is the owner's default diary
    pub is_default: bool,
    /// When the diary was created
    pub created_at: DateTimeUtc,
    /// When the diary was last renamed or otherwise modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `BudgetDiary` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One diary has many explicit members
    #[sea_orm(has_many = "super::budget_diary_member::Entity")]
    Members,
}

impl Related<super::budget_diary_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
