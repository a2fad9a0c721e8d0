//! Budget diary member entity - A non-owner's access grant on a shared diary.
//!
//! Each row is a `(diary, user, access_level)` triple. Rows only ever hold `editor`
//! or `viewer`; ownership comes from the diary itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access a user has on a budget diary, in decreasing order of privilege.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AccessLevel {
    /// Full control, including renaming and sharing
    #[sea_orm(string_value = "owner")]
    Owner,
    /// May record and change entries
    #[sea_orm(string_value = "editor")]
    Editor,
    /// Read-only access
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl AccessLevel {
    const fn rank(self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Editor => 2,
            Self::Viewer => 1,
        }
    }

    /// Returns true if this level grants at least the privileges of `required`.
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budget diary member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_sheet_members")]
pub struct Model {
    /// Unique identifier for the membership row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Diary this membership grants access to
    pub budget_sheet_id: i64,
    /// Member's user ID
    pub user_id: String,
    /// Granted level, `editor` or `viewer`
    pub access_level: AccessLevel,
    /// When access was granted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `BudgetDiaryMember` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each membership belongs to one diary
    #[sea_orm(
        belongs_to = "super::budget_diary::Entity",
        from = "Column::BudgetSheetId",
        to = "super::budget_diary::Column::Id"
    )]
    BudgetDiary,
}

impl Related<super::budget_diary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetDiary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
