//! Activity entity - Append-only audit trail of user-significant actions.
//!
//! Rows are only ever inserted; nothing in the crate updates or deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of action recorded in the activity log
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ActivityType {
    /// Diary created, renamed, or its membership changed
    #[sea_orm(string_value = "SETTINGS_CHANGE")]
    SettingsChange,
    /// Split expense created or deleted
    #[sea_orm(string_value = "SPLIT_EXPENSE")]
    SplitExpense,
    /// A share was marked paid or declined
    #[sea_orm(string_value = "SPLIT_SETTLEMENT")]
    SplitSettlement,
    /// An investment plan was generated
    #[sea_orm(string_value = "INVESTMENT")]
    Investment,
}

/// Activity database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who performed the action
    pub user_id: String,
    /// Kind of action
    pub activity_type: ActivityType,
    /// Human-readable summary
    pub description: String,
    /// When the action happened
    pub created_at: DateTimeUtc,
}

/// `Activity` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
