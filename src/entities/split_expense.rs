//! Split expense entity - A shared expense with one creator and per-participant shares.
//!
//! The `total_amount` always equals the sum of the shares stored in
//! `split_expense_shares`; an expense is never persisted without its shares.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Split expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "split_expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title (e.g., "Dinner at Toit")
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Spending category (e.g., "food", "travel")
    pub category: String,
    /// Total amount, equal to the sum of all shares
    pub total_amount: f64,
    /// ISO currency code (e.g., `"INR"`)
    pub currency: String,
    /// Day the expense happened
    pub date: Date,
    /// User who created the expense; the only one allowed to delete it
    pub creator_id: String,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `SplitExpense` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One expense has many shares
    #[sea_orm(has_many = "super::split_expense_share::Entity")]
    Shares,
}

impl Related<super::split_expense_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
