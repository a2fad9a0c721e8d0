//! Split expense share entity - One participant's portion of a split expense.
//!
//! Shares settle through a small state machine: `pending` moves to either `paid`
//! or `declined`, and both of those are terminal.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement status of a share
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ShareStatus {
    /// Awaiting settlement
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled by the participant
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Refused by the participant
    #[sea_orm(string_value = "declined")]
    Declined,
}

impl ShareStatus {
    /// `paid` and `declined` accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split expense share database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "split_expense_shares")]
pub struct Model {
    /// Unique identifier for the share
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the expense this share belongs to
    pub split_expense_id: i64,
    /// Participant who owes this share
    pub user_id: String,
    /// Portion of the expense total
    pub amount: f64,
    /// Settlement status
    pub status: ShareStatus,
    /// When the share was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `SplitExpenseShare` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each share belongs to one expense
    #[sea_orm(
        belongs_to = "super::split_expense::Entity",
        from = "Column::SplitExpenseId",
        to = "super::split_expense::Column::Id"
    )]
    SplitExpense,
}

impl Related<super::split_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SplitExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
