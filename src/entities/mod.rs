//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod activity;
pub mod budget_diary;
pub mod budget_diary_member;
pub mod split_expense;
pub mod split_expense_share;
pub mod user;

// Re-export specific types to avoid conflicts
pub use activity::{
    ActivityType, Column as ActivityColumn, Entity as Activity, Model as ActivityModel,
};
pub use budget_diary::{
    Column as BudgetDiaryColumn, Entity as BudgetDiary, Model as BudgetDiaryModel,
};
pub use budget_diary_member::{
    AccessLevel, Column as BudgetDiaryMemberColumn, Entity as BudgetDiaryMember,
    Model as BudgetDiaryMemberModel,
};
pub use split_expense::{
    Column as SplitExpenseColumn, Entity as SplitExpense, Model as SplitExpenseModel,
};
pub use split_expense_share::{
    Column as SplitExpenseShareColumn, Entity as SplitExpenseShare,
    Model as SplitExpenseShareModel, ShareStatus,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
