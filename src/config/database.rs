//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    Activity, BudgetDiary, BudgetDiaryMember, SplitExpense, SplitExpenseShare, User,
    budget_diary_member,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/finance_share.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the
/// default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// The returned handle is owned by the process entry point and passed by reference
/// into every core operation.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!("Connecting to database at {database_url}");

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Creation order follows the foreign keys: diaries before members, expenses before shares.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(BudgetDiary),
        schema.create_table_from_entity(BudgetDiaryMember),
        schema.create_table_from_entity(SplitExpense),
        schema.create_table_from_entity(SplitExpenseShare),
        schema.create_table_from_entity(Activity),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    // A user holds at most one membership per diary
    let member_index = Index::create()
        .name("idx_budget_sheet_members_sheet_user")
        .table(BudgetDiaryMember)
        .col(budget_diary_member::Column::BudgetSheetId)
        .col(budget_diary_member::Column::UserId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&member_index)).await?;

    Ok(())
}
