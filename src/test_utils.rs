//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        diary,
        split::{self, NewSplitExpense, ShareInput, SplitExpenseDetails},
        user,
    },
    entities::{self, AccessLevel, Activity, ActivityType, ShareStatus, activity},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::time::Duration;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a user whose email is `<id>@example.com`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
) -> Result<entities::user::Model> {
    user::register_user(db, id, name.to_string(), &format!("{id}@example.com")).await
}

/// Creates a non-default diary with no description.
pub async fn create_test_diary(
    db: &DatabaseConnection,
    owner_id: &str,
    name: &str,
) -> Result<entities::budget_diary::Model> {
    diary::create_diary(db, owner_id, name.to_string(), None, false).await
}

/// Inserts a membership row directly, bypassing the owner check in `add_member`.
pub async fn insert_test_member(
    db: &DatabaseConnection,
    diary_id: i64,
    user_id: &str,
    access_level: AccessLevel,
) -> Result<entities::budget_diary_member::Model> {
    let member = entities::budget_diary_member::ActiveModel {
        budget_sheet_id: Set(diary_id),
        user_id: Set(user_id.to_string()),
        access_level: Set(access_level),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    Ok(member.insert(db).await?)
}

/// Waits for background activity appends to land.
///
/// Polls until `user_id` has at least `count` entries of `activity_type`, giving up after
/// about two seconds, and returns whatever entries exist at that point.
pub async fn wait_for_activities(
    db: &DatabaseConnection,
    user_id: &str,
    activity_type: ActivityType,
    count: usize,
) -> Result<Vec<activity::Model>> {
    for _ in 0..100 {
        let entries = activities_of(db, user_id, activity_type).await?;
        if entries.len() >= count {
            return Ok(entries);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    activities_of(db, user_id, activity_type).await
}

async fn activities_of(
    db: &DatabaseConnection,
    user_id: &str,
    activity_type: ActivityType,
) -> Result<Vec<activity::Model>> {
    Ok(Activity::find()
        .filter(activity::Column::UserId.eq(user_id))
        .filter(activity::Column::ActivityType.eq(activity_type))
        .all(db)
        .await?)
}

/// Shorthand for a share input.
pub fn share(user_id: &str, amount: f64) -> ShareInput {
    ShareInput {
        user_id: user_id.to_string(),
        amount,
    }
}

/// Builds a new expense with sensible defaults.
///
/// # Defaults
/// * `title`: "Dinner"
/// * `category`: "food"
/// * `currency`: "INR"
/// * `date`: 2024-05-01
pub fn new_test_expense(total_amount: f64, shares: Vec<ShareInput>) -> NewSplitExpense {
    NewSplitExpense {
        title: "Dinner".to_string(),
        description: None,
        category: "food".to_string(),
        total_amount,
        currency: "INR".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
        shares,
    }
}

/// Creates a split expense whose total is the sum of the given shares.
pub async fn create_test_split(
    db: &DatabaseConnection,
    creator_id: &str,
    shares: Vec<ShareInput>,
) -> Result<SplitExpenseDetails> {
    let total = shares.iter().map(|s| s.amount).sum();
    split::create_split_expense(db, creator_id, new_test_expense(total, shares)).await
}

/// Returns the id of `user_id`'s share, asserting it is still pending.
pub fn pending_share_of(details: &SplitExpenseDetails, user_id: &str) -> i64 {
    let found = details
        .shares
        .iter()
        .find(|d| d.share.user_id == user_id)
        .map(|d| &d.share);
    match found {
        Some(share) if share.status == ShareStatus::Pending => share.id,
        other => panic!("expected a pending share for {user_id}, found {other:?}"),
    }
}
