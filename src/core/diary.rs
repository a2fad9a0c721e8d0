//! Budget diary business logic - ownership, renaming, and membership.
//!
//! Every mutation here is owner-only. Authorization runs before any write, and each
//! successful change is recorded in the activity log as a settings change.

use crate::{
    core::{
        access::require_access,
        activity::spawn_activity,
        user::{find_user_by_email, find_users_by_ids},
    },
    entities::{
        AccessLevel, ActivityType, BudgetDiary, BudgetDiaryMember, budget_diary,
        budget_diary_member,
    },
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{info, instrument};

/// A membership row decorated with the member's directory details.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryMember {
    /// The stored membership
    pub membership: budget_diary_member::Model,
    /// Member's display name, if they are in the user directory
    pub name: Option<String>,
    /// Member's email, if they are in the user directory
    pub email: Option<String>,
}

/// Creates a new diary owned by `owner_id`.
///
/// A user has at most one default diary: creating a default diary clears the flag on the
/// owner's other diaries in the same transaction.
#[instrument(skip(db, description))]
pub async fn create_diary(
    db: &DatabaseConnection,
    owner_id: &str,
    name: String,
    description: Option<String>,
    is_default: bool,
) -> Result<budget_diary::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Diary name cannot be empty"));
    }

    let now = chrono::Utc::now();
    let txn = db.begin().await?;

    if is_default {
        BudgetDiary::update_many()
            .col_expr(budget_diary::Column::IsDefault, Expr::value(false))
            .filter(budget_diary::Column::UserId.eq(owner_id))
            .exec(&txn)
            .await?;
    }

    let diary = budget_diary::ActiveModel {
        user_id: Set(owner_id.to_string()),
        name: Set(name),
        description: Set(description),
        is_default: Set(is_default),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(diary_id = diary.id, "Created budget diary");
    spawn_activity(
        db,
        owner_id,
        ActivityType::SettingsChange,
        format!("Created budget diary '{}'", diary.name),
    );

    Ok(diary)
}

/// Finds a diary by its unique ID.
pub async fn get_diary_by_id(
    db: &DatabaseConnection,
    diary_id: i64,
) -> Result<Option<budget_diary::Model>> {
    BudgetDiary::find_by_id(diary_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every diary a user can see, with the access level they hold on each.
///
/// Owned diaries come first (default diary leading), followed by shared ones, each group
/// ordered by name.
pub async fn get_accessible_diaries(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<(budget_diary::Model, AccessLevel)>> {
    let owned = BudgetDiary::find()
        .filter(budget_diary::Column::UserId.eq(user_id))
        .order_by_desc(budget_diary::Column::IsDefault)
        .order_by_asc(budget_diary::Column::Name)
        .all(db)
        .await?;

    let memberships = BudgetDiaryMember::find()
        .filter(budget_diary_member::Column::UserId.eq(user_id))
        .find_also_related(BudgetDiary)
        .all(db)
        .await?;

    let mut shared: Vec<(budget_diary::Model, AccessLevel)> = memberships
        .into_iter()
        .filter_map(|(member, diary)| diary.map(|d| (d, member.access_level)))
        .collect();
    shared.sort_by(|a, b| a.0.name.cmp(&b.0.name));

    Ok(owned
        .into_iter()
        .map(|d| (d, AccessLevel::Owner))
        .chain(shared)
        .collect())
}

/// Renames a diary and replaces its description. Owner only.
#[instrument(skip(db, name, description))]
pub async fn rename_diary(
    db: &DatabaseConnection,
    diary_id: i64,
    user_id: &str,
    name: String,
    description: Option<String>,
) -> Result<budget_diary::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Diary name cannot be empty"));
    }

    let diary = require_access(db, diary_id, user_id, AccessLevel::Owner, "rename").await?;
    let old_name = diary.name.clone();

    let mut active: budget_diary::ActiveModel = diary.into();
    active.name = Set(name);
    active.description = Set(description);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    spawn_activity(
        db,
        user_id,
        ActivityType::SettingsChange,
        format!("Renamed budget diary '{old_name}' to '{}'", updated.name),
    );

    Ok(updated)
}

/// Grants a user access to a diary, looked up by email. Owner only.
///
/// An existing membership for the same user is overwritten with the new level. Nothing is
/// written when the email matches no user.
#[instrument(skip(db))]
pub async fn add_member(
    db: &DatabaseConnection,
    diary_id: i64,
    inviter_id: &str,
    email: &str,
    access_level: AccessLevel,
) -> Result<budget_diary_member::Model> {
    if access_level == AccessLevel::Owner {
        return Err(Error::validation(
            "Members can only be granted editor or viewer access",
        ));
    }

    let diary = require_access(db, diary_id, inviter_id, AccessLevel::Owner, "share").await?;

    let invitee = find_user_by_email(db, email)
        .await?
        .ok_or_else(|| Error::not_found("User", email))?;

    if invitee.id == diary.user_id {
        return Err(Error::validation("The owner already has full access"));
    }

    // Upsert on the (diary, user) unique index
    let row = budget_diary_member::ActiveModel {
        budget_sheet_id: Set(diary_id),
        user_id: Set(invitee.id.clone()),
        access_level: Set(access_level),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    BudgetDiaryMember::insert(row)
        .on_conflict(
            OnConflict::columns([
                budget_diary_member::Column::BudgetSheetId,
                budget_diary_member::Column::UserId,
            ])
            .update_column(budget_diary_member::Column::AccessLevel)
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let membership = BudgetDiaryMember::find()
        .filter(budget_diary_member::Column::BudgetSheetId.eq(diary_id))
        .filter(budget_diary_member::Column::UserId.eq(invitee.id.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| {
            Error::not_found(
                "Membership",
                format!("{} on budget diary {diary_id}", invitee.id),
            )
        })?;

    info!(member = %invitee.id, %access_level, "Shared budget diary");
    spawn_activity(
        db,
        inviter_id,
        ActivityType::SettingsChange,
        format!(
            "Shared budget diary '{}' with {} as {access_level}",
            diary.name, invitee.email
        ),
    );

    Ok(membership)
}

/// Revokes a member's access to a diary. Owner only; the owner cannot be removed.
#[instrument(skip(db))]
pub async fn remove_member(
    db: &DatabaseConnection,
    diary_id: i64,
    owner_id: &str,
    member_user_id: &str,
) -> Result<()> {
    let diary = require_access(db, diary_id, owner_id, AccessLevel::Owner, "unshare").await?;

    if member_user_id == diary.user_id {
        return Err(Error::permission_denied(
            "remove the owner of",
            format!("budget diary {diary_id}"),
        ));
    }

    let result = BudgetDiaryMember::delete_many()
        .filter(budget_diary_member::Column::BudgetSheetId.eq(diary_id))
        .filter(budget_diary_member::Column::UserId.eq(member_user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found(
            "Membership",
            format!("{member_user_id} on budget diary {diary_id}"),
        ));
    }

    spawn_activity(
        db,
        owner_id,
        ActivityType::SettingsChange,
        format!("Removed {member_user_id} from budget diary '{}'", diary.name),
    );

    Ok(())
}

/// Lists a diary's membership rows with member names and emails.
///
/// Directory details for all members are fetched with a single batched lookup.
pub async fn list_members(db: &DatabaseConnection, diary_id: i64) -> Result<Vec<DiaryMember>> {
    let rows = BudgetDiaryMember::find()
        .filter(budget_diary_member::Column::BudgetSheetId.eq(diary_id))
        .order_by_asc(budget_diary_member::Column::CreatedAt)
        .all(db)
        .await?;

    let ids: Vec<String> = rows.iter().map(|m| m.user_id.clone()).collect();
    let users = find_users_by_ids(db, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|membership| {
            let user = users.get(&membership.user_id);
            DiaryMember {
                name: user.map(|u| u.name.clone()),
                email: user.map(|u| u.email.clone()),
                membership,
            }
        })
        .collect())
}
