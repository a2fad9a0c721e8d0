//! Authorization core - resolves what a user may do on a budget diary.
//!
//! The owner never has a membership row; ownership is read from the diary itself.
//! Having no access is an ordinary `None`, not an error.

use crate::{
    entities::{AccessLevel, BudgetDiary, BudgetDiaryMember, budget_diary, budget_diary_member},
    errors::{Error, Result},
};
use sea_orm::prelude::*;

/// Resolves a user's access level on a diary.
///
/// Returns `Owner` for the diary's owner, the stored level for a member, and `None` for
/// everyone else, including when the diary does not exist.
pub async fn resolve_access<C>(db: &C, diary_id: i64, user_id: &str) -> Result<Option<AccessLevel>>
where
    C: ConnectionTrait,
{
    let Some(diary) = BudgetDiary::find_by_id(diary_id).one(db).await? else {
        return Ok(None);
    };

    if diary.user_id == user_id {
        return Ok(Some(AccessLevel::Owner));
    }

    member_access(db, diary_id, user_id).await
}

/// Loads a diary and checks that `user_id` holds at least `minimum` on it.
///
/// # Errors
/// `PermissionDenied` if the user's access is missing or below `minimum`. A diary that does
/// not exist is reported the same way, so callers cannot tell unknown ids from diaries
/// they were not shared on.
pub async fn require_access<C>(
    db: &C,
    diary_id: i64,
    user_id: &str,
    minimum: AccessLevel,
    operation: &'static str,
) -> Result<budget_diary::Model>
where
    C: ConnectionTrait,
{
    let denied = || Error::permission_denied(operation, format!("budget diary {diary_id}"));

    let diary = BudgetDiary::find_by_id(diary_id)
        .one(db)
        .await?
        .ok_or_else(denied)?;

    let level = if diary.user_id == user_id {
        Some(AccessLevel::Owner)
    } else {
        member_access(db, diary_id, user_id).await?
    };

    match level {
        Some(level) if level.satisfies(minimum) => Ok(diary),
        _ => Err(denied()),
    }
}

async fn member_access<C>(db: &C, diary_id: i64, user_id: &str) -> Result<Option<AccessLevel>>
where
    C: ConnectionTrait,
{
    let membership = BudgetDiaryMember::find()
        .filter(budget_diary_member::Column::BudgetSheetId.eq(diary_id))
        .filter(budget_diary_member::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    Ok(membership.map(|m| m.access_level))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::Owner.satisfies(AccessLevel::Owner));
        assert!(AccessLevel::Owner.satisfies(AccessLevel::Viewer));
        assert!(AccessLevel::Editor.satisfies(AccessLevel::Viewer));
        assert!(!AccessLevel::Editor.satisfies(AccessLevel::Owner));
        assert!(!AccessLevel::Viewer.satisfies(AccessLevel::Editor));
    }

    #[tokio::test]
    async fn test_owner_without_membership_row() -> Result<()> {
        let db = setup_test_db().await?;
        let diary = create_test_diary(&db, "owner", "Household").await?;

        let access = resolve_access(&db, diary.id, "owner").await?;
        assert_eq!(access, Some(AccessLevel::Owner));

        let rows = BudgetDiaryMember::find().all(&db).await?;
        assert!(rows.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_member_and_stranger_access() -> Result<()> {
        let db = setup_test_db().await?;
        let diary = create_test_diary(&db, "owner", "Household").await?;
        insert_test_member(&db, diary.id, "editor", AccessLevel::Editor).await?;
        insert_test_member(&db, diary.id, "viewer", AccessLevel::Viewer).await?;

        assert_eq!(
            resolve_access(&db, diary.id, "editor").await?,
            Some(AccessLevel::Editor)
        );
        assert_eq!(
            resolve_access(&db, diary.id, "viewer").await?,
            Some(AccessLevel::Viewer)
        );
        assert_eq!(resolve_access(&db, diary.id, "stranger").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_diary_resolves_to_none() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(resolve_access(&db, 999, "anyone").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let result = resolve_access(&db, 1, "owner").await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_require_access() -> Result<()> {
        let db = setup_test_db().await?;
        let diary = create_test_diary(&db, "owner", "Household").await?;
        insert_test_member(&db, diary.id, "viewer", AccessLevel::Viewer).await?;

        let found = require_access(&db, diary.id, "owner", AccessLevel::Owner, "rename").await?;
        assert_eq!(found.id, diary.id);

        require_access(&db, diary.id, "viewer", AccessLevel::Viewer, "view").await?;

        let denied = require_access(&db, diary.id, "viewer", AccessLevel::Editor, "edit").await;
        assert!(matches!(
            denied.unwrap_err(),
            Error::PermissionDenied {
                operation: "edit",
                ..
            }
        ));

        let missing = require_access(&db, 42, "owner", AccessLevel::Viewer, "view").await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::PermissionDenied {
                operation: "view",
                ..
            }
        ));

        Ok(())
    }
}
