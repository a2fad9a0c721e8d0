//! User directory business logic.
//!
//! Provides lookups used to resolve invitations by email and to decorate shares and
//! members with display names. Lookups for several users always go through a single
//! batched query.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Normalizes an email for storage and comparison.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a user or updates the name and email of an existing one.
///
/// Emails are stored lowercased and must be unique across users.
pub async fn register_user(
    db: &DatabaseConnection,
    user_id: &str,
    name: String,
    email: &str,
) -> Result<user::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Name cannot be empty"));
    }

    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation(format!("'{email}' is not a valid email")));
    }

    let taken = find_user_by_email(db, &email)
        .await?
        .is_some_and(|other| other.id != user_id);
    if taken {
        return Err(Error::validation(format!(
            "Email '{email}' is already registered to another user"
        )));
    }

    let result = match User::find_by_id(user_id).one(db).await? {
        Some(existing) => {
            let mut active: user::ActiveModel = existing.into();
            active.name = Set(name);
            active.email = Set(email);
            active.update(db).await?
        }
        None => {
            user::ActiveModel {
                id: Set(user_id.to_string()),
                name: Set(name),
                email: Set(email),
            }
            .insert(db)
            .await?
        }
    };

    info!(user_id, "Registered user");
    Ok(result)
}

/// Finds a user by email, ignoring case and surrounding whitespace.
pub async fn find_user_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fetches every listed user in one query, keyed by id.
///
/// Ids with no matching user are simply absent from the map.
pub async fn find_users_by_ids<C>(db: &C, ids: &[String]) -> Result<HashMap<String, user::Model>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = User::find()
        .filter(user::Column::Id.is_in(ids.iter().cloned()))
        .all(db)
        .await?;

    Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_register_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = register_user(&db, "u1", "   ".to_string(), "a@example.com").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = register_user(&db, "u1", "Asha".to_string(), "not-an-email").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_and_find_by_email() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(&db, "u1", "Asha".to_string(), "  Asha@Example.com ").await?;
        assert_eq!(user.email, "asha@example.com");

        let found = find_user_by_email(&db, "ASHA@example.COM").await?;
        assert_eq!(found.unwrap().id, "u1");

        let missing = find_user_by_email(&db, "nobody@example.com").await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_register_updates_existing_user() -> Result<()> {
        let db = setup_test_db().await?;

        register_user(&db, "u1", "Asha".to_string(), "asha@example.com").await?;
        let updated = register_user(&db, "u1", "Asha K".to_string(), "ak@example.com").await?;

        assert_eq!(updated.name, "Asha K");
        assert!(find_user_by_email(&db, "asha@example.com").await?.is_none());
        assert_eq!(User::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() -> Result<()> {
        let db = setup_test_db().await?;

        register_user(&db, "u1", "Asha".to_string(), "shared@example.com").await?;
        let result = register_user(&db, "u2", "Ravi".to_string(), "shared@example.com").await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_users_by_ids_batches() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1", "Asha").await?;
        create_test_user(&db, "u2", "Ravi").await?;
        create_test_user(&db, "u3", "Meera").await?;

        let ids = vec!["u1".to_string(), "u3".to_string(), "ghost".to_string()];
        let users = find_users_by_ids(&db, &ids).await?;

        assert_eq!(users.len(), 2);
        assert_eq!(users["u1"].name, "Asha");
        assert_eq!(users["u3"].name, "Meera");
        assert!(!users.contains_key("ghost"));

        assert!(find_users_by_ids(&db, &[]).await?.is_empty());
        Ok(())
    }
}
