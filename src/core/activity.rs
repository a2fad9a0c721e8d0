//! Activity log business logic.
//!
//! Appends are best-effort: a failed append is logged and dropped, and never changes the
//! outcome of the operation that triggered it.

use crate::{
    entities::{Activity, ActivityType, activity},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::warn;

/// Appends an entry to the activity log, swallowing any failure.
///
/// Call this only after the primary operation has committed, and never while holding an
/// open transaction on the same connection.
pub async fn log_activity<C>(
    db: &C,
    user_id: &str,
    activity_type: ActivityType,
    description: impl Into<String>,
) where
    C: ConnectionTrait,
{
    let entry = activity::ActiveModel {
        user_id: Set(user_id.to_string()),
        activity_type: Set(activity_type),
        description: Set(description.into()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    if let Err(e) = entry.insert(db).await {
        warn!(user_id, ?activity_type, "Failed to append activity: {e}");
    }
}

/// Appends an entry on a background task so the caller never waits on the activity log.
///
/// Must be called from within a Tokio runtime. The connection handle is cloned; the pool
/// behind it is shared.
pub fn spawn_activity(
    db: &DatabaseConnection,
    user_id: &str,
    activity_type: ActivityType,
    description: impl Into<String>,
) {
    let db = db.clone();
    let user_id = user_id.to_string();
    let description = description.into();

    tokio::spawn(async move {
        log_activity(&db, &user_id, activity_type, description).await;
    });
}

/// Retrieves a user's most recent activity entries, newest first.
pub async fn get_recent_activities(
    db: &DatabaseConnection,
    user_id: &str,
    limit: u64,
) -> Result<Vec<activity::Model>> {
    Activity::find()
        .filter(activity::Column::UserId.eq(user_id))
        .order_by_desc(activity::Column::CreatedAt)
        .order_by_desc(activity::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
