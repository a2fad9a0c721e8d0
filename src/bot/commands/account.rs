//! Account Discord commands - `register` and `activity`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, reply_with_failure},
        core::{activity, user},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const DEFAULT_ACTIVITY_LIMIT: u64 = 10;
    const MAX_ACTIVITY_LIMIT: u64 = 25;

    /// Registers your name and email so others can share diaries and split expenses with you.
    #[poise::command(slash_command, prefix_command)]
    pub async fn register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name shown to people you share with"] name: String,
        #[description = "Email others will use to invite you"] email: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        match user::register_user(db, &user_id, name, &email).await {
            Ok(registered) => {
                ctx.say(format!(
                    "✅ Registered as **{}** ({})",
                    registered.name, registered.email
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Shows your most recent activity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn activity(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many entries to show (max 25)"] limit: Option<u64>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);

        let entries = activity::get_recent_activities(db, &user_id, limit).await?;
        if entries.is_empty() {
            ctx.say("📭 No activity yet.").await?;
            return Ok(());
        }

        let mut message = String::from("**Recent Activity**\n");
        for entry in &entries {
            writeln!(
                &mut message,
                "• `{}` {}",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.description
            )?;
        }

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
