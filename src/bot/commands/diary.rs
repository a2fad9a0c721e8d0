//! Budget diary Discord commands - `diary` and its subcommands.
//!
//! Diaries are picked by name through autocomplete, which suggests values of the form
//! `Household #12`; the trailing `#id` disambiguates diaries that share a name.

use crate::entities::{AccessLevel, budget_diary};

/// Picks the diary a user meant from the diaries they can access.
///
/// Accepts `Name #id` as produced by autocomplete, a bare `#id` or id, or a plain name
/// (case-insensitive). Returns `None` when nothing, or more than one diary, matches.
/// A reference that parses as an id but matches no diary is retried as a name.
pub fn pick_diary(
    diaries: &[(budget_diary::Model, AccessLevel)],
    reference: &str,
) -> Option<(budget_diary::Model, AccessLevel)> {
    let reference = reference.trim();

    let id = reference
        .rsplit_once('#')
        .map_or(reference, |(_, id)| id)
        .trim()
        .parse::<i64>()
        .ok();
    if let Some(found) = id.and_then(|id| diaries.iter().find(|(d, _)| d.id == id)) {
        return Some(found.clone());
    }

    let mut by_name = diaries
        .iter()
        .filter(|(d, _)| d.name.eq_ignore_ascii_case(reference));
    match (by_name.next(), by_name.next()) {
        (Some(found), None) => Some(found.clone()),
        _ => None,
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::pick_diary;
    use crate::{
        bot::{BotData, handlers::autocomplete, reply_with_failure},
        core::{access, diary},
        entities::{AccessLevel, budget_diary},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Access a member can be granted
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum MemberRole {
        #[name = "viewer"]
        Viewer,
        #[name = "editor"]
        Editor,
    }

    impl From<MemberRole> for AccessLevel {
        fn from(value: MemberRole) -> Self {
            match value {
                MemberRole::Viewer => Self::Viewer,
                MemberRole::Editor => Self::Editor,
            }
        }
    }

    /// Resolves a diary argument, replying to the user when it matches nothing.
    async fn resolve_diary(
        ctx: poise::Context<'_, BotData, Error>,
        reference: &str,
    ) -> Result<Option<(budget_diary::Model, AccessLevel)>> {
        let user_id = ctx.author().id.to_string();
        let diaries = diary::get_accessible_diaries(&ctx.data().database, &user_id).await?;

        let picked = pick_diary(&diaries, reference);
        if picked.is_none() {
            ctx.say(format!(
                "❌ Could not find a single budget diary matching '{reference}'. Use `/diary list` to see yours."
            ))
            .await?;
        }
        Ok(picked)
    }

    /// Parent command for managing budget diaries.
    #[poise::command(
        slash_command,
        subcommands(
            "diary_create",
            "diary_list",
            "diary_rename",
            "diary_share",
            "diary_unshare",
            "diary_members"
        )
    )]
    pub async fn diary(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Budget diary command. Available subcommands:\n\
            `/diary create` - Create a new diary\n\
            `/diary list` - List diaries you own or can access\n\
            `/diary rename` - Rename a diary you own\n\
            `/diary share` - Share a diary you own by email\n\
            `/diary unshare` - Remove someone's access to a diary you own\n\
            `/diary members` - Show who can access a diary";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a new budget diary owned by you.
    #[poise::command(slash_command, rename = "create")]
    pub async fn diary_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name for the diary"] name: String,
        #[description = "Optional description"] description: Option<String>,
        #[description = "Make this your default diary"] default: Option<bool>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        match diary::create_diary(db, &user_id, name, description, default.unwrap_or(false))
            .await
        {
            Ok(created) => {
                ctx.say(format!(
                    "📒 Created budget diary **{}** (#{})",
                    created.name, created.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Lists the diaries you own or have been given access to.
    #[poise::command(slash_command, rename = "list")]
    pub async fn diary_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        let diaries = diary::get_accessible_diaries(db, &user_id).await?;
        if diaries.is_empty() {
            ctx.say("📭 No budget diaries yet. Create one with `/diary create`.")
                .await?;
            return Ok(());
        }

        let mut message = String::from("**Your budget diaries**\n");
        for (d, level) in &diaries {
            let default_marker = if d.is_default { " ⭐" } else { "" };
            writeln!(
                &mut message,
                "• **{}** #{}{default_marker} - {level}",
                d.name, d.id
            )?;
            if let Some(description) = &d.description {
                writeln!(&mut message, "   {description}")?;
            }
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Renames a diary you own.
    #[poise::command(slash_command, rename = "rename")]
    pub async fn diary_rename(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Diary to rename"]
        #[autocomplete = "autocomplete::autocomplete_diary"]
        diary_name: String,
        #[description = "New name"] new_name: String,
        #[description = "New description (leave empty to clear)"] description: Option<String>,
    ) -> Result<()> {
        let Some((target, _)) = resolve_diary(ctx, &diary_name).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        match diary::rename_diary(db, target.id, &user_id, new_name, description).await {
            Ok(renamed) => {
                ctx.say(format!(
                    "✏️ Renamed **{}** to **{}**",
                    target.name, renamed.name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Shares a diary you own with someone by their registered email.
    #[poise::command(slash_command, rename = "share")]
    pub async fn diary_share(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Diary to share"]
        #[autocomplete = "autocomplete::autocomplete_diary"]
        diary_name: String,
        #[description = "Email the person registered with"] email: String,
        #[description = "Access to grant (defaults to viewer)"] access: Option<MemberRole>,
    ) -> Result<()> {
        let Some((target, _)) = resolve_diary(ctx, &diary_name).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;
        let level = access.map_or(AccessLevel::Viewer, AccessLevel::from);

        match diary::add_member(db, target.id, &user_id, &email, level).await {
            Ok(member) => {
                ctx.say(format!(
                    "🤝 <@{}> can now access **{}** as {}",
                    member.user_id, target.name, member.access_level
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Removes someone's access to a diary you own.
    #[poise::command(slash_command, rename = "unshare")]
    pub async fn diary_unshare(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Diary to unshare"]
        #[autocomplete = "autocomplete::autocomplete_diary"]
        diary_name: String,
        #[description = "Member to remove"] member: serenity::User,
    ) -> Result<()> {
        let Some((target, _)) = resolve_diary(ctx, &diary_name).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        match diary::remove_member(db, target.id, &user_id, &member.id.to_string()).await {
            Ok(()) => {
                ctx.say(format!(
                    "👋 Removed {} from **{}**",
                    member.name, target.name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Shows the owner and members of a diary you can access.
    #[poise::command(slash_command, rename = "members")]
    pub async fn diary_members(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Diary to inspect"]
        #[autocomplete = "autocomplete::autocomplete_diary"]
        diary_name: String,
    ) -> Result<()> {
        let Some((target, _)) = resolve_diary(ctx, &diary_name).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        if let Err(e) =
            access::require_access(db, target.id, &user_id, AccessLevel::Viewer, "view").await
        {
            return reply_with_failure(ctx, e).await;
        }

        let members = diary::list_members(db, target.id).await?;

        let mut message = format!(
            "**Members of {}**\n• <@{}> - owner\n",
            target.name, target.user_id
        );
        for member in &members {
            let who = match (&member.name, &member.email) {
                (Some(name), Some(email)) => format!("{name} ({email})"),
                _ => format!("<@{}>", member.membership.user_id),
            };
            writeln!(
                &mut message,
                "• {who} - {}",
                member.membership.access_level
            )?;
        }

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
