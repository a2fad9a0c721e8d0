//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are limited to what the invoking user can actually see.

use crate::{bot::BotData, core::diary, errors::Error};

/// Provides autocomplete suggestions for budget diaries.
///
/// Suggests up to 25 diaries the user owns or can access whose name contains the partial
/// input, formatted as `Name #id` so same-named diaries stay distinguishable.
pub async fn autocomplete_diary(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(diaries) = diary::get_accessible_diaries(db, &user_id).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();

    diaries
        .into_iter()
        .filter(|(d, _)| d.name.to_lowercase().contains(&partial_lower))
        .map(|(d, _)| format!("{} #{}", d.name, d.id))
        .take(25) // Discord autocomplete limit
        .collect()
}
