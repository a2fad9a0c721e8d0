//! Investment Discord commands - `invest`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{activity, invest},
        entities::ActivityType,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Suggests how to split available funds across savings and investments.
    ///
    /// The plan fills an emergency fund first, then a SIP, then blue-chip stocks, and parks
    /// whatever is left in a fixed deposit.
    #[poise::command(slash_command, prefix_command)]
    pub async fn invest(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Funds available to invest"] amount: f64,
    ) -> Result<()> {
        if !amount.is_finite() {
            ctx.say("❌ Invalid amount: must be a valid number").await?;
            return Ok(());
        }

        let data = ctx.data();
        let plan =
            invest::generate_investment_recommendations_with(amount, &data.settings.investment);

        if plan.is_empty() {
            ctx.say(format!(
                "💤 {amount:.2} is too little to build a plan. Try again once you have at least {:.2} to invest.",
                invest::MIN_INVESTABLE_FUNDS
            ))
            .await?;
            return Ok(());
        }

        let mut message = format!("**Investment plan for {amount:.2}**\n");
        for (step, rec) in plan.iter().enumerate() {
            writeln!(
                &mut message,
                "{}. **{}** - {:.2} ({}%)\n   {} · risk {} · returns {} · priority {}",
                step + 1,
                rec.name,
                rec.amount,
                rec.percentage,
                rec.instrument,
                rec.risk,
                rec.expected_return,
                rec.priority
            )?;
        }

        let user_id = ctx.author().id.to_string();
        activity::spawn_activity(
            &data.database,
            &user_id,
            ActivityType::Investment,
            format!(
                "Generated an investment plan for {amount:.2} across {} instruments",
                plan.len()
            ),
        );

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
