//! Split-expense Discord commands - `split`, `splits`, `settle`, `unsplit`, and `balances`.
//!
//! Shares are typed as `user:amount` pairs separated by commas. The user part may be a
//! raw Discord id or a mention such as `<@123456>`.

use crate::core::split::ShareInput;

/// Parses `"<@1>:100, 2:50.5"` into share inputs.
///
/// # Errors
/// Returns a message describing the first malformed pair.
pub fn parse_shares(input: &str) -> std::result::Result<Vec<ShareInput>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (who, amount) = part
                .rsplit_once(':')
                .ok_or_else(|| format!("`{part}` should look like `@user:amount`"))?;

            let user_id = who
                .trim()
                .trim_start_matches("<@")
                .trim_start_matches('!')
                .trim_end_matches('>')
                .to_string();
            if user_id.is_empty() || !user_id.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("`{}` is not a user mention or id", who.trim()));
            }

            let amount: f64 = amount
                .trim()
                .parse()
                .map_err(|_| format!("`{}` is not a number", amount.trim()))?;

            Ok(ShareInput { user_id, amount })
        })
        .collect()
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::parse_shares;
    use crate::{
        bot::{BotData, reply_with_failure},
        core::split::{self, NewSplitExpense, SplitExpenseDetails},
        entities::ShareStatus,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const DEFAULT_CATEGORY: &str = "general";
    const MAX_LISTED_EXPENSES: usize = 10;

    /// Outcome a participant can choose when settling a share
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum Settlement {
        #[name = "paid"]
        Paid,
        #[name = "declined"]
        Declined,
    }

    impl From<Settlement> for ShareStatus {
        fn from(value: Settlement) -> Self {
            match value {
                Settlement::Paid => Self::Paid,
                Settlement::Declined => Self::Declined,
            }
        }
    }

    fn status_icon(status: ShareStatus) -> &'static str {
        match status {
            ShareStatus::Pending => "⏳",
            ShareStatus::Paid => "✅",
            ShareStatus::Declined => "🚫",
        }
    }

    fn write_expense(out: &mut String, details: &SplitExpenseDetails) -> std::fmt::Result {
        let expense = &details.expense;
        writeln!(
            out,
            "**#{} {}** - {:.2} {} · {} · {}",
            expense.id,
            expense.title,
            expense.total_amount,
            expense.currency,
            expense.category,
            expense.date
        )?;
        for d in &details.shares {
            let who = d
                .user_name
                .clone()
                .unwrap_or_else(|| format!("<@{}>", d.share.user_id));
            writeln!(
                out,
                "   {} share `{}` {who}: {:.2} ({})",
                status_icon(d.share.status),
                d.share.id,
                d.share.amount,
                d.share.status
            )?;
        }
        Ok(())
    }

    /// Splits an expense between several people.
    ///
    /// Your own share, if you include one, is recorded as already paid.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn split(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What the expense was for"] title: String,
        #[description = "Total amount"] amount: f64,
        #[description = "Shares as @user:amount, separated by commas"] shares: String,
        #[description = "Category (defaults to general)"] category: Option<String>,
        #[description = "Optional longer description"] description: Option<String>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Currency code (defaults to the configured currency)"]
        currency: Option<String>,
    ) -> Result<()> {
        let shares = match parse_shares(&shares) {
            Ok(shares) => shares,
            Err(message) => {
                ctx.say(format!("❌ {message}")).await?;
                return Ok(());
            }
        };

        let date = match date.as_deref() {
            Some(raw) => match chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    ctx.say(format!("❌ `{raw}` is not a date like 2024-05-31"))
                        .await?;
                    return Ok(());
                }
            },
            None => chrono::Local::now().date_naive(),
        };

        let data = ctx.data();
        let new = NewSplitExpense {
            title,
            description,
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            total_amount: amount,
            currency: currency.unwrap_or_else(|| data.settings.ledger.default_currency.clone()),
            date,
            shares,
        };

        let creator_id = ctx.author().id.to_string();
        match split::create_split_expense(&data.database, &creator_id, new).await {
            Ok(details) => {
                let mut message = String::from("✅ Expense recorded\n");
                write_expense(&mut message, &details)?;
                ctx.say(message).await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Lists split expenses you created or have a share in.
    #[poise::command(slash_command, prefix_command)]
    pub async fn splits(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        let expenses = split::fetch_user_split_expenses(db, &user_id).await?;
        if expenses.is_empty() {
            ctx.say("📭 No split expenses yet. Use `/split` to record one.")
                .await?;
            return Ok(());
        }

        let mut message = String::from("**Your split expenses**\n");
        for details in expenses.iter().take(MAX_LISTED_EXPENSES) {
            write_expense(&mut message, details)?;
        }
        if expenses.len() > MAX_LISTED_EXPENSES {
            writeln!(
                &mut message,
                "…and {} older expenses",
                expenses.len() - MAX_LISTED_EXPENSES
            )?;
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Marks one of your pending shares as paid or declined.
    #[poise::command(slash_command, prefix_command)]
    pub async fn settle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Share ID shown by /splits"] share_id: i64,
        #[description = "Paid or declined"] outcome: Settlement,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        match split::update_expense_share_status(db, share_id, outcome.into(), &user_id).await {
            Ok(share) => {
                ctx.say(format!(
                    "{} Share `{}` of {:.2} is now **{}**",
                    status_icon(share.status),
                    share.id,
                    share.amount,
                    share.status
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Deletes a split expense you created, along with all of its shares.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unsplit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense ID shown by /splits"] expense_id: i64,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        match split::delete_split_expense(db, expense_id, &user_id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Deleted split expense #{expense_id}"))
                    .await?;
                Ok(())
            }
            Err(e) => reply_with_failure(ctx, e).await,
        }
    }

    /// Shows what you are owed and what you owe across pending shares.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balances(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        let balances = split::get_split_balances(db, &user_id).await?;
        let open: Vec<_> = balances
            .iter()
            .filter(|b| b.owed_to_you > 0.0 || b.you_owe > 0.0)
            .collect();

        if open.is_empty() {
            ctx.say("🎉 You're all settled up.").await?;
            return Ok(());
        }

        let mut message = String::from("**Balances**\n");
        for balance in open {
            writeln!(
                &mut message,
                "• {}: owed to you {:.2} · you owe {:.2}",
                balance.currency, balance.owed_to_you, balance.you_owe
            )?;
        }

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
