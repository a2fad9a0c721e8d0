//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Finance Share Help**\n\
        Split bills, share budget diaries, and plan investments.\n\n\
        **Getting Started**\n\
        • `/register <name> <email>` - Adds you to the directory so others can invite you.\n\n\
        **Split Expenses**\n\
        • `/split <title> <amount> <shares>` - Splits an expense. Shares look like `@Asha:250, @Ravi:250`.\n\
        • `/splits` - Lists expenses you created or have a share in.\n\
        • `/settle <share_id> <paid|declined>` - Settles one of your pending shares.\n\
        • `/unsplit <expense_id>` - Deletes an expense you created.\n\
        • `/balances` - Shows what you are owed and what you owe.\n\n\
        **Budget Diaries**\n\
        • `/diary <subcommand>` - create, list, rename, share, unshare, members.\n\n\
        **Planning**\n\
        • `/invest <amount>` - Suggests how to allocate available funds.\n\
        • `/activity` - Shows your recent activity.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
