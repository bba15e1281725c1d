//! Utility command handlers
//!
//! Handles: help, ping
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;

use super::respond;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;

pub const HELP_TEXT: &str = r#"**I keep track of your subscriptions and remind you before each payment.**

`/add` - Add a new subscription. I'll ask for the service name, the amount and the next payment date.
`/list` - Show all your subscriptions with their IDs, amounts and payment dates.
`/paid <ID>` - Mark a subscription as paid. The payment date moves one month ahead and reminders reset.
`/delete <ID>` - Remove a subscription from your list.
`/cancel` - Cancel the subscription you are currently adding.
`/ping` - Test bot responsiveness

Reminders arrive as direct messages 3 days and 1 day before a payment, and once more if it is overdue."#;

/// Handler for utility commands: help, ping
pub struct UtilityHandler;

#[async_trait]
impl SlashCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help", "ping"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "help" => respond(serenity_ctx, command, vec![HELP_TEXT.to_string()]).await,
            "ping" => {
                let text = format!("Pong! ⏱️ Up {}", format_uptime(ctx.start_time.elapsed()));
                respond(serenity_ctx, command, vec![text]).await?;
                info!("Ping command completed for user {}", command.user.id);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
