//! Subscription command handlers
//!
//! Handles: add, cancel, list, paid, delete
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::respond;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_integer_option;
use crate::core::{format_amount, pack_for_message, SubscriptionError};
use crate::features::subscriptions::{format_date, NewSubscription, Payment, Subscription};

pub const EMPTY_LIST_HINT: &str =
    "You don't have any subscriptions yet. Use /add to add your first one!";
pub const NOTHING_TO_CANCEL: &str =
    "There's nothing to cancel: you are not adding a subscription right now.";
pub const CANCELLED: &str = "Cancelled. Nothing was saved; use /add to start over.";

/// Handler for subscription commands
pub struct SubscriptionHandler;

#[async_trait]
impl SlashCommandHandler for SubscriptionHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add", "cancel", "list", "paid", "delete"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let owner_id = command.user.id.to_string();
        let channel_id = command.channel_id.to_string();

        let messages = match command.data.name.as_str() {
            "add" => vec![ctx.flows.start(&owner_id, &channel_id).to_string()],
            "cancel" => {
                if ctx.flows.cancel(&owner_id, &channel_id) {
                    info!("Add flow cancelled by user {owner_id}");
                    vec![CANCELLED.to_string()]
                } else {
                    vec![NOTHING_TO_CANCEL.to_string()]
                }
            }
            "list" => list_messages(&ctx.service.list(&owner_id).await?),
            "paid" => {
                let id = required_id(command)?;
                let reply = match ctx.service.mark_paid(&owner_id, id, ctx.today()).await {
                    Ok(payment) => paid_message(&payment),
                    Err(e) => error_reply(&e, id),
                };
                vec![reply]
            }
            "delete" => {
                let id = required_id(command)?;
                let reply = match ctx.service.delete(&owner_id, id).await {
                    Ok(()) => format!(
                        "🗑️ Subscription with ID **{id}** deleted. Use /list to see the rest."
                    ),
                    Err(e) => error_reply(&e, id),
                };
                vec![reply]
            }
            _ => return Ok(()),
        };

        respond(serenity_ctx, command, messages).await
    }
}

fn required_id(command: &ApplicationCommandInteraction) -> Result<i64> {
    get_integer_option(&command.data.options, "id")
        .ok_or_else(|| anyhow::anyhow!("Missing id parameter"))
}

/// Store the subscription collected by a finished add flow and word the reply
pub async fn finish_add(ctx: &CommandContext, new: NewSubscription) -> String {
    let result = ctx
        .service
        .add(&new.owner_id, &new.label, new.amount, new.due_date, ctx.today())
        .await;

    match result {
        Ok(id) => format!(
            "✅ Subscription **{}** for **{}** added, next payment on **{}**. (ID: {id})",
            new.label,
            format_amount(new.amount),
            format_date(new.due_date)
        ),
        Err(e) => error_reply(&e, 0),
    }
}

/// One /list entry
pub fn format_entry(subscription: &Subscription) -> String {
    format!(
        "**ID {}**\nService: {}\nAmount: {}\nNext payment: {}\n",
        subscription.id,
        subscription.label,
        format_amount(subscription.amount),
        format_date(subscription.due_date)
    )
}

pub fn list_messages(subscriptions: &[Subscription]) -> Vec<String> {
    if subscriptions.is_empty() {
        return vec![EMPTY_LIST_HINT.to_string()];
    }
    let entries: Vec<String> = subscriptions.iter().map(format_entry).collect();
    pack_for_message("📋 **Your subscriptions:**\n", &entries)
}

pub fn paid_message(payment: &Payment) -> String {
    format!(
        "✅ Subscription **{}** (ID: {}) marked as paid. Next payment date: **{}**. Reminders reset.",
        payment.label,
        payment.id,
        format_date(payment.new_due_date)
    )
}

/// Word an operation error for the user; internal failures are logged here
pub fn error_reply(error: &SubscriptionError, id: i64) -> String {
    if error.is_user_facing() {
        return match error {
            SubscriptionError::NotFound { .. } => {
                format!("Subscription with ID **{id}** was not found in your list.")
            }
            correction => format!("❌ {correction}"),
        };
    }

    match error {
        SubscriptionError::Contention { .. } => {
            warn!("Subscription {id} kept changing during a command");
            format!("⚠️ Subscription **{id}** is being updated right now. Please try again.")
        }
        other => {
            error!("Subscription command failed: {other}");
            "❌ Something went wrong on my side. Please try again later.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, ValidationError};
    use crate::database::Database;
    use crate::features::add_flow::AddFlowSessions;
    use crate::features::subscriptions::{ReminderTier, SubscriptionService};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription(id: i64, label: &str) -> Subscription {
        Subscription {
            id,
            owner_id: "5".to_string(),
            label: label.to_string(),
            amount: 9.5,
            due_date: date(2025, 7, 15),
            reminder_status: ReminderTier::None,
        }
    }

    async fn context(today: NaiveDate) -> CommandContext {
        let database = Database::new(":memory:").await.unwrap();
        CommandContext::new(
            SubscriptionService::new(Arc::new(database)),
            AddFlowSessions::new(Duration::from_secs(600)),
            Arc::new(FixedClock::new(today)),
        )
    }

    #[test]
    fn test_subscription_handler_commands() {
        let names = SubscriptionHandler.command_names();
        assert_eq!(names, &["add", "cancel", "list", "paid", "delete"]);
    }

    #[test]
    fn test_empty_list_hint() {
        assert_eq!(list_messages(&[]), vec![EMPTY_LIST_HINT.to_string()]);
    }

    #[test]
    fn test_list_entry_format() {
        assert_eq!(
            format_entry(&subscription(9, "Music")),
            "**ID 9**\nService: Music\nAmount: 9.50\nNext payment: 2025-07-15\n"
        );
    }

    #[test]
    fn test_long_list_splits_under_limit() {
        let long_label = "x".repeat(150);
        let subs: Vec<Subscription> = (1..=40).map(|id| subscription(id, &long_label)).collect();

        let messages = list_messages(&subs);
        assert!(messages.len() > 1);
        assert!(messages.iter().all(|m| m.len() <= crate::core::MESSAGE_LIMIT));
        assert!(messages[0].starts_with("📋"));
        assert!(messages.last().unwrap().contains("**ID 40**"));
    }

    #[test]
    fn test_error_replies() {
        assert_eq!(
            error_reply(&SubscriptionError::NotFound { id: 7 }, 7),
            "Subscription with ID **7** was not found in your list."
        );
        assert_eq!(
            error_reply(&ValidationError::NegativeAmount.into(), 0),
            "❌ The amount can't be negative."
        );
        assert!(error_reply(&ValidationError::LabelTooLong { max: 100 }.into(), 0)
            .starts_with("❌ The service name is too long"));
        assert!(error_reply(&SubscriptionError::Contention { id: 4 }, 4).contains("try again"));
        assert!(error_reply(&SubscriptionError::Dispatch("x".into()), 1).contains("went wrong"));
    }

    #[tokio::test]
    async fn test_finish_add_stores_subscription() {
        let ctx = context(date(2025, 7, 10)).await;
        let reply = finish_add(
            &ctx,
            NewSubscription {
                owner_id: "5".to_string(),
                label: "Music".to_string(),
                amount: 9.99,
                due_date: date(2025, 7, 15),
            },
        )
        .await;

        assert!(reply.contains("**Music**"));
        assert!(reply.contains("**9.99**"));
        assert!(reply.contains("**2025-07-15**"));

        let listed = ctx.service.list("5").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].label, "Music");
    }

    #[tokio::test]
    async fn test_finish_add_rejects_date_that_became_past() {
        // Flow finished yesterday's date after midnight rolled over
        let ctx = context(date(2025, 7, 16)).await;
        let reply = finish_add(
            &ctx,
            NewSubscription {
                owner_id: "5".to_string(),
                label: "Music".to_string(),
                amount: 9.99,
                due_date: date(2025, 7, 15),
            },
        )
        .await;

        assert!(reply.contains("in the past"));
        assert!(ctx.service.list("5").await.unwrap().is_empty());
    }

    #[test]
    fn test_paid_message() {
        let payment = Payment {
            id: 9,
            label: "Music".to_string(),
            previous_due_date: date(2025, 7, 15),
            new_due_date: date(2025, 8, 15),
        };
        assert_eq!(
            paid_message(&payment),
            "✅ Subscription **Music** (ID: 9) marked as paid. Next payment date: **2025-08-15**. Reminders reset."
        );
    }
}
