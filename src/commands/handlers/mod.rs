//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod subscriptions;
pub mod utility;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(subscriptions::SubscriptionHandler),
    ]
}

/// Answer a command with one or more messages
///
/// The first message is the interaction response; the rest go out as
/// followups so long listings stay under the message size limit.
pub async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    messages: Vec<String>,
) -> Result<()> {
    let mut messages = messages.into_iter();
    let first = messages.next().unwrap_or_default();

    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(first))
        })
        .await?;

    for followup in messages {
        command
            .create_followup_message(&serenity_ctx.http, |message| message.content(followup))
            .await?;
    }

    Ok(())
}
