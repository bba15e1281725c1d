use crate::commands::context::CommandContext;
use crate::commands::handlers::subscriptions::finish_add;
use crate::commands::registry::CommandRegistry;
use crate::features::add_flow::{FlowReply, SessionEvent};
use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

pub const FLOW_EXPIRED: &str = "⌛ Your /add session timed out. Use /add to start again.";

/// Entry point for gateway events: slash commands and plain messages
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        CommandHandler {
            context: Arc::new(context),
            registry: CommandRegistry::with_all_handlers(),
        }
    }

    /// Plain messages only matter while an /add flow is running in the channel
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let owner_id = msg.author.id.to_string();
        let channel_id = msg.channel_id.to_string();

        if let Some(reply) = self
            .process_flow_input(&owner_id, &channel_id, &msg.content)
            .await
        {
            msg.channel_id.say(&ctx.http, reply).await?;
        }
        Ok(())
    }

    /// Advance the add flow of `owner_id` in `channel_id`; None when no flow is running
    pub async fn process_flow_input(
        &self,
        owner_id: &str,
        channel_id: &str,
        content: &str,
    ) -> Option<String> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let today = self.context.today();
        match self
            .context
            .flows
            .handle_input(owner_id, channel_id, content, today)
        {
            SessionEvent::Idle => None,
            SessionEvent::Expired => Some(FLOW_EXPIRED.to_string()),
            SessionEvent::Reply(FlowReply::Prompt(prompt)) => {
                debug!("Add flow step for {owner_id} in channel {channel_id}");
                Some(prompt)
            }
            SessionEvent::Reply(FlowReply::Complete(new)) => {
                Some(finish_add(&self.context, new).await)
            }
        }
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let user_id = command.user.id.to_string();
        let channel_id = command.channel_id.to_string();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            request_id, command.data.name, user_id, channel_id, guild_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{}] ❓ No handler for command: {}", request_id, command.data.name);
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content("Unknown command. Use /help to see what I can do.")
                        })
                })
                .await?;
            return Ok(());
        };

        match handler.handle(Arc::clone(&self.context), ctx, command).await {
            Ok(()) => {
                info!("[{}] ✅ /{} completed", request_id, command.data.name);
                Ok(())
            }
            Err(e) => {
                error!("[{}] ❌ /{} failed: {e:#}", request_id, command.data.name);
                Err(e)
            }
        }
    }
}
