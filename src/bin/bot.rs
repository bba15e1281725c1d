use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use subwatch::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use subwatch::core::{Clock, Config, SystemClock};
use subwatch::database::Database;
use subwatch::features::add_flow::AddFlowSessions;
use subwatch::features::reminders::{DiscordNotifier, ReminderScheduler};
use subwatch::features::subscriptions::SubscriptionService;

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e}");
            if let Err(why) = msg
                .channel_id
                .say(
                    &ctx.http,
                    "Sorry, I encountered an error processing your message.",
                )
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        // Guild commands update instantly, global ones can take up to an hour
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Development mode: Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Production mode: Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self
                .command_handler
                .handle_slash_command(&ctx, &command)
                .await
            {
                error!("Error handling slash command '{}': {}", command.data.name, e);

                let error_message =
                    "❌ Sorry, I encountered an error processing your command. Please try again.";
                // The handler may already have answered; fall back to a followup
                if let Err(response_err) = command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| message.content(error_message))
                    })
                    .await
                {
                    debug!("Interaction already answered ({response_err}), sending followup");
                    if let Err(why) = command
                        .create_followup_message(&ctx.http, |message| {
                            message.content(error_message)
                        })
                        .await
                    {
                        error!("Failed to send error message: {why}");
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting subscription reminder bot...");

    let database = Database::new(&config.database_path).await?;
    let service = SubscriptionService::new(Arc::new(database));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let flows = AddFlowSessions::new(config.add_flow_timeout);

    let command_handler = CommandHandler::new(CommandContext::new(
        service.clone(),
        flows.clone(),
        Arc::clone(&clock),
    ));

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        command_handler: Arc::new(command_handler),
        guild_id,
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    // Start the reminder scheduler
    let notifier = Arc::new(DiscordNotifier::new(client.cache_and_http.http.clone()));
    let scheduler = ReminderScheduler::new(
        service,
        notifier,
        clock,
        config.reminder_interval,
        config.dispatch_timeout,
    );
    tokio::spawn(async move {
        scheduler.run().await;
    });

    // Drop add flows nobody finished
    let sweep_every = config.reminder_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            let purged = flows.purge_expired();
            if purged > 0 {
                debug!("Session sweep removed {purged} add flow(s)");
            }
        }
    });

    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
