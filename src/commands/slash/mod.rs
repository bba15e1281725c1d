//! # Slash Commands (/)
//!
//! Discord native slash command definitions and registration.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

mod subscriptions;
mod utility;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // Utility commands
    commands.extend(utility::create_commands());

    // Subscription commands
    commands.extend(subscriptions::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_names() -> Vec<String> {
        create_slash_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_create_slash_commands() {
        let names = command_names();
        assert_eq!(names.len(), 7);

        for expected in ["help", "ping", "add", "cancel", "list", "paid", "delete"] {
            assert!(
                names.contains(&expected.to_string()),
                "Missing command: {expected}"
            );
        }
    }

    #[test]
    fn test_id_commands_require_id_option() {
        let commands = create_slash_commands();
        for name in ["paid", "delete"] {
            let command = commands
                .iter()
                .find(|cmd| cmd.0.get("name").unwrap().as_str() == Some(name))
                .unwrap();
            let options = command.0.get("options").unwrap().as_array().unwrap();
            assert_eq!(options.len(), 1);
            assert_eq!(options[0].get("name").unwrap().as_str(), Some("id"));
            assert_eq!(options[0].get("required").unwrap().as_bool(), Some(true));
        }
    }
}
