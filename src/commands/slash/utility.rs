//! Utility slash commands: /help, /ping

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        CreateApplicationCommand::default()
            .name("help")
            .description("Show what the bot can do")
            .to_owned(),
        CreateApplicationCommand::default()
            .name("ping")
            .description("Test bot responsiveness")
            .to_owned(),
    ]
}
