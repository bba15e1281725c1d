//! Subscription slash commands: /add, /cancel, /list, /paid, /delete

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_command(),
        create_cancel_command(),
        create_list_command(),
        create_id_command("paid", "Mark a subscription as paid and move it to next month"),
        create_id_command("delete", "Delete a subscription from your list"),
    ]
}

fn create_add_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("add")
        .description("Add a new subscription (asks for name, amount and next payment date)")
        .to_owned()
}

fn create_cancel_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("cancel")
        .description("Cancel the subscription you are currently adding")
        .to_owned()
}

fn create_list_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("list")
        .description("Show all your subscriptions with their IDs")
        .to_owned()
}

/// /paid and /delete both take the subscription id shown by /list
fn create_id_command(name: &str, description: &str) -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(name)
        .description(description)
        .create_option(|option| {
            option
                .name("id")
                .description("Subscription ID from /list")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .to_owned()
}
