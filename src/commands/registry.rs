//! Command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Registry mapping command names to handlers
///
/// Multiple command names can map to the same handler if they share state.
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Build a registry holding every handler in the crate
    pub fn with_all_handlers() -> Self {
        let mut registry = Self::new();
        for handler in super::handlers::create_all_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register a handler for all names returned by `command_names()`
    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::CommandContext;
    use anyhow::Result;
    use async_trait::async_trait;
    use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
    use serenity::prelude::Context;

    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl SlashCommandHandler for MockHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(
            &self,
            _ctx: Arc<CommandContext>,
            _serenity_ctx: &Context,
            _command: &ApplicationCommandInteraction,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.handlers.is_empty());
        assert!(registry.get("help").is_none());
    }

    #[test]
    fn test_registry_register_multiple_names() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["paid", "delete"],
        }));

        assert_eq!(registry.handlers.len(), 2);
        assert!(registry.get("paid").is_some());
        assert!(registry.get("delete").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_with_all_handlers_covers_slash_commands() {
        let registry = CommandRegistry::with_all_handlers();

        for name in ["help", "ping", "add", "cancel", "list", "paid", "delete"] {
            assert!(registry.get(name).is_some(), "No handler for /{name}");
        }
        assert_eq!(
            registry.handlers.len(),
            crate::commands::slash::create_slash_commands().len()
        );
    }

    #[test]
    fn test_registry_default() {
        assert!(CommandRegistry::default().handlers.is_empty());
    }
}
