// Core layer - shared types, configuration and errors
pub mod core;

// Features layer - subscriptions, reminders, add flow
pub mod features;

// Infrastructure
pub mod database;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::{Config, SubscriptionError, ValidationError};
pub use database::Database;
pub use features::{
    AddFlowSessions, DiscordNotifier, Notifier, ReminderScheduler, Subscription,
    SubscriptionService, SubscriptionStore,
};
