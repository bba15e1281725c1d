//! # Feature: Payment Reminders
//!
//! Escalating DM reminders as a subscription's due date approaches and
//! passes: 3 days ahead, 1 day ahead, and once when overdue.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod notifier;
pub mod scheduler;
pub mod state_machine;

pub use notifier::{DiscordNotifier, Notifier};
pub use scheduler::{ReminderScheduler, TickReport};
pub use state_machine::{
    evaluate_tick, reminder_owed, select_due_soon, select_due_tomorrow, select_overdue, Reminder,
    ReminderNotice,
};
