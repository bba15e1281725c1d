//! # Feature: Subscriptions
//!
//! Recurring payment records: the data model, the monthly recurrence engine,
//! the record store contract and the operations the chat commands call.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod model;
pub mod recurrence;
pub mod service;
pub mod store;

pub use model::{format_date, parse_date, NewSubscription, Payment, ReminderTier, Subscription};
pub use recurrence::advance_one_month;
pub use service::{parse_amount, parse_due_date, SubscriptionService};
pub use store::SubscriptionStore;
