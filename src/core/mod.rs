//! # Core Module
//!
//! Configuration, error types, the date source and message formatting shared
//! by every other layer of the bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod clock;
pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
#[cfg(test)]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{Result, SubscriptionError, ValidationError};
pub use response::{format_amount, pack_entries, pack_for_message, MESSAGE_LIMIT};
