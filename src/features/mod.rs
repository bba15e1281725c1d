pub mod add_flow;
pub mod reminders;
pub mod subscriptions;

pub use add_flow::{AddFlowSessions, FlowReply, SessionEvent};
pub use reminders::{DiscordNotifier, Notifier, ReminderScheduler, TickReport};
pub use subscriptions::{Subscription, SubscriptionService, SubscriptionStore};
