//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;

use crate::core::Clock;
use crate::features::add_flow::AddFlowSessions;
use crate::features::subscriptions::SubscriptionService;

/// Shared context for all command handlers
///
/// Contains the services the subscription commands need:
/// - SubscriptionService for add/list/paid/delete
/// - AddFlowSessions for the conversational /add flow
/// - Clock for "today" in validation and payment
/// - Bot start time for /ping uptime
#[derive(Clone)]
pub struct CommandContext {
    pub service: SubscriptionService,
    pub flows: AddFlowSessions,
    pub clock: Arc<dyn Clock>,
    pub start_time: Instant,
}

impl CommandContext {
    pub fn new(service: SubscriptionService, flows: AddFlowSessions, clock: Arc<dyn Clock>) -> Self {
        Self {
            service,
            flows,
            clock,
            start_time: Instant::now(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
