//! Periodic reminder driver
//!
//! One pass per interval: collect every owed reminder, deliver each one in
//! its own task with a bounded timeout, and only then advance the record's
//! status. A failed delivery leaves the status untouched so the next pass
//! retries it; a failed status write after a successful delivery may cause
//! one duplicate DM, never a lost one.

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{timeout, MissedTickBehavior};
use uuid::Uuid;

use super::notifier::Notifier;
use super::state_machine::ReminderNotice;
use crate::core::clock::Clock;
use crate::core::error::SubscriptionError;
use crate::features::subscriptions::{SubscriptionService, SubscriptionStore};

/// What happened to one reminder during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryOutcome {
    /// Delivered and status advanced
    Sent,
    /// Delivered, but the record was paid or deleted before the status write
    Superseded,
    /// Delivered, but the status write failed; may be sent again next pass
    Unrecorded,
    /// Not delivered; status untouched
    Failed,
}

/// Counters for one pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub sent: usize,
    pub superseded: usize,
    pub unrecorded: usize,
    pub failed: usize,
}

impl TickReport {
    fn record(&mut self, outcome: DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Sent => self.sent += 1,
            DeliveryOutcome::Superseded => self.superseded += 1,
            DeliveryOutcome::Unrecorded => self.unrecorded += 1,
            DeliveryOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.sent + self.superseded + self.unrecorded + self.failed
    }
}

pub struct ReminderScheduler {
    service: SubscriptionService,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    dispatch_timeout: Duration,
}

impl ReminderScheduler {
    pub fn new(
        service: SubscriptionService,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        dispatch_timeout: Duration,
    ) -> Self {
        Self {
            service,
            notifier,
            clock,
            interval,
            dispatch_timeout,
        }
    }

    /// Run passes forever, one per interval
    pub async fn run(self) {
        info!(
            "⏰ Reminder scheduler started (every {}s, dispatch timeout {}s)",
            self.interval.as_secs(),
            self.dispatch_timeout.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    /// Evaluate and dispatch every reminder owed today
    pub async fn run_once(&self) -> TickReport {
        let tick_id = Uuid::new_v4();
        let today = self.clock.today();
        debug!("[{tick_id}] Checking subscriptions for reminders on {today}");

        let notices = self.service.evaluate_tick(today).await;
        let mut report = TickReport::default();
        if notices.is_empty() {
            debug!("[{tick_id}] Nothing to send");
            return report;
        }

        let mut deliveries = JoinSet::new();
        for notice in notices {
            let store = Arc::clone(self.service.store());
            let notifier = Arc::clone(&self.notifier);
            let dispatch_timeout = self.dispatch_timeout;
            deliveries.spawn(async move {
                deliver(tick_id, store, notifier, dispatch_timeout, notice).await
            });
        }

        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    error!("[{tick_id}] Reminder task aborted: {e}");
                    report.record(DeliveryOutcome::Failed);
                }
            }
        }

        info!(
            "[{tick_id}] Reminder pass for {today}: {} reminder(s), {} sent, {} superseded, {} unrecorded, {} failed",
            report.total(),
            report.sent,
            report.superseded,
            report.unrecorded,
            report.failed
        );
        report
    }
}

async fn deliver(
    tick_id: Uuid,
    store: Arc<dyn SubscriptionStore>,
    notifier: Arc<dyn Notifier>,
    dispatch_timeout: Duration,
    notice: ReminderNotice,
) -> DeliveryOutcome {
    let subscription = &notice.subscription;
    let reminder = notice.reminder;

    let sent = match timeout(
        dispatch_timeout,
        notifier.send(&subscription.owner_id, &notice.message),
    )
    .await
    {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(SubscriptionError::Dispatch(e.to_string())),
        Err(_) => Err(SubscriptionError::Dispatch(format!(
            "timed out after {}ms",
            dispatch_timeout.as_millis()
        ))),
    };

    if let Err(e) = sent {
        warn!(
            "[{tick_id}] {reminder} reminder for subscription {} (owner {}) not sent, retrying next pass: {e}",
            subscription.id, subscription.owner_id
        );
        return DeliveryOutcome::Failed;
    }

    match store
        .conditional_update_status(subscription.id, subscription.due_date, reminder.target_tier())
        .await
    {
        Ok(true) => {
            info!(
                "[{tick_id}] {reminder} reminder sent for subscription {} (owner {})",
                subscription.id, subscription.owner_id
            );
            DeliveryOutcome::Sent
        }
        Ok(false) => {
            info!(
                "[{tick_id}] {reminder} reminder sent for subscription {}, but it was paid or removed meanwhile",
                subscription.id
            );
            DeliveryOutcome::Superseded
        }
        Err(e) => {
            error!(
                "[{tick_id}] {reminder} reminder sent for subscription {} but its status was not saved, it may be repeated: {e}",
                subscription.id
            );
            DeliveryOutcome::Unrecorded
        }
    }
}
