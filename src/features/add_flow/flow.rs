//! The /add conversation as an explicit state machine
//!
//! `AwaitingLabel → AwaitingAmount → AwaitingDate → complete`. Invalid input
//! keeps the current step and re-prompts; cancel and timeout are handled by
//! the session store that owns the flow.

use chrono::NaiveDate;
use std::time::{Duration, Instant};

use crate::core::error::ValidationError;
use crate::features::subscriptions::service::{
    parse_amount, parse_due_date, validate_due_date, validate_label,
};
use crate::features::subscriptions::NewSubscription;

pub const LABEL_PROMPT: &str = "Great! Let's add a new subscription. Enter the service name:";
pub const DATE_PROMPT: &str =
    "Got it. Now enter the next payment date as YYYY-MM-DD (e.g. `2025-07-15`):";

#[derive(Debug, Clone, PartialEq)]
pub enum AddStep {
    AwaitingLabel,
    AwaitingAmount { label: String },
    AwaitingDate { label: String, amount: f64 },
}

/// What the bot answers after one message of the conversation
#[derive(Debug, Clone, PartialEq)]
pub enum FlowReply {
    /// Ask for the next field, or ask again after bad input
    Prompt(String),
    /// Every field collected and valid
    Complete(NewSubscription),
}

#[derive(Debug, Clone)]
pub struct AddFlow {
    owner_id: String,
    step: AddStep,
    last_activity: Instant,
}

impl AddFlow {
    pub fn start(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            step: AddStep::AwaitingLabel,
            last_activity: Instant::now(),
        }
    }

    pub fn step(&self) -> &AddStep {
        &self.step
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    /// Feed one user message into the flow
    pub fn advance(&mut self, input: &str, today: NaiveDate) -> FlowReply {
        self.last_activity = Instant::now();

        match &self.step {
            AddStep::AwaitingLabel => match validate_label(input) {
                Ok(label) => {
                    let prompt = format!(
                        "OK, \"{label}\". Now enter the payment amount (e.g. `9.99`):"
                    );
                    self.step = AddStep::AwaitingAmount { label };
                    FlowReply::Prompt(prompt)
                }
                Err(e) => retry(e),
            },
            AddStep::AwaitingAmount { label } => match parse_amount(input) {
                Ok(amount) => {
                    self.step = AddStep::AwaitingDate {
                        label: label.clone(),
                        amount,
                    };
                    FlowReply::Prompt(DATE_PROMPT.to_string())
                }
                Err(e) => retry(e),
            },
            AddStep::AwaitingDate { label, amount } => {
                match parse_due_date(input).and_then(|date| validate_due_date(date, today)) {
                    Ok(due_date) => FlowReply::Complete(NewSubscription {
                        owner_id: self.owner_id.clone(),
                        label: label.clone(),
                        amount: *amount,
                        due_date,
                    }),
                    Err(e) => retry(e),
                }
            }
        }
    }
}

fn retry(error: ValidationError) -> FlowReply {
    FlowReply::Prompt(format!("❌ {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
    }

    #[test]
    fn test_happy_path() {
        let mut flow = AddFlow::start("5");
        assert_eq!(flow.step(), &AddStep::AwaitingLabel);

        let reply = flow.advance("Music", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("\"Music\"")));
        assert_eq!(
            flow.step(),
            &AddStep::AwaitingAmount {
                label: "Music".to_string()
            }
        );

        assert_eq!(
            flow.advance("9,99", today()),
            FlowReply::Prompt(DATE_PROMPT.to_string())
        );

        let reply = flow.advance("2025-07-15", today());
        assert_eq!(
            reply,
            FlowReply::Complete(NewSubscription {
                owner_id: "5".to_string(),
                label: "Music".to_string(),
                amount: 9.99,
                due_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            })
        );
    }

    #[test]
    fn test_bad_amount_stays_on_step() {
        let mut flow = AddFlow::start("5");
        flow.advance("Music", today());

        let reply = flow.advance("nine", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("doesn't look like a number")));
        assert!(matches!(flow.step(), AddStep::AwaitingAmount { .. }));

        let reply = flow.advance("-3", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("negative")));
        assert!(matches!(flow.step(), AddStep::AwaitingAmount { .. }));
    }

    #[test]
    fn test_bad_or_past_date_stays_on_step() {
        let mut flow = AddFlow::start("5");
        flow.advance("Music", today());
        flow.advance("9.99", today());

        let reply = flow.advance("15/07/2025", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("YYYY-MM-DD")));

        let reply = flow.advance("2025-07-09", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("in the past")));
        assert!(matches!(flow.step(), AddStep::AwaitingDate { .. }));

        assert!(matches!(
            flow.advance("2025-07-10", today()),
            FlowReply::Complete(_)
        ));
    }

    #[test]
    fn test_blank_label_rejected() {
        let mut flow = AddFlow::start("5");
        let reply = flow.advance("   ", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("can't be empty")));
        assert_eq!(flow.step(), &AddStep::AwaitingLabel);
    }

    #[test]
    fn test_oversized_label_rejected() {
        let mut flow = AddFlow::start("5");
        let reply = flow.advance(&"x".repeat(1950), today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("too long")));
        assert_eq!(flow.step(), &AddStep::AwaitingLabel);

        let reply = flow.advance("Music", today());
        assert!(matches!(reply, FlowReply::Prompt(ref p) if p.contains("\"Music\"")));
    }

    #[test]
    fn test_expiry() {
        let flow = AddFlow::start("5");
        assert!(!flow.is_expired(Duration::from_secs(600)));
        std::thread::sleep(Duration::from_millis(5));
        assert!(flow.is_expired(Duration::from_millis(1)));
    }
}
