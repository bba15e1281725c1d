//! In-progress /add conversations, one per (owner, channel) pair

use chrono::NaiveDate;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use super::flow::{AddFlow, FlowReply, LABEL_PROMPT};

/// Composite key: (owner_id, channel_id)
/// The same user can run separate flows in a DM and in a guild channel.
type SessionKey = (String, String);

/// Result of routing a plain message to the session store
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// No flow is running for this owner in this channel
    Idle,
    /// A flow existed but sat idle past the timeout; it has been dropped
    Expired,
    Reply(FlowReply),
}

#[derive(Clone)]
pub struct AddFlowSessions {
    flows: Arc<DashMap<SessionKey, AddFlow>>,
    timeout: Duration,
}

impl AddFlowSessions {
    pub fn new(timeout: Duration) -> Self {
        AddFlowSessions {
            flows: Arc::new(DashMap::new()),
            timeout,
        }
    }

    fn make_key(owner_id: &str, channel_id: &str) -> SessionKey {
        (owner_id.to_string(), channel_id.to_string())
    }

    /// Begin a flow, replacing any flow already running in this channel
    pub fn start(&self, owner_id: &str, channel_id: &str) -> &'static str {
        let key = Self::make_key(owner_id, channel_id);
        if self.flows.insert(key, AddFlow::start(owner_id)).is_some() {
            debug!("Restarted add flow for {owner_id} in channel {channel_id}");
        }
        LABEL_PROMPT
    }

    /// Abort a running flow; false when there was nothing to cancel
    pub fn cancel(&self, owner_id: &str, channel_id: &str) -> bool {
        let key = Self::make_key(owner_id, channel_id);
        self.flows.remove(&key).is_some()
    }

    /// Feed a plain message into the owner's flow, if one is running
    pub fn handle_input(
        &self,
        owner_id: &str,
        channel_id: &str,
        input: &str,
        today: NaiveDate,
    ) -> SessionEvent {
        let key = Self::make_key(owner_id, channel_id);

        let reply = {
            let Some(mut flow) = self.flows.get_mut(&key) else {
                return SessionEvent::Idle;
            };
            if flow.is_expired(self.timeout) {
                None
            } else {
                Some(flow.advance(input, today))
            }
        };

        match reply {
            None => {
                self.flows.remove(&key);
                info!("Add flow for {owner_id} in channel {channel_id} timed out");
                SessionEvent::Expired
            }
            Some(reply @ FlowReply::Complete(_)) => {
                self.flows.remove(&key);
                SessionEvent::Reply(reply)
            }
            Some(reply) => SessionEvent::Reply(reply),
        }
    }

    /// Drop every flow idle past the timeout, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.flows.len();
        self.flows.retain(|_, flow| !flow.is_expired(self.timeout));
        let purged = before.saturating_sub(self.flows.len());
        if purged > 0 {
            debug!("Purged {purged} expired add flow(s)");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscriptions::NewSubscription;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
    }

    #[test]
    fn test_full_conversation() {
        let sessions = AddFlowSessions::new(Duration::from_secs(600));
        assert_eq!(sessions.start("5", "c1"), LABEL_PROMPT);
        assert_eq!(sessions.flows.len(), 1);

        sessions.handle_input("5", "c1", "Cloud", today());
        sessions.handle_input("5", "c1", "4.50", today());
        let event = sessions.handle_input("5", "c1", "2025-08-01", today());

        assert_eq!(
            event,
            SessionEvent::Reply(FlowReply::Complete(NewSubscription {
                owner_id: "5".to_string(),
                label: "Cloud".to_string(),
                amount: 4.5,
                due_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            }))
        );
        assert!(sessions.flows.is_empty());
    }

    #[test]
    fn test_no_session_is_idle() {
        let sessions = AddFlowSessions::new(Duration::from_secs(600));
        assert_eq!(
            sessions.handle_input("5", "c1", "hello", today()),
            SessionEvent::Idle
        );
    }

    #[test]
    fn test_sessions_are_isolated() {
        let sessions = AddFlowSessions::new(Duration::from_secs(600));
        sessions.start("5", "c1");
        sessions.start("6", "c1");
        sessions.start("5", "c2");

        sessions.handle_input("5", "c1", "Music", today());
        assert_eq!(
            sessions.handle_input("6", "c9", "Music", today()),
            SessionEvent::Idle
        );
        assert_eq!(sessions.flows.len(), 3);

        // Owner 6 is still on the label step
        let event = sessions.handle_input("6", "c1", "Video", today());
        assert!(matches!(event, SessionEvent::Reply(FlowReply::Prompt(ref p)) if p.contains("\"Video\"")));
    }

    #[test]
    fn test_cancel() {
        let sessions = AddFlowSessions::new(Duration::from_secs(600));
        assert!(!sessions.cancel("5", "c1"));

        sessions.start("5", "c1");
        sessions.handle_input("5", "c1", "Music", today());
        assert!(sessions.cancel("5", "c1"));
        assert_eq!(
            sessions.handle_input("5", "c1", "9.99", today()),
            SessionEvent::Idle
        );
    }

    #[test]
    fn test_timeout_expires_flow() {
        let sessions = AddFlowSessions::new(Duration::from_millis(1));
        sessions.start("5", "c1");
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(
            sessions.handle_input("5", "c1", "Music", today()),
            SessionEvent::Expired
        );
        assert!(sessions.flows.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let sessions = AddFlowSessions::new(Duration::from_millis(1));
        sessions.start("5", "c1");
        sessions.start("6", "c1");
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(sessions.purge_expired(), 2);
        assert_eq!(sessions.purge_expired(), 0);
    }
}
