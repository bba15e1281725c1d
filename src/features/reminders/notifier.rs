//! Outbound reminder delivery

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serenity::http::Http;
use serenity::model::id::UserId;
use std::sync::Arc;

/// The single message-send primitive reminders go through
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the owner of a subscription
    async fn send(&self, owner_id: &str, text: &str) -> Result<()>;
}

/// Sends reminders as Discord direct messages
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, owner_id: &str, text: &str) -> Result<()> {
        let user_id: u64 = owner_id
            .parse()
            .with_context(|| format!("owner id {owner_id:?} is not a Discord user id"))?;

        let http = self.http.as_ref();
        let dm = UserId(user_id).create_dm_channel(http).await?;
        dm.say(http, text).await?;

        debug!("Delivered reminder DM to user {user_id}");
        Ok(())
    }
}
