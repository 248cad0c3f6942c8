//! Main bot loop: one message at a time from every channel.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::career::{CommandRouter, SessionManager, prompts};
use crate::channels::{ChannelManager, IncomingMessage, OutgoingResponse, StatusUpdate};
use crate::error::Result;

/// Timing knobs for the loop's background work.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub session_idle_timeout: Duration,
    pub prune_interval: Duration,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            prune_interval: Duration::from_secs(600),        // 10 minutes
        }
    }
}

/// Consumes the merged channel stream and answers each message.
pub struct CareerBot {
    channels: ChannelManager,
    router: CommandRouter,
    sessions: Arc<SessionManager>,
    settings: BotSettings,
}

impl CareerBot {
    pub fn new(
        channels: ChannelManager,
        router: CommandRouter,
        sessions: Arc<SessionManager>,
        settings: BotSettings,
    ) -> Self {
        Self {
            channels,
            router,
            sessions,
            settings,
        }
    }

    /// Run until Ctrl+C or until every channel stream ends.
    pub async fn run(self) -> Result<()> {
        let mut message_stream = self.channels.start_all().await?;

        let sessions = Arc::clone(&self.sessions);
        let idle_timeout = self.settings.session_idle_timeout;
        let prune_interval = self.settings.prune_interval;
        let pruning_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(prune_interval);
            interval.tick().await; // Skip immediate first tick
            loop {
                interval.tick().await;
                sessions.prune_stale_sessions(idle_timeout).await;
            }
        });

        tracing::info!(channels = ?self.channels.names(), "Bot ready and listening");

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("All channel streams ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            self.process(&message).await;
        }

        tracing::info!("Bot shutting down...");
        pruning_handle.abort();
        self.channels.shutdown_all().await;

        Ok(())
    }

    /// Handle one message and send its single reply.
    pub async fn process(&self, message: &IncomingMessage) {
        if let Err(e) = self
            .channels
            .send_status(message, StatusUpdate::Thinking("Analyzing...".into()))
            .await
        {
            tracing::debug!(channel = %message.channel, "Status update failed: {e}");
        }

        let response = match self.router.handle(message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    user_id = %message.user_id,
                    channel = %message.channel,
                    "Error handling message: {e}"
                );
                OutgoingResponse::text(prompts::INTERNAL_ERROR)
            }
        };

        if let Err(e) = self.channels.respond(message, response).await {
            tracing::error!(channel = %message.channel, "Failed to send reply: {e}");
        }
    }
}
