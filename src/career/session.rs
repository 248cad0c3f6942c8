//! In-memory session table, one `SessionState` per user id.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use super::state::{DialogueEvent, DialoguePhase, SessionState, Transition};

/// Holds the transient dialogue state of every user mid-conversation.
///
/// A user with no entry is Idle. Entries are dropped as soon as they return
/// to Idle, so the map only contains open dialogues.
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase for a user.
    pub async fn phase(&self, user_id: &str) -> DialoguePhase {
        self.sessions
            .read()
            .await
            .get(user_id)
            .map(|s| s.phase)
            .unwrap_or_default()
    }

    /// Run the state machine for one event under the write lock.
    pub async fn apply(&self, user_id: &str, event: DialogueEvent) -> Transition {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id.to_string()).or_default();
        let from = session.phase;
        let transition = session.apply(event);
        let to = session.phase;

        tracing::debug!(user_id, %from, %to, "Dialogue transition");

        if !to.is_awaiting() {
            sessions.remove(user_id);
        }
        transition
    }

    /// Number of open dialogues.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop dialogues with no activity for longer than `idle_timeout`.
    pub async fn prune_stale_sessions(&self, idle_timeout: Duration) -> usize {
        let cutoff = match chrono::Duration::from_std(idle_timeout) {
            Ok(d) => Utc::now() - d,
            Err(_) => return 0,
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_activity >= cutoff);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!(pruned, "Pruned stale dialogue sessions");
        }
        pruned
    }
}
