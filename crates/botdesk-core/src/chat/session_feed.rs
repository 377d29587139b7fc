//! Shared, refreshable view of the user's chat sessions.
//!
//! Built on `tokio::sync::watch`: whoever completes a chat turn calls
//! [`SessionFeed::refresh`], and every subscriber (the session list in the
//! chat loop, `/sessions`) observes the new snapshot. Cloning the feed
//! shares the same channel.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use botdesk_types::chat::SessionSummary;
use botdesk_types::chatbot::ChatbotId;
use botdesk_types::error::ApiError;

use crate::api::PlatformApi;

/// The latest known session list.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Bumped on every successful refresh.
    pub generation: u64,
    /// False until the first fetch succeeds.
    pub loaded: bool,
    pub sessions: Arc<Vec<SessionSummary>>,
}

impl SessionSnapshot {
    /// Sessions belonging to one chatbot, in feed order.
    pub fn for_chatbot(&self, id: ChatbotId) -> Vec<&SessionSummary> {
        self.sessions.iter().filter(|s| s.chatbot_id == id).collect()
    }

    pub fn find(&self, session_id: &str) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

#[derive(Clone)]
pub struct SessionFeed {
    sender: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionFeed {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionSnapshot::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Observe future snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    /// Re-fetch the session list and publish it.
    ///
    /// On failure the error is logged, the previous list stays in place,
    /// and the error is returned for callers that want to surface it.
    pub async fn refresh<A: PlatformApi>(&self, api: &A) -> Result<u64, ApiError> {
        match api.list_sessions().await {
            Ok(list) => {
                let sessions = Arc::new(list.sessions);
                let mut generation = 0;
                self.sender.send_modify(|snap| {
                    snap.generation += 1;
                    snap.loaded = true;
                    snap.sessions = sessions;
                    generation = snap.generation;
                });
                debug!(generation, "session feed refreshed");
                Ok(generation)
            }
            Err(e) => {
                warn!(error = %e, "failed to refresh sessions");
                Err(e)
            }
        }
    }
}

impl Default for SessionFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.sender.borrow();
        f.debug_struct("SessionFeed")
            .field("generation", &snap.generation)
            .field("sessions", &snap.sessions.len())
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, session};

    #[tokio::test]
    async fn refresh_publishes_to_subscribers() {
        let api = FakeApi::new();
        api.set_sessions(vec![session("s-1", 1), session("s-2", 2)]);

        let feed = SessionFeed::new();
        let mut rx = feed.subscribe();
        assert!(!rx.borrow().loaded);

        let generation = feed.refresh(&api).await.unwrap();
        assert_eq!(generation, 1);

        rx.changed().await.unwrap();
        let snap = rx.borrow_and_update().clone();
        assert!(snap.loaded);
        assert_eq!(snap.sessions.len(), 2);
        assert_eq!(snap.for_chatbot(ChatbotId(2)).len(), 1);
        assert!(snap.find("s-1").is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_list() {
        let api = FakeApi::new();
        api.set_sessions(vec![session("s-1", 1)]);
        let feed = SessionFeed::new();
        feed.refresh(&api).await.unwrap();

        api.fail_next_list_sessions();
        assert!(feed.refresh(&api).await.is_err());

        let snap = feed.snapshot();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.sessions.len(), 1);
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let api = FakeApi::new();
        let feed = SessionFeed::new();
        let other = feed.clone();
        feed.refresh(&api).await.unwrap();
        assert_eq!(other.snapshot().generation, 1);
    }
}
