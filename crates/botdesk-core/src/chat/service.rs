//! Chat service driving one streamed turn at a time.
//!
//! `ChatService` validates the input, sends it with the conversation's
//! session id, folds every streamed chunk into the [`Conversation`], and on
//! success signals the [`SessionFeed`] so session lists pick up the new or
//! updated session. A failed turn is rolled back.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use botdesk_types::chat::{ChatChunk, ChatRequest, Transcript};
use botdesk_types::chatbot::ChatbotId;
use botdesk_types::error::ApiError;

use crate::api::PlatformApi;
use crate::chat::conversation::{Conversation, validate_input};
use crate::chat::session_feed::{SessionFeed, SessionSnapshot};

/// Summary of a completed turn, used for the stats footer.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub session_id: Option<String>,
    pub chunks: usize,
    pub elapsed: Duration,
}

pub struct ChatService<A: PlatformApi> {
    api: Arc<A>,
    feed: SessionFeed,
}

impl<A: PlatformApi> ChatService<A> {
    pub fn new(api: Arc<A>, feed: SessionFeed) -> Self {
        Self { api, feed }
    }

    pub fn feed(&self) -> &SessionFeed {
        &self.feed
    }

    /// Send `text` in the conversation and stream the reply.
    ///
    /// `on_chunk` sees each chunk after it has been applied, so a renderer
    /// can print deltas as they arrive. Blank input fails before any request
    /// is made. Any failure after the user message was pushed rolls the
    /// conversation back to where it was.
    pub async fn send<F>(
        &self,
        conversation: &mut Conversation,
        text: &str,
        mut on_chunk: F,
    ) -> Result<TurnOutcome, ApiError>
    where
        F: FnMut(&ChatChunk),
    {
        let message = validate_input(text)?.to_string();
        let chatbot_id = conversation
            .chatbot_id()
            .ok_or_else(|| ApiError::Validation("No chatbot selected".to_string()))?;

        let started = Instant::now();
        conversation.push_user(message.clone());
        let request = ChatRequest {
            message,
            session_id: conversation.session_id().map(String::from),
        };
        debug!(%chatbot_id, session_id = ?request.session_id, "sending chat message");

        let mut stream = match self.api.send_chat(chatbot_id, request).await {
            Ok(stream) => stream,
            Err(e) => {
                conversation.rollback_failed_turn();
                return Err(e);
            }
        };

        let mut chunks = 0;
        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => {
                    chunks += 1;
                    conversation.apply_chunk(&chunk);
                    on_chunk(&chunk);
                }
                Err(e) => {
                    warn!(%chatbot_id, error = %e, "chat stream failed");
                    conversation.rollback_failed_turn();
                    return Err(e);
                }
            }
        }
        conversation.commit_turn();

        let outcome = TurnOutcome {
            reply: conversation.last_reply().unwrap_or_default().to_string(),
            session_id: conversation.session_id().map(String::from),
            chunks,
            elapsed: started.elapsed(),
        };
        info!(
            %chatbot_id,
            session_id = ?outcome.session_id,
            chunks,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "chat turn complete"
        );

        // Logged inside; the turn itself succeeded.
        let _ = self.feed.refresh(self.api.as_ref()).await;

        Ok(outcome)
    }

    /// Re-fetch the session list through the feed and return the new
    /// snapshot.
    pub async fn refresh_sessions(&self) -> Result<SessionSnapshot, ApiError> {
        self.feed.refresh(self.api.as_ref()).await?;
        Ok(self.feed.snapshot())
    }

    /// Messages of a stored session, oldest first.
    pub async fn transcript(
        &self,
        chatbot_id: ChatbotId,
        session_id: &str,
    ) -> Result<Transcript, ApiError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ApiError::Validation("Session id cannot be empty".to_string()));
        }
        let mut transcript = self.api.get_transcript(chatbot_id, session_id).await?;
        transcript.messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(transcript)
    }

    /// Load a stored session into the conversation, selecting its chatbot.
    ///
    /// Returns the number of messages loaded.
    pub async fn open_session(
        &self,
        conversation: &mut Conversation,
        chatbot_id: ChatbotId,
        session_id: &str,
    ) -> Result<usize, ApiError> {
        let session_id = session_id.trim();
        let transcript = self.transcript(chatbot_id, session_id).await?;
        conversation.switch_chatbot(chatbot_id);
        conversation.load_transcript(session_id, &transcript.messages);
        debug!(%chatbot_id, session_id, messages = transcript.messages.len(), "session opened");
        Ok(transcript.messages.len())
    }
}
