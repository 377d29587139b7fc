//! The chat window's state.
//!
//! `Conversation` holds the selected chatbot, the active session id, and the
//! visible message list. Streamed deltas are merged into the last message
//! when the role matches, so a response arriving as many chunks renders as a
//! single assistant message.

use botdesk_types::chat::{ChatChunk, ChatMessage, HistoryEntry, MessageRole};
use botdesk_types::chatbot::ChatbotId;
use botdesk_types::error::ApiError;

/// Reject empty or whitespace-only input before anything is sent.
///
/// Returns the trimmed message on success.
pub fn validate_input(text: &str) -> Result<&str, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("Message cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// State captured when a turn starts, used to undo it if the send fails.
#[derive(Debug, Clone)]
struct TurnMark {
    message_len: usize,
    session_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    chatbot_id: Option<ChatbotId>,
    session_id: Option<String>,
    messages: Vec<ChatMessage>,
    turn: Option<TurnMark>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation with `id` already selected.
    pub fn for_chatbot(id: ChatbotId) -> Self {
        Self {
            chatbot_id: Some(id),
            ..Self::default()
        }
    }

    pub fn chatbot_id(&self) -> Option<ChatbotId> {
        self.chatbot_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Content of the last assistant message, if the conversation ends with one.
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
    }

    /// Append the user's message and mark the start of a turn.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turn = Some(TurnMark {
            message_len: self.messages.len(),
            session_id: self.session_id.clone(),
        });
        self.messages.push(ChatMessage::new(MessageRole::User, text));
    }

    /// Concatenate `delta` onto the last message if it has the same role,
    /// otherwise start a new message.
    pub fn append_delta(&mut self, role: MessageRole, delta: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == role => last.content.push_str(delta),
            _ => self.messages.push(ChatMessage::new(role, delta)),
        }
    }

    /// Fold one streamed chunk into the conversation.
    ///
    /// The first chunk of a new conversation carries the session id the
    /// platform assigned; later requests reuse it.
    pub fn apply_chunk(&mut self, chunk: &ChatChunk) {
        if !chunk.content.is_empty() {
            self.append_delta(MessageRole::Assistant, &chunk.content);
        }
        if let Some(sid) = chunk.session_id.as_deref().filter(|s| !s.is_empty()) {
            if self.session_id.as_deref() != Some(sid) {
                self.session_id = Some(sid.to_string());
            }
        }
    }

    /// Select a chatbot. Selecting a different one clears the message list
    /// and the session; reselecting the current one keeps both.
    ///
    /// Returns whether the conversation was cleared.
    pub fn switch_chatbot(&mut self, id: ChatbotId) -> bool {
        if self.chatbot_id == Some(id) {
            return false;
        }
        self.chatbot_id = Some(id);
        self.start_new_session();
        true
    }

    /// Replace the visible messages with a stored session.
    pub fn load_transcript(&mut self, session_id: impl Into<String>, entries: &[HistoryEntry]) {
        let mut ordered: Vec<&HistoryEntry> = entries.iter().collect();
        ordered.sort_by_key(|e| e.created_at);
        self.messages = ordered.into_iter().map(ChatMessage::from).collect();
        self.session_id = Some(session_id.into());
        self.turn = None;
    }

    /// Forget the session and messages; the chatbot stays selected.
    pub fn start_new_session(&mut self) {
        self.messages.clear();
        self.session_id = None;
        self.turn = None;
    }

    /// The turn completed; it can no longer be rolled back.
    pub fn commit_turn(&mut self) {
        self.turn = None;
    }

    /// Undo the turn started by the last `push_user`: drops the user
    /// message and any partial reply and restores the prior session id.
    ///
    /// Returns false if there was no turn in progress.
    pub fn rollback_failed_turn(&mut self) -> bool {
        match self.turn.take() {
            Some(mark) => {
                self.messages.truncate(mark.message_len);
                self.session_id = mark.session_id;
                true
            }
            None => false,
        }
    }
}
