//! In-memory `PlatformApi` for service tests.
//!
//! Records every call by name so tests can assert exactly which requests a
//! service issued, and replays scripted chat streams.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use futures_util::stream;

use botdesk_types::access_key::{AccessKey, CreateAccessKeyRequest};
use botdesk_types::auth::{AuthToken, LoginRequest};
use botdesk_types::chat::{ChatChunk, ChatRequest, HistoryEntry, SessionList, SessionSummary, Transcript};
use botdesk_types::chatbot::{Chatbot, ChatbotId};
use botdesk_types::error::ApiError;
use botdesk_types::knowledge::IngestReceipt;

use crate::api::{ChatStream, PlatformApi};

/// What the next `send_chat` call does.
pub(crate) enum ChatScript {
    /// Headers arrive; the stream yields these items.
    Stream(Vec<Result<ChatChunk, ApiError>>),
    /// The request itself fails.
    Reject(ApiError),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<String>,
    chatbots: Vec<Chatbot>,
    next_id: i64,
    sessions: Vec<SessionSummary>,
    transcripts: HashMap<String, Vec<HistoryEntry>>,
    chat_scripts: VecDeque<ChatScript>,
    chat_requests: Vec<(ChatbotId, ChatRequest)>,
    fail_list_sessions: bool,
}

pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

pub(crate) fn chatbot(id: i64, name: &str) -> Chatbot {
    Chatbot {
        id: ChatbotId(id),
        name: name.to_string(),
        user_id: 7,
        index_id: None,
        status: None,
    }
}

pub(crate) fn session(id: &str, chatbot_id: i64) -> SessionSummary {
    SessionSummary {
        id: id.to_string(),
        chatbot_id: ChatbotId(chatbot_id),
        chatbot_name: format!("bot-{chatbot_id}"),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        updated_at: None,
        first_message: Some("hello".to_string()),
    }
}

pub(crate) fn chunk(content: &str, session_id: Option<&str>) -> ChatChunk {
    ChatChunk {
        content: content.to_string(),
        session_id: session_id.map(String::from),
    }
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1,
                ..FakeState::default()
            }),
        }
    }

    pub(crate) fn with_chatbots(chatbots: Vec<Chatbot>) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().unwrap();
            state.next_id = chatbots.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
            state.chatbots = chatbots;
        }
        api
    }

    /// Names of the calls made so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn call_count(&self, name: &str) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| *c == name).count()
    }

    pub(crate) fn set_sessions(&self, sessions: Vec<SessionSummary>) {
        self.state.lock().unwrap().sessions = sessions;
    }

    pub(crate) fn set_transcript(&self, session_id: &str, entries: Vec<HistoryEntry>) {
        self.state
            .lock()
            .unwrap()
            .transcripts
            .insert(session_id.to_string(), entries);
    }

    pub(crate) fn fail_next_list_sessions(&self) {
        self.state.lock().unwrap().fail_list_sessions = true;
    }

    pub(crate) fn script_chat(&self, script: ChatScript) {
        self.state.lock().unwrap().chat_scripts.push_back(script);
    }

    pub(crate) fn chat_requests(&self) -> Vec<(ChatbotId, ChatRequest)> {
        self.state.lock().unwrap().chat_requests.clone()
    }

    fn record(&self, name: &str) {
        self.state.lock().unwrap().calls.push(name.to_string());
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: 404,
            detail: Some("Chatbot not found".to_string()),
        }
    }
}

fn receipt(kind: &str) -> IngestReceipt {
    IngestReceipt(serde_json::json!({ "message": format!("{kind} processed"), "processed": 1 }))
}

impl PlatformApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError> {
        self.record("login");
        if request.password != "correct-horse" {
            return Err(ApiError::Server {
                status: 400,
                detail: Some("Incorrect email or password".to_string()),
            });
        }
        Ok(AuthToken {
            access_token: "token-abc123".to_string(),
            token_type: "bearer".to_string(),
            user_id: 7,
        })
    }

    async fn create_chatbot(&self, name: &str) -> Result<Chatbot, ApiError> {
        self.record("create_chatbot");
        let mut state = self.state.lock().unwrap();
        let bot = chatbot(state.next_id, name);
        state.next_id += 1;
        state.chatbots.push(bot.clone());
        Ok(bot)
    }

    async fn list_chatbots(&self) -> Result<Vec<Chatbot>, ApiError> {
        self.record("list_chatbots");
        Ok(self.state.lock().unwrap().chatbots.clone())
    }

    async fn get_chatbot(&self, id: ChatbotId) -> Result<Chatbot, ApiError> {
        self.record("get_chatbot");
        let state = self.state.lock().unwrap();
        state
            .chatbots
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn rename_chatbot(&self, id: ChatbotId, name: &str) -> Result<Chatbot, ApiError> {
        self.record("rename_chatbot");
        let mut state = self.state.lock().unwrap();
        let bot = state
            .chatbots
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(Self::not_found)?;
        bot.name = name.to_string();
        Ok(bot.clone())
    }

    async fn delete_chatbot(&self, id: ChatbotId) -> Result<(), ApiError> {
        self.record("delete_chatbot");
        let mut state = self.state.lock().unwrap();
        let before = state.chatbots.len();
        state.chatbots.retain(|c| c.id != id);
        if state.chatbots.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn upload_document(&self, _id: ChatbotId, _path: &Path) -> Result<IngestReceipt, ApiError> {
        self.record("upload_document");
        Ok(receipt("document"))
    }

    async fn scrape_url(&self, _id: ChatbotId, _url: &str) -> Result<IngestReceipt, ApiError> {
        self.record("scrape_url");
        Ok(receipt("url"))
    }

    async fn process_sitemap(
        &self,
        _id: ChatbotId,
        _sitemap_url: &str,
        _limit: Option<u32>,
    ) -> Result<IngestReceipt, ApiError> {
        self.record("process_sitemap");
        Ok(receipt("sitemap"))
    }

    async fn list_sessions(&self) -> Result<SessionList, ApiError> {
        self.record("list_sessions");
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.fail_list_sessions) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(SessionList {
            sessions: state.sessions.clone(),
        })
    }

    async fn get_transcript(&self, _id: ChatbotId, session_id: &str) -> Result<Transcript, ApiError> {
        self.record("get_transcript");
        let state = self.state.lock().unwrap();
        match state.transcripts.get(session_id) {
            Some(entries) => Ok(Transcript {
                messages: entries.clone(),
            }),
            None => Err(ApiError::Server {
                status: 404,
                detail: Some("Session not found".to_string()),
            }),
        }
    }

    async fn send_chat(&self, id: ChatbotId, request: ChatRequest) -> Result<ChatStream, ApiError> {
        self.record("send_chat");
        let mut state = self.state.lock().unwrap();
        state.chat_requests.push((id, request));
        let script = state
            .chat_scripts
            .pop_front()
            .unwrap_or_else(|| ChatScript::Stream(vec![Ok(chunk("ok", Some("sess-new")))]));
        match script {
            ChatScript::Stream(items) => Ok(Box::pin(stream::iter(items))),
            ChatScript::Reject(err) => Err(err),
        }
    }

    async fn create_access_key(&self, request: &CreateAccessKeyRequest) -> Result<AccessKey, ApiError> {
        self.record("create_access_key");
        Ok(AccessKey {
            id: 1,
            key: "ak_live_123".to_string(),
            chatbot_id: request.chatbot_id,
            is_active: true,
            created_at: Utc::now(),
            expires_at: request.expires_at,
        })
    }

    async fn deactivate_access_key(&self, key: &str) -> Result<AccessKey, ApiError> {
        self.record("deactivate_access_key");
        Ok(AccessKey {
            id: 1,
            key: key.to_string(),
            chatbot_id: ChatbotId(1),
            is_active: false,
            created_at: Utc::now(),
            expires_at: None,
        })
    }
}
