//! Application state wiring all services together.
//!
//! Services are generic over the `PlatformApi` port; AppState pins them to
//! the reqwest-backed client and the env-then-file credential chain.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use botdesk_core::chat::service::ChatService;
use botdesk_core::chat::session_feed::SessionFeed;
use botdesk_core::credentials::{CredentialChain, DynCredentialStore};
use botdesk_core::service::auth::AuthService;
use botdesk_core::service::chatbot::ChatbotService;
use botdesk_core::service::embed::EmbedService;
use botdesk_core::service::knowledge::KnowledgeService;
use botdesk_infra::config::{load_client_config, resolve_data_dir};
use botdesk_infra::credentials::{EnvCredentialStore, FileCredentialStore};
use botdesk_infra::http::HttpPlatformClient;
use botdesk_types::config::ClientConfig;

pub type ConcreteAuthService = AuthService<HttpPlatformClient>;
pub type ConcreteChatbotService = ChatbotService<HttpPlatformClient>;
pub type ConcreteKnowledgeService = KnowledgeService<HttpPlatformClient>;
pub type ConcreteChatService = ChatService<HttpPlatformClient>;
pub type ConcreteEmbedService = EmbedService<HttpPlatformClient>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub chatbot_service: Arc<ConcreteChatbotService>,
    pub knowledge_service: Arc<ConcreteKnowledgeService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub embed_service: Arc<ConcreteEmbedService>,
    pub config: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration and wire services. Makes no network calls.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_client_config(&data_dir).await;

        // Environment credentials shadow the stored login
        let stores: Vec<DynCredentialStore> = vec![
            Arc::new(EnvCredentialStore::new()),
            Arc::new(FileCredentialStore::new(&data_dir)),
        ];
        let credentials = Arc::new(CredentialChain::new(stores));

        let api = Arc::new(
            HttpPlatformClient::new(&config, credentials.clone())
                .context("Failed to build the platform API client")?,
        );

        tracing::debug!(
            data_dir = %data_dir.display(),
            api_root = api.api_root(),
            "application state initialized"
        );

        Ok(Self {
            auth_service: Arc::new(AuthService::new(api.clone(), credentials)),
            chatbot_service: Arc::new(ChatbotService::new(api.clone(), config.page_size)),
            knowledge_service: Arc::new(KnowledgeService::new(api.clone())),
            chat_service: Arc::new(ChatService::new(api.clone(), SessionFeed::new())),
            embed_service: Arc::new(EmbedService::new(api, config.widget_url.clone())),
            config,
            data_dir,
        })
    }
}
