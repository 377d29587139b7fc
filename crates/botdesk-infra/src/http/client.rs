//! `HttpPlatformClient` -- concrete [`PlatformApi`] over reqwest.
//!
//! Every request except login goes through [`HttpPlatformClient::authorized`],
//! which loads credentials from the credential store and attaches the bearer
//! token. With no stored credentials the request fails with
//! `ApiError::NotAuthenticated` before anything touches the network.
//!
//! Non-streaming requests carry the configured timeout. The chat request
//! does not: a long answer may stream for minutes.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{IntoUrl, Method, RequestBuilder, Response, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;

use botdesk_core::api::{ChatStream, PlatformApi};
use botdesk_core::credentials::{Credentials, DynCredentialStore};
use botdesk_types::access_key::{AccessKey, CreateAccessKeyRequest};
use botdesk_types::auth::{AuthToken, LoginRequest};
use botdesk_types::chat::{ChatRequest, SessionList, Transcript};
use botdesk_types::chatbot::{Chatbot, ChatbotId, CreateChatbotRequest, UpdateChatbotRequest};
use botdesk_types::config::ClientConfig;
use botdesk_types::error::ApiError;
use botdesk_types::knowledge::IngestReceipt;

use super::error::{status_error, transport_error};
use super::sse::decode_chat_stream;

// No Debug: the credential store may hold a live token.
pub struct HttpPlatformClient {
    client: reqwest::Client,
    api_root: String,
    timeout: Duration,
    credentials: DynCredentialStore,
}

impl HttpPlatformClient {
    pub fn new(config: &ClientConfig, credentials: DynCredentialStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_root: config.api_root(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            credentials,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// URL under the API root with each segment percent-encoded, for path
    /// parts the user typed (session ids, access keys).
    fn segment_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = || ApiError::Validation(format!("Invalid API base URL: {}", self.api_root));
        let mut url = Url::parse(&self.api_root).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Stored credentials, or `NotAuthenticated` when nobody is signed in.
    fn current_credentials(&self) -> Result<Credentials, ApiError> {
        self.credentials.load()?.ok_or(ApiError::NotAuthenticated)
    }

    /// Request carrying the bearer token, without a timeout.
    fn bearer(&self, credentials: &Credentials, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(credentials.token.expose_secret())
    }

    /// Request carrying the bearer token and the configured timeout.
    fn authorized(&self, credentials: &Credentials, method: Method, path: &str) -> RequestBuilder {
        self.authorized_at(credentials, method, self.url(path))
    }

    fn authorized_at(&self, credentials: &Credentials, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.bearer(credentials, method, url).timeout(self.timeout)
    }

    /// Send and map any non-success status to an error.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "platform request failed");
        Err(status_error(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

impl PlatformApi for HttpPlatformClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError> {
        let form = Form::new()
            .text("email", request.email.clone())
            .text("password", request.password.clone());
        let builder = self
            .client
            .post(self.url("/auth/login"))
            .multipart(form)
            .timeout(self.timeout);
        self.send_json(builder).await
    }

    async fn create_chatbot(&self, name: &str) -> Result<Chatbot, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::POST, "/chatbots");
        let body = CreateChatbotRequest {
            name: name.to_string(),
            user_id: creds.user_id,
        };
        self.send_json(builder.json(&body)).await
    }

    async fn list_chatbots(&self) -> Result<Vec<Chatbot>, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::GET, &format!("/chatbots/user/{}", creds.user_id));
        self.send_json(builder).await
    }

    async fn get_chatbot(&self, id: ChatbotId) -> Result<Chatbot, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::GET, &format!("/chatbots/{id}"));
        self.send_json(builder).await
    }

    async fn rename_chatbot(&self, id: ChatbotId, name: &str) -> Result<Chatbot, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::PUT, &format!("/chatbots/{id}"));
        let body = UpdateChatbotRequest {
            name: name.to_string(),
            index_id: None,
        };
        self.send_json(builder.json(&body)).await
    }

    async fn delete_chatbot(&self, id: ChatbotId) -> Result<(), ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::DELETE, &format!("/chatbots/{id}"));
        self.send(builder).await?;
        Ok(())
    }

    async fn upload_document(&self, id: ChatbotId, path: &Path) -> Result<IngestReceipt, ApiError> {
        let creds = self.current_credentials()?;
        let path_segment = format!("/chatbots/{id}/upload-document");
        let builder = self.authorized(&creds, Method::POST, &path_segment);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Validation(format!("Cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(path))
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        self.send_json(builder.multipart(Form::new().part("file", part))).await
    }

    async fn scrape_url(&self, id: ChatbotId, url: &str) -> Result<IngestReceipt, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self
            .authorized(&creds, Method::POST, "/scrape/scrape")
            .query(&[("url", url.to_string()), ("chatbot_id", id.to_string())]);
        self.send_json(builder).await
    }

    async fn process_sitemap(
        &self,
        id: ChatbotId,
        sitemap_url: &str,
        limit: Option<u32>,
    ) -> Result<IngestReceipt, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::POST, "/scrape/process-sitemap");
        let mut query = vec![
            ("sitemap_url", sitemap_url.to_string()),
            ("chatbot_id", id.to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.send_json(builder.query(&query)).await
    }

    async fn list_sessions(&self) -> Result<SessionList, ApiError> {
        let creds = self.current_credentials()?;
        let path = format!("/chatbots/sessions/user/{}", creds.user_id);
        let builder = self.authorized(&creds, Method::GET, &path);
        self.send_json(builder).await
    }

    async fn get_transcript(&self, id: ChatbotId, session_id: &str) -> Result<Transcript, ApiError> {
        let creds = self.current_credentials()?;
        let chatbot = id.to_string();
        let url = self.segment_url(&["chatbots", &chatbot, "sessions", session_id, "messages"])?;
        let builder = self.authorized_at(&creds, Method::GET, url);
        self.send_json(builder).await
    }

    async fn send_chat(&self, id: ChatbotId, request: ChatRequest) -> Result<ChatStream, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self
            .bearer(&creds, Method::POST, self.url(&format!("/chatbots/{id}/chat")))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request);
        let response = self.send(builder).await?;
        debug!(chatbot_id = %id, "chat stream opened");
        Ok(decode_chat_stream(response.bytes_stream()))
    }

    async fn create_access_key(&self, request: &CreateAccessKeyRequest) -> Result<AccessKey, ApiError> {
        let creds = self.current_credentials()?;
        let builder = self.authorized(&creds, Method::POST, "/access-keys/");
        self.send_json(builder.json(request)).await
    }

    async fn deactivate_access_key(&self, key: &str) -> Result<AccessKey, ApiError> {
        let creds = self.current_credentials()?;
        let url = self.segment_url(&["access-keys", key, "deactivate"])?;
        let builder = self.authorized_at(&creds, Method::POST, url);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use botdesk_core::credentials::CredentialStore;
    use futures_util::StreamExt;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticStore(Mutex<Option<Credentials>>);

    impl CredentialStore for StaticStore {
        fn name(&self) -> &'static str {
            "static"
        }
        fn load(&self) -> Result<Option<Credentials>, ApiError> {
            Ok(self.0.lock().unwrap().clone())
        }
        fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
            *self.0.lock().unwrap() = Some(credentials.clone());
            Ok(())
        }
        fn clear(&self) -> Result<(), ApiError> {
            *self.0.lock().unwrap() = None;
            Ok(())
        }
    }

    fn client_for(server: &MockServer, signed_in: bool) -> HttpPlatformClient {
        let config = ClientConfig {
            api_base_url: server.uri(),
            ..ClientConfig::default()
        };
        let creds = signed_in.then(|| Credentials::new("tok-123", 7, None));
        HttpPlatformClient::new(&config, Arc::new(StaticStore(Mutex::new(creds)))).unwrap()
    }

    fn chatbot_json(id: i64, name: &str) -> serde_json::Value {
        json!({"id": id, "name": name, "user_id": 7, "index_id": null})
    }

    #[tokio::test]
    async fn list_chatbots_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/chatbots/user/7"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([chatbot_json(1, "Support")])))
            .expect(1)
            .mount(&server)
            .await;

        let bots = client_for(&server, true).list_chatbots().await.unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].name, "Support");
    }

    #[tokio::test]
    async fn missing_credentials_skip_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server, false).list_chatbots().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }

    #[tokio::test]
    async fn create_chatbot_includes_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chatbots"))
            .and(body_json(json!({"name": "Sales", "user_id": 7})))
            .respond_with(ResponseTemplate::new(201).set_body_json(chatbot_json(5, "Sales")))
            .expect(1)
            .mount(&server)
            .await;

        let bot = client_for(&server, true).create_chatbot("Sales").await.unwrap();
        assert_eq!(bot.id, ChatbotId(5));
    }

    #[tokio::test]
    async fn login_posts_form_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh", "token_type": "bearer", "user_id": 7
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server, false)
            .login(&LoginRequest {
                email: "dev@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(token.access_token, "fresh");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[tokio::test]
    async fn error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/chatbots/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Chatbot not found"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/chatbots/10"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = client_for(&server, true);
        let err = client.get_chatbot(ChatbotId(9)).await.unwrap_err();
        assert_eq!(err.user_message(), "Chatbot not found");
        let err = client.get_chatbot(ChatbotId(10)).await.unwrap_err();
        assert_eq!(err.user_message(), "An error occurred");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_login_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})))
            .mount(&server)
            .await;

        let err = client_for(&server, true).get_chatbot(ChatbotId(1)).await.unwrap_err();
        assert!(err.needs_login());
    }

    #[tokio::test]
    async fn rejected_login_shows_server_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect email or password"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, false)
            .login(&LoginRequest {
                email: "dev@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.user_message(), "Incorrect email or password");
    }

    #[tokio::test]
    async fn transcript_session_id_is_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/chatbots/1/sessions/a%3Fb%23c%2Fd/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, true);
        client.get_transcript(ChatbotId(1), "a?b#c/d").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.path(), "/api/v1/chatbots/1/sessions/a%3Fb%23c%2Fd/messages");
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn deactivate_encodes_access_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/access-keys/k%2F1%3Fx/deactivate"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, true)
            .deactivate_access_key("k/1?x")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let config = ClientConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..ClientConfig::default()
        };
        let store = Arc::new(StaticStore(Mutex::new(Some(Credentials::new("t", 1, None)))));
        let client = HttpPlatformClient::new(&config, store).unwrap();

        let err = client.get_chatbot(ChatbotId(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.user_message(), "Network error or server not reachable");
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/chatbots/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, true).delete_chatbot(ChatbotId(3)).await.unwrap();
    }

    #[tokio::test]
    async fn sitemap_passes_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/scrape/process-sitemap"))
            .and(query_param("sitemap_url", "https://example.com/sitemap.xml"))
            .and(query_param("chatbot_id", "4"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "done", "processed": 25})))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client_for(&server, true)
            .process_sitemap(ChatbotId(4), "https://example.com/sitemap.xml", Some(25))
            .await
            .unwrap();
        assert_eq!(receipt.processed_count(), Some(25));
    }

    #[tokio::test]
    async fn upload_sends_multipart_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chatbots/2/upload-document"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Document processed"})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("faq.txt");
        std::fs::write(&file, "opening hours: 9-5").unwrap();

        let receipt = client_for(&server, true)
            .upload_document(ChatbotId(2), &file)
            .await
            .unwrap();
        assert_eq!(receipt.message(), Some("Document processed"));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("filename=\"faq.txt\""));
        assert!(body.contains("opening hours: 9-5"));
    }

    #[tokio::test]
    async fn chat_streams_chunks() {
        let server = MockServer::start().await;
        let sse = "data: {\"content\": \"Hi\", \"session_id\": \"s-1\"}\n\n\
                   data: {\"content\": \" there\", \"session_id\": \"s-1\"}\n\n\
                   data: [DONE]\n\n";
        Mock::given(method("POST"))
            .and(path("/api/v1/chatbots/1/chat"))
            .and(body_json(json!({"message": "hello"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(sse, "text/event-stream"),
            )
            .mount(&server)
            .await;

        let stream = client_for(&server, true)
            .send_chat(
                ChatbotId(1),
                ChatRequest {
                    message: "hello".to_string(),
                    session_id: None,
                },
            )
            .await
            .unwrap();
        let chunks: Vec<_> = stream.collect().await;
        let text: String = chunks.into_iter().map(|c| c.unwrap().content).collect();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn chat_rejection_fails_before_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chatbots/1/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Chatbot not found"})))
            .mount(&server)
            .await;

        let result = client_for(&server, true)
            .send_chat(
                ChatbotId(1),
                ChatRequest {
                    message: "hello".to_string(),
                    session_id: Some("s-1".to_string()),
                },
            )
            .await;
        match result {
            Err(e) => assert_eq!(e.user_message(), "Chatbot not found"),
            Ok(_) => panic!("expected an error"),
        }
    }
}
