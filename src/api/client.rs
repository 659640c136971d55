//! HTTP+JSON client for the chat server.
//!
//! One cookie-holding client is shared by the shell, the polling loop, and
//! the presence heartbeat; the session cookie obtained at login authenticates
//! every later call.

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::domain::{
    chat::{ChatInfo, ChatSummary, LocalUser, UserSummary},
    message::Message,
};

use super::dto::{
    ChatInfoDto, ChatSummaryDto, ErrorBodyDto, LoginDto, MessageDto, UserSummaryDto,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build http client: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} rejected with status {status}: {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("{endpoint} returned invalid data: {details}")]
    InvalidData { endpoint: String, details: String },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }
}

#[derive(Debug, Clone)]
pub struct HttpChatApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|source| ApiError::Build { source })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Normalized server base URL, for resolving server-relative references
    /// (avatar and upload paths).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LocalUser, ApiError> {
        let dto: LoginDto = self
            .post_json("/login", &json!({ "email": email, "password": password }))
            .await?;
        Ok(dto.into_domain())
    }

    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>, ApiError> {
        let dtos: Vec<ChatSummaryDto> = self.get_json("/get_chats").await?;
        Ok(dtos.into_iter().map(ChatSummaryDto::into_domain).collect())
    }

    pub async fn search_chats(&self, query: &str) -> Result<Vec<ChatSummary>, ApiError> {
        let path = format!("/buscar_chat/{}", urlencoding::encode(query));
        let dtos: Vec<ChatSummaryDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(ChatSummaryDto::into_domain).collect())
    }

    pub async fn chat_info(&self, chat_id: i64) -> Result<ChatInfo, ApiError> {
        let path = format!("/get_chat_info/{chat_id}");
        let dto: ChatInfoDto = self.get_json(&path).await?;
        Ok(dto.into_domain(chat_id))
    }

    pub async fn chat_messages(&self, chat_id: i64) -> Result<Vec<Message>, ApiError> {
        let path = format!("/get_chat_messages/{chat_id}");
        let dtos: Vec<MessageDto> = self.get_json(&path).await?;
        dtos.into_iter()
            .map(|dto| {
                dto.into_domain(chat_id).map_err(|error| ApiError::InvalidData {
                    endpoint: path.clone(),
                    details: error.to_string(),
                })
            })
            .collect()
    }

    pub async fn send_message(&self, chat_id: i64, content: &str) -> Result<(), ApiError> {
        self.post_expect_ok(
            "/send_message",
            &json!({ "chat_id": chat_id, "content": content }),
        )
        .await
    }

    pub async fn send_image(
        &self,
        chat_id: i64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let endpoint = "/mensaje_con_imagen";
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_owned(),
                source,
            })?;
        let form = multipart::Form::new()
            .part("image", part)
            .text("chat_id", chat_id.to_string());

        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_owned(),
                source,
            })?;
        Self::check_status(endpoint, response).await.map(|_| ())
    }

    pub async fn create_chat(
        &self,
        name: &str,
        participants: &[i64],
        is_group: bool,
    ) -> Result<(), ApiError> {
        self.post_expect_ok(
            "/create_chat",
            &json!({ "name": name, "participants": participants, "is_group": is_group }),
        )
        .await
    }

    pub async fn delete_chat(&self, chat_id: i64) -> Result<(), ApiError> {
        let path = format!("/delete_chat/{chat_id}");
        self.post_empty(&path).await
    }

    pub async fn update_active_chat(&self, chat_id: i64) -> Result<(), ApiError> {
        self.post_expect_ok("/update_active_chat", &json!({ "chat_id": chat_id }))
            .await
    }

    pub async fn clear_active_chat(&self) -> Result<(), ApiError> {
        self.post_empty("/clear_active_chat").await
    }

    pub async fn update_status(&self) -> Result<(), ApiError> {
        self.post_empty("/update_status").await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let dtos: Vec<UserSummaryDto> = self.get_json("/get_users").await?;
        Ok(dtos.into_iter().map(UserSummaryDto::into_domain).collect())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty("/logout").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_owned(),
                source,
            })?;
        let response = Self::check_status(path, response).await?;

        response.json().await.map_err(|source| ApiError::InvalidData {
            endpoint: path.to_owned(),
            details: source.to_string(),
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self.post_raw(path, Some(body)).await?;

        response.json().await.map_err(|source| ApiError::InvalidData {
            endpoint: path.to_owned(),
            details: source.to_string(),
        })
    }

    async fn post_expect_ok(&self, path: &str, body: &serde_json::Value) -> Result<(), ApiError> {
        self.post_raw(path, Some(body)).await.map(|_| ())
    }

    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.post_raw(path, None).await.map(|_| ())
    }

    async fn post_raw(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: path.to_owned(),
            source,
        })?;
        Self::check_status(path, response).await
    }

    async fn check_status(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBodyDto>()
            .await
            .ok()
            .and_then(ErrorBodyDto::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_owned()
            });

        Err(ApiError::Rejected {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            message,
        })
    }
}


#[cfg(test)]
mod http_tests {
    //! Wire-level tests against a mock chat server.

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{ApiError, HttpChatApi};

    fn message_json(id: i64, user_id: i64, content: &str, timestamp: &str) -> serde_json::Value {
        json!({
            "id": id,
            "content": content,
            "user_id": user_id,
            "user_name": "Ana",
            "user_avatar": "ana.png",
            "timestamp": timestamp
        })
    }

    #[tokio::test]
    async fn login_returns_the_local_user_and_stores_the_session_cookie() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({
                "email": "ana@example.com",
                "password": "secret"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc123; Path=/")
                    .set_body_json(json!({
                        "id": 10,
                        "name": "Ana",
                        "email": "ana@example.com"
                    })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/get_chats"))
            .and(header("cookie", "session=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");

        let user = api
            .login("ana@example.com", "secret")
            .await
            .expect("login should succeed");
        assert_eq!(user.user_id, 10);
        assert_eq!(user.name, "Ana");

        // The session cookie from login authenticates subsequent requests.
        let chats = api.list_chats().await.expect("chats should load");
        assert!(chats.is_empty());

        server.verify().await;
    }

    #[tokio::test]
    async fn directory_summaries_parse_group_and_individual_shapes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "name": "Ana",
                    "is_group": false,
                    "group_info": null,
                    "other_user": {
                        "id": 2,
                        "name": "Ana",
                        "avatar": "ana.png",
                        "is_online": true,
                        "last_seen": "2026-02-14T12:00:00"
                    },
                    "messages": [
                        {"content": "hola", "timestamp": "12:30", "user_name": "Ana"}
                    ]
                },
                {
                    "id": 2,
                    "name": "Ops",
                    "is_group": true,
                    "group_info": {
                        "participant_count": 3,
                        "participants": [
                            {"id": 2, "name": "Ana", "avatar": null, "is_online": false},
                            {"id": 3, "name": "Bruno", "avatar": "b.png", "is_online": true}
                        ]
                    },
                    "other_user": null,
                    "messages": []
                }
            ])))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        let chats = api.list_chats().await.expect("chats should load");

        assert_eq!(chats.len(), 2);
        assert!(!chats[0].is_group);
        assert!(chats[0].other_user.as_ref().expect("peer").is_online);
        assert_eq!(
            chats[0].last_message.as_ref().expect("preview").timestamp,
            "12:30"
        );
        assert!(chats[1].is_group);
        assert_eq!(
            chats[1].group_info.as_ref().expect("group").participant_count,
            3
        );
    }

    #[tokio::test]
    async fn search_url_escapes_the_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/buscar_chat/ana%20b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        let chats = api.search_chats("ana b").await.expect("search should work");

        assert!(chats.is_empty());
        server.verify().await;
    }

    #[tokio::test]
    async fn messages_parse_http_date_timestamps_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_chat_messages/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                message_json(1, 2, "hola", "Sat, 14 Feb 2026 12:00:00 GMT"),
                message_json(2, 10, "/static/uploads/pic.png", "Sat, 14 Feb 2026 12:05:00 GMT")
            ])))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        let messages = api.chat_messages(7).await.expect("messages should load");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].chat_id, 7);
        assert_eq!(messages[0].timestamp_ms, 1_771_070_400_000);
        assert!(messages[1].timestamp_ms > messages[0].timestamp_ms);
        assert!(messages[1].is_image());
    }

    #[tokio::test]
    async fn unparseable_timestamps_are_invalid_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_chat_messages/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                message_json(1, 2, "hola", "yesterday")
            ])))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        let error = api.chat_messages(7).await.expect_err("must fail");

        assert!(matches!(error, ApiError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn send_message_posts_chat_id_and_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/send_message"))
            .and(body_json(json!({"chat_id": 7, "content": "hola"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "sent"})))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        api.send_message(7, "hola").await.expect("send should work");

        server.verify().await;
    }

    #[tokio::test]
    async fn chat_info_uses_the_requested_id_for_individual_chats() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_chat_info/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9,
                "name": "Ana",
                "is_group": false,
                "other_user": {"id": 2, "name": "Ana", "avatar": null, "is_online": false}
            })))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        let info = api.chat_info(9).await.expect("info should load");

        assert_eq!(info.chat_id, 9);
        assert!(!info.is_group);
        assert!(!info.other_user.expect("peer").is_online);
    }

    #[tokio::test]
    async fn rejection_payloads_surface_the_server_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/delete_chat/7"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"error": "Not a chat participant"})),
            )
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        let error = api.delete_chat(7).await.expect_err("must fail");

        assert!(!error.is_unauthorized());
        assert!(matches!(
            error,
            ApiError::Rejected { status: 403, ref message, .. } if message == "Not a chat participant"
        ));
    }

    #[tokio::test]
    async fn presence_and_active_chat_markers_post_without_bodies() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/update_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "updated"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/clear_active_chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "cleared"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/update_active_chat"))
            .and(body_json(json!({"chat_id": 7})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "updated"})))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(&server.uri()).expect("client should build");
        api.update_status().await.expect("presence should post");
        api.clear_active_chat().await.expect("clear should post");
        api.update_active_chat(7).await.expect("marker should post");

        server.verify().await;
    }
}
