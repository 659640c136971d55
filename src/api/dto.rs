//! Wire representations of the server's JSON payloads and their conversion
//! into domain entities.

use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    chat::{
        ChatInfo, ChatSummary, GroupInfo, LocalUser, MessagePreview, OtherUser, Participant,
        UserSummary,
    },
    message::Message,
};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unparseable message timestamp: {raw}")]
    BadTimestamp { raw: String },
}

/// The server emits HTTP-date (RFC 2822) datetimes; RFC 3339 is accepted as
/// a fallback. Returns unix milliseconds.
pub fn parse_server_timestamp(raw: &str) -> Result<i64, DecodeError> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| DecodeError::BadTimestamp {
            raw: raw.to_owned(),
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}

impl UserDto {
    fn into_other_user(self) -> OtherUser {
        OtherUser {
            user_id: self.id,
            name: self.name,
            avatar_ref: self.avatar,
            is_online: self.is_online,
        }
    }

    fn into_participant(self) -> Participant {
        Participant {
            user_id: self.id,
            name: self.name,
            avatar_ref: self.avatar,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInfoDto {
    pub participant_count: u32,
    #[serde(default)]
    pub participants: Vec<UserDto>,
}

impl GroupInfoDto {
    fn into_domain(self) -> GroupInfo {
        GroupInfo {
            participant_count: self.participant_count,
            participants: self
                .participants
                .into_iter()
                .map(UserDto::into_participant)
                .collect(),
        }
    }
}

/// One-entry preview array attached to each directory summary.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewDto {
    pub content: String,
    /// Server-formatted "HH:MM" display string.
    pub timestamp: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSummaryDto {
    pub id: i64,
    pub name: String,
    pub is_group: bool,
    pub group_info: Option<GroupInfoDto>,
    pub other_user: Option<UserDto>,
    #[serde(default)]
    pub messages: Vec<PreviewDto>,
}

impl ChatSummaryDto {
    pub fn into_domain(self) -> ChatSummary {
        ChatSummary {
            chat_id: self.id,
            name: self.name,
            is_group: self.is_group,
            other_user: self.other_user.map(UserDto::into_other_user),
            group_info: self.group_info.map(GroupInfoDto::into_domain),
            last_message: self.messages.into_iter().next().map(|preview| MessagePreview {
                content: preview.content,
                timestamp: preview.timestamp,
                author_name: preview.user_name,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatInfoDto {
    pub name: String,
    pub is_group: bool,
    pub participant_count: Option<u32>,
    pub participants: Option<Vec<UserDto>>,
    pub other_user: Option<UserDto>,
}

impl ChatInfoDto {
    /// Some info responses omit the chat id; the requested id is
    /// authoritative.
    pub fn into_domain(self, chat_id: i64) -> ChatInfo {
        ChatInfo {
            chat_id,
            name: self.name,
            is_group: self.is_group,
            other_user: self.other_user.map(UserDto::into_other_user),
            participant_count: self.participant_count.unwrap_or_default(),
            participants: self
                .participants
                .unwrap_or_default()
                .into_iter()
                .map(UserDto::into_participant)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub timestamp: String,
}

impl MessageDto {
    pub fn into_domain(self, chat_id: i64) -> Result<Message, DecodeError> {
        let timestamp_ms = parse_server_timestamp(&self.timestamp)?;
        Ok(Message {
            id: Some(self.id),
            chat_id,
            author_id: self.user_id,
            author_name: self.user_name,
            author_avatar_ref: self.user_avatar,
            content: self.content,
            timestamp_ms,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginDto {
    pub id: i64,
    pub name: String,
}

impl LoginDto {
    pub fn into_domain(self) -> LocalUser {
        LocalUser {
            user_id: self.id,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSummaryDto {
    pub id: i64,
    pub name: String,
}

impl UserSummaryDto {
    pub fn into_domain(self) -> UserSummary {
        UserSummary {
            user_id: self.id,
            name: self.name,
        }
    }
}

/// Rejection payloads carry `error` or `message` depending on the endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorBodyDto {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBodyDto {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_http_date_timestamps() {
        let ms = parse_server_timestamp("Sat, 14 Feb 2026 12:00:00 GMT")
            .expect("http date should parse");

        assert_eq!(ms, 1_771_070_400_000);
    }

    #[test]
    fn falls_back_to_rfc3339_timestamps() {
        let ms =
            parse_server_timestamp("2026-02-14T12:00:00+00:00").expect("rfc3339 should parse");

        assert_eq!(ms, 1_771_070_400_000);
    }

    #[test]
    fn rejects_unparseable_timestamps() {
        let error = parse_server_timestamp("14/02/2026").expect_err("must fail");

        assert!(matches!(error, DecodeError::BadTimestamp { .. }));
    }

    #[test]
    fn summary_conversion_keeps_first_preview_only() {
        let dto: ChatSummaryDto = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Ops",
            "is_group": true,
            "group_info": {
                "participant_count": 2,
                "participants": [
                    {"id": 1, "name": "Ana", "avatar": "a.png", "is_online": true},
                    {"id": 2, "name": "Bruno", "avatar": null, "is_online": false}
                ]
            },
            "other_user": null,
            "messages": [{"content": "hola", "timestamp": "12:30", "user_name": "Ana"}]
        }))
        .expect("summary should deserialize");

        let summary = dto.into_domain();

        assert_eq!(summary.chat_id, 3);
        assert!(summary.is_group);
        let group = summary.group_info.expect("group info present");
        assert_eq!(group.participant_count, 2);
        assert_eq!(group.participants[0].name, "Ana");
        let preview = summary.last_message.expect("preview present");
        assert_eq!(preview.author_name, "Ana");
        assert_eq!(preview.timestamp, "12:30");
    }

    #[test]
    fn info_conversion_uses_requested_chat_id() {
        let dto: ChatInfoDto = serde_json::from_value(serde_json::json!({
            "name": "Ana",
            "is_group": false,
            "other_user": {"id": 9, "name": "Ana", "avatar": "a.png", "is_online": true}
        }))
        .expect("info should deserialize");

        let info = dto.into_domain(77);

        assert_eq!(info.chat_id, 77);
        assert!(!info.is_group);
        assert!(info.other_user.expect("peer present").is_online);
    }

    #[test]
    fn message_conversion_carries_the_requested_chat() {
        let dto: MessageDto = serde_json::from_value(serde_json::json!({
            "id": 5,
            "content": "hola",
            "user_id": 2,
            "user_name": "Ana",
            "user_avatar": null,
            "timestamp": "Sat, 14 Feb 2026 12:00:00 GMT"
        }))
        .expect("message should deserialize");

        let message = dto.into_domain(7).expect("conversion should succeed");

        assert_eq!(message.chat_id, 7);
        assert_eq!(message.author_id, 2);
        assert_eq!(message.timestamp_ms, 1_771_070_400_000);
    }

    #[test]
    fn error_body_prefers_error_over_message() {
        let body = ErrorBodyDto {
            error: Some("Not a chat participant".to_owned()),
            message: Some("Chat deleted for you".to_owned()),
        };

        assert_eq!(
            body.into_message().as_deref(),
            Some("Not a chat participant")
        );
    }
}
