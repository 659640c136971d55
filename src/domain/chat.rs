/// A user as seen from a conversation: the peer in a one-to-one chat or a
/// group participant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Participant {
    pub user_id: i64,
    pub name: String,
    pub avatar_ref: Option<String>,
}

/// The peer of a one-to-one conversation, including live presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherUser {
    pub user_id: i64,
    pub name: String,
    pub avatar_ref: Option<String>,
    pub is_online: bool,
}

/// Group membership data attached to a group conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupInfo {
    pub participant_count: u32,
    pub participants: Vec<Participant>,
}

/// One-line preview of the most recent message in a conversation.
///
/// The timestamp is a server-formatted display string ("HH:MM"), never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePreview {
    pub content: String,
    pub timestamp: String,
    pub author_name: String,
}

/// A conversation summary as listed in the sidebar directory.
///
/// Summaries are immutable snapshots: a refresh replaces the whole set, no
/// field is ever patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub name: String,
    pub is_group: bool,
    pub other_user: Option<OtherUser>,
    pub group_info: Option<GroupInfo>,
    pub last_message: Option<MessagePreview>,
}

/// Detailed header data for one conversation, re-fetched on every poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub chat_id: i64,
    pub name: String,
    pub is_group: bool,
    pub other_user: Option<OtherUser>,
    pub participant_count: u32,
    pub participants: Vec<Participant>,
}

impl ChatInfo {
    /// Comma-joined participant names for the group header status line.
    pub fn participant_names(&self) -> String {
        self.participants
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A selectable user for the new-chat flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: i64,
    pub name: String,
}

/// The authenticated local user, established once at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUser {
    pub user_id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_names_joins_in_order() {
        let info = ChatInfo {
            chat_id: 1,
            name: "Ops".to_owned(),
            is_group: true,
            other_user: None,
            participant_count: 2,
            participants: vec![
                Participant {
                    user_id: 1,
                    name: "Ana".to_owned(),
                    avatar_ref: None,
                },
                Participant {
                    user_id: 2,
                    name: "Bruno".to_owned(),
                    avatar_ref: None,
                },
            ],
        };

        assert_eq!(info.participant_names(), "Ana, Bruno");
    }

    #[test]
    fn participant_names_is_empty_for_one_to_one() {
        let info = ChatInfo {
            chat_id: 1,
            name: "Ana".to_owned(),
            is_group: false,
            other_user: None,
            participant_count: 0,
            participants: vec![],
        };

        assert_eq!(info.participant_names(), "");
    }
}
