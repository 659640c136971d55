/// The single conversation currently displayed and polled.
///
/// Owned exclusively by the sync controller; at most one exists at a time.
/// `chat_id` and `chat_name` are the durable identity; the watermark and the
/// group flag are rebuilt on every (re)selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub chat_id: i64,
    pub chat_name: String,
    pub is_group: bool,
    last_seen_unix_ms: Option<i64>,
}

impl ActiveSession {
    pub fn new(chat_id: i64, chat_name: String, is_group: bool) -> Self {
        Self {
            chat_id,
            chat_name,
            is_group,
            last_seen_unix_ms: None,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn last_seen_unix_ms(&self) -> Option<i64> {
        self.last_seen_unix_ms
    }

    /// Advances the watermark and reports whether `timestamp_ms` was newer.
    ///
    /// The watermark never moves backwards for the lifetime of one session.
    pub fn advance_last_seen(&mut self, timestamp_ms: i64) -> bool {
        match self.last_seen_unix_ms {
            Some(seen) if timestamp_ms <= seen => false,
            _ => {
                self.last_seen_unix_ms = Some(timestamp_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_has_no_watermark() {
        let session = ActiveSession::new(1, "General".to_owned(), false);

        assert_eq!(session.last_seen_unix_ms(), None);
    }

    #[test]
    fn first_observation_always_advances() {
        let mut session = ActiveSession::new(1, "General".to_owned(), false);

        assert!(session.advance_last_seen(500));
        assert_eq!(session.last_seen_unix_ms(), Some(500));
    }

    #[test]
    fn watermark_never_decreases() {
        let mut session = ActiveSession::new(1, "General".to_owned(), false);
        session.advance_last_seen(1_000);

        assert!(!session.advance_last_seen(900));
        assert!(!session.advance_last_seen(1_000));
        assert_eq!(session.last_seen_unix_ms(), Some(1_000));
    }

    #[test]
    fn newer_timestamp_advances() {
        let mut session = ActiveSession::new(1, "General".to_owned(), false);
        session.advance_last_seen(1_000);

        assert!(session.advance_last_seen(1_001));
        assert_eq!(session.last_seen_unix_ms(), Some(1_001));
    }
}
