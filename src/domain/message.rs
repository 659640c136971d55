/// Server path prefix that marks a message body as an uploaded image.
const IMAGE_REF_PREFIX: &str = "/static/uploads/";

/// Whether a raw body string is an uploaded-image reference.
pub fn is_image_ref(content: &str) -> bool {
    content.starts_with(IMAGE_REF_PREFIX)
}

/// How a message body should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    ImageRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Server-assigned id; previews and optimistic paths may lack one.
    pub id: Option<i64>,
    pub chat_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_avatar_ref: Option<String>,
    pub content: String,
    pub timestamp_ms: i64,
}

impl Message {
    /// Classifies the body: an upload-path reference renders as an image,
    /// anything else as plain text.
    pub fn content_kind(&self) -> ContentKind {
        if is_image_ref(&self.content) {
            ContentKind::ImageRef
        } else {
            ContentKind::Text
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_kind() == ContentKind::ImageRef
    }

    /// Short body used for notification previews.
    pub fn notification_preview(&self) -> String {
        match self.content_kind() {
            ContentKind::ImageRef => "[Image]".to_owned(),
            ContentKind::Text => self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(content: &str) -> Message {
        Message {
            id: Some(1),
            chat_id: 7,
            author_id: 2,
            author_name: "Ana".to_owned(),
            author_avatar_ref: None,
            content: content.to_owned(),
            timestamp_ms: 1000,
        }
    }

    #[test]
    fn upload_path_is_classified_as_image_ref() {
        assert_eq!(
            msg("/static/uploads/abc.png").content_kind(),
            ContentKind::ImageRef
        );
    }

    #[test]
    fn plain_text_is_classified_as_text() {
        assert_eq!(msg("hola").content_kind(), ContentKind::Text);
    }

    #[test]
    fn text_mentioning_uploads_midway_stays_text() {
        assert_eq!(
            msg("see /static/uploads/abc.png").content_kind(),
            ContentKind::Text
        );
    }

    #[test]
    fn notification_preview_masks_image_bodies() {
        assert_eq!(msg("/static/uploads/abc.png").notification_preview(), "[Image]");
        assert_eq!(msg("hola").notification_preview(), "hola");
    }
}
