//! Use case for sending an image message from a local file.
//!
//! The composer accepts a pasted file path; the bytes are uploaded as a
//! multipart message and the caller refetches the history on success, same
//! as the text path.

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendImageSourceError {
    Unauthorized,
    Unavailable,
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendImageError {
    /// The path does not exist or is not readable.
    Unreadable { path: String },
    /// The file extension is not a recognized image type.
    NotAnImage { path: String },
    Unauthorized,
    TemporarilyUnavailable,
    Rejected { message: String },
}

pub trait ImageSender {
    fn send_image(
        &self,
        chat_id: i64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), SendImageSourceError>;
}

impl<T: ImageSender + ?Sized> ImageSender for &T {
    fn send_image(
        &self,
        chat_id: i64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), SendImageSourceError> {
        (*self).send_image(chat_id, file_name, bytes)
    }
}

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Whether a path names a file this client will upload as an image.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reads the file at `path` and uploads it as an image message.
pub fn send_image_from_path(
    sender: &dyn ImageSender,
    chat_id: i64,
    path: &Path,
) -> Result<(), SendImageError> {
    if !is_image_path(path) {
        return Err(SendImageError::NotAnImage {
            path: path.display().to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|_| SendImageError::Unreadable {
        path: path.display().to_string(),
    })?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image.png")
        .to_owned();

    sender
        .send_image(chat_id, file_name, bytes)
        .map_err(map_source_error)
}

fn map_source_error(error: SendImageSourceError) -> SendImageError {
    match error {
        SendImageSourceError::Unauthorized => SendImageError::Unauthorized,
        SendImageSourceError::Unavailable => SendImageError::TemporarilyUnavailable,
        SendImageSourceError::Rejected { message } => SendImageError::Rejected { message },
    }
}
