use serde::{Deserialize, Serialize};
use std::path::Path;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: OffsetDateTime,
    /// `content` already holds rendered HTML and must not be escaped again.
    pub is_markdown: bool,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>, is_markdown: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
            is_markdown,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, false)
    }

    pub fn assistant_html(html: impl Into<String>) -> Self {
        Self::new(Role::Assistant, html, true)
    }

    /// Creation time in the local zone when it can be determined, UTC otherwise.
    pub fn display_time(&self) -> String {
        let mut datetime = self.timestamp;
        if let Ok(offset) = UtcOffset::current_local_offset() {
            datetime = datetime.to_offset(offset);
        }
        format_time(datetime)
    }
}

fn format_time(datetime: OffsetDateTime) -> String {
    datetime.format(MESSAGE_TIME_FORMAT).unwrap_or_default()
}

/// A file picked by the user, staged for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Build a file from a name and contents, declaring its media type from the extension.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = media_type_for(&name);
        Self::new(name, media_type, bytes)
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub fn media_type_for(name: &str) -> &'static str {
    let is_pdf = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        PDF_MEDIA_TYPE
    } else {
        FALLBACK_MEDIA_TYPE
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub doc_id: String,
    pub total_chunks: u64,
    pub document_length: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Missing when the backend found no content for the document.
    #[serde(default)]
    pub doc_id: Option<String>,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(media_type_for("invoice.pdf"), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for("SCAN.PDF"), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for("notes.txt"), FALLBACK_MEDIA_TYPE);
        assert_eq!(media_type_for("pdf"), FALLBACK_MEDIA_TYPE);
    }

    #[test]
    fn test_from_name_declares_media_type() {
        assert!(SelectedFile::from_name("invoice.pdf", Vec::new()).is_pdf());
        assert!(!SelectedFile::from_name("photo.png", Vec::new()).is_pdf());
    }

    #[test]
    fn test_ask_response_without_doc_id() {
        let parsed: AskResponse =
            serde_json::from_str(r#"{"answer":"No content found for document d1"}"#).unwrap();
        assert_eq!(parsed.doc_id, None);
        assert_eq!(parsed.answer, "No content found for document d1");
    }

    #[test]
    fn test_format_time_twelve_hour() {
        let dt = time::macros::datetime!(2024-05-01 14:07 UTC);
        assert_eq!(format_time(dt), "02:07 PM");
        let dt = time::macros::datetime!(2024-05-01 00:30 UTC);
        assert_eq!(format_time(dt), "12:30 AM");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("hi");
        let b = ChatMessage::user("hi");
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, Role::User);
        assert!(!a.is_markdown);
        assert!(ChatMessage::assistant_html("<p>x</p>").is_markdown);
    }
}
