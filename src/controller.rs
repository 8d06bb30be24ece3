//! Conversation state and the transitions that drive it.
//!
//! [`Session`] is plain data plus synchronous update methods. Methods that need
//! the backend hand back a [`Request`]; the caller runs it with [`execute`] and
//! feeds the resulting [`Completion`] into [`Session::apply`]. The view layer
//! owns the async side, so every transition here is testable without a runtime.
//!
//! Requests carry a [`Ticket`]. Clearing the document or loading a new one
//! starts a new generation, and completions from an older generation are
//! dropped instead of leaking into the fresh transcript.

use crate::markdown::markdown_to_html;
use crate::transport::{Transport, TransportResult};
use crate::types::{AskResponse, ChatMessage, SelectedFile, UploadResponse};

pub const UPLOAD_ERROR_TEXT: &str =
    "Error uploading document. Please check your connection and try again.";
pub const ASK_ERROR_TEXT: &str = "Error getting answer. Please try again.";

pub fn welcome_text(file_name: &str) -> String {
    format!(
        "Document \"{file_name}\" uploaded successfully! You can now ask questions about its content."
    )
}

/// A rejected user action. Nothing in the session changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Notice {
    #[error("Please select a PDF file")]
    NotPdf,

    #[error("Please select a file first")]
    NoFileStaged,

    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Please upload a document first")]
    NoDocument,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    generation: u64,
}

/// Outbound work produced by a session transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Upload {
        ticket: Ticket,
        file: SelectedFile,
    },
    Ask {
        ticket: Ticket,
        question: String,
        doc_id: String,
    },
}

impl Request {
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::Upload { ticket, .. } | Request::Ask { ticket, .. } => *ticket,
        }
    }
}

/// The single result of running a [`Request`].
#[derive(Debug)]
pub enum Completion {
    Upload {
        ticket: Ticket,
        file_name: String,
        result: TransportResult<UploadResponse>,
    },
    Ask {
        ticket: Ticket,
        result: TransportResult<AskResponse>,
    },
}

/// Run one request against the backend. Resolves exactly once.
pub async fn execute(transport: &dyn Transport, request: Request) -> Completion {
    match request {
        Request::Upload { ticket, file } => {
            let result = transport.upload_document(&file).await;
            Completion::Upload {
                ticket,
                file_name: file.name,
                result,
            }
        }
        Request::Ask {
            ticket,
            question,
            doc_id,
        } => {
            let result = transport.ask_question(&question, &doc_id).await;
            Completion::Ask { ticket, result }
        }
    }
}

/// Backend-reported facts about the active document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentStats {
    pub message: String,
    pub total_chunks: u64,
    pub document_length: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    messages: Vec<ChatMessage>,
    current_question: String,
    pending_file: Option<SelectedFile>,
    current_document_id: Option<String>,
    uploaded_file_name: String,
    document_stats: Option<DocumentStats>,
    uploads_in_flight: usize,
    asks_in_flight: usize,
    latest_upload: Option<u64>,
    generation: u64,
    next_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn current_question(&self) -> &str {
        &self.current_question
    }

    pub fn pending_file(&self) -> Option<&SelectedFile> {
        self.pending_file.as_ref()
    }

    pub fn current_document_id(&self) -> Option<&str> {
        self.current_document_id.as_deref()
    }

    pub fn uploaded_file_name(&self) -> &str {
        &self.uploaded_file_name
    }

    pub fn document_stats(&self) -> Option<&DocumentStats> {
        self.document_stats.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads_in_flight > 0
    }

    pub fn is_asking(&self) -> bool {
        self.asks_in_flight > 0
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket {
            seq: self.next_seq,
            generation: self.generation,
        }
    }

    /// Stage a picked file and start uploading it right away.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<Request, Notice> {
        if !file.is_pdf() {
            tracing::debug!(name = %file.name, media_type = %file.media_type, "rejected non-PDF file");
            return Err(Notice::NotPdf);
        }
        self.pending_file = Some(file);
        self.upload_staged()
    }

    /// Issue an upload for the staged file.
    pub fn upload_staged(&mut self) -> Result<Request, Notice> {
        let file = self.pending_file.clone().ok_or(Notice::NoFileStaged)?;
        let ticket = self.issue_ticket();
        self.latest_upload = Some(ticket.seq);
        self.uploads_in_flight += 1;
        tracing::debug!(name = %file.name, bytes = file.bytes.len(), "upload issued");
        Ok(Request::Upload { ticket, file })
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.current_question = question.into();
    }

    /// Append the current question to the transcript and issue it.
    pub fn ask(&mut self) -> Result<Request, Notice> {
        if self.current_question.trim().is_empty() {
            return Err(Notice::EmptyQuestion);
        }
        let doc_id = self.current_document_id.clone().ok_or(Notice::NoDocument)?;
        let question = self.current_question.clone();

        self.messages.push(ChatMessage::user(question.clone()));
        let ticket = self.issue_ticket();
        self.asks_in_flight += 1;
        tracing::debug!(%doc_id, "question issued");
        Ok(Request::Ask {
            ticket,
            question,
            doc_id,
        })
    }

    /// Forget the active document and transcript. Requests still in flight
    /// complete but no longer touch the transcript.
    pub fn clear_document(&mut self) {
        self.current_document_id = None;
        self.uploaded_file_name.clear();
        self.document_stats = None;
        self.pending_file = None;
        self.messages.clear();
        self.current_question.clear();
        self.latest_upload = None;
        self.generation += 1;
    }

    /// Route a completion to its handler. Returns `false` when it was stale.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Upload {
                ticket,
                file_name,
                result,
            } => self.complete_upload(ticket, &file_name, result),
            Completion::Ask { ticket, result } => self.complete_ask(ticket, result),
        }
    }

    /// Results of a superseded or cleared upload are discarded silently, success or failure.
    pub fn complete_upload(
        &mut self,
        ticket: Ticket,
        file_name: &str,
        result: TransportResult<UploadResponse>,
    ) -> bool {
        self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
        if self.latest_upload != Some(ticket.seq) {
            tracing::debug!(file_name, "dropping superseded upload result");
            return false;
        }
        self.latest_upload = None;
        self.pending_file = None;

        match result {
            Ok(response) => {
                tracing::info!(
                    doc_id = %response.doc_id,
                    chunks = response.total_chunks,
                    length = response.document_length,
                    "document uploaded"
                );
                self.generation += 1;
                self.current_document_id = Some(response.doc_id);
                self.uploaded_file_name = file_name.to_string();
                self.document_stats = Some(DocumentStats {
                    message: response.message,
                    total_chunks: response.total_chunks,
                    document_length: response.document_length,
                });
                self.messages.clear();
                self.messages.push(ChatMessage::assistant(welcome_text(file_name)));
            }
            Err(err) => {
                tracing::warn!(file_name, error = %err, "upload failed");
                self.messages.push(ChatMessage::assistant(UPLOAD_ERROR_TEXT));
            }
        }
        true
    }

    pub fn complete_ask(&mut self, ticket: Ticket, result: TransportResult<AskResponse>) -> bool {
        self.asks_in_flight = self.asks_in_flight.saturating_sub(1);
        if ticket.generation != self.generation {
            tracing::debug!("dropping answer for a cleared session");
            return false;
        }

        match result {
            Ok(response) => {
                if let Some(doc_id) = response.doc_id.as_deref()
                    && Some(doc_id) != self.current_document_id.as_deref()
                {
                    tracing::debug!(doc_id, "answer names a different document");
                }
                let html = markdown_to_html(&response.answer);
                self.messages.push(ChatMessage::assistant_html(html));
                self.current_question.clear();
            }
            Err(err) => {
                tracing::warn!(error = %err, "ask failed");
                self.messages.push(ChatMessage::assistant(ASK_ERROR_TEXT));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, "application/pdf", b"%PDF-1.4".to_vec())
    }

    fn uploaded(doc_id: &str) -> UploadResponse {
        UploadResponse {
            message: "ok".to_string(),
            doc_id: doc_id.to_string(),
            total_chunks: 1,
            document_length: 10,
        }
    }

    fn expect_upload(request: Request) -> (Ticket, SelectedFile) {
        match request {
            Request::Upload { ticket, file } => (ticket, file),
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.messages().is_empty());
        assert!(session.current_document_id().is_none());
        assert!(!session.is_uploading());
        assert!(!session.is_asking());
    }

    #[test]
    fn test_select_file_issues_upload_and_sets_busy() {
        let mut session = Session::new();
        let (_, file) = expect_upload(session.select_file(pdf("a.pdf")).unwrap());
        assert_eq!(file.name, "a.pdf");
        assert!(session.is_uploading());
        assert_eq!(session.pending_file().map(|f| f.name.as_str()), Some("a.pdf"));
    }

    #[test]
    fn test_upload_staged_without_file() {
        let mut session = Session::new();
        assert_eq!(session.upload_staged(), Err(Notice::NoFileStaged));
        assert!(!session.is_uploading());
    }

    #[test]
    fn test_welcome_names_the_file() {
        let mut session = Session::new();
        let (ticket, file) = expect_upload(session.select_file(pdf("report.pdf")).unwrap());
        assert!(session.complete_upload(ticket, &file.name, Ok(uploaded("d1"))));

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, welcome_text("report.pdf"));
        assert_eq!(session.uploaded_file_name(), "report.pdf");
        assert_eq!(session.document_stats().map(|s| s.total_chunks), Some(1));
    }

    #[test]
    fn test_superseded_upload_is_dropped() {
        let mut session = Session::new();
        let (first, _) = expect_upload(session.select_file(pdf("one.pdf")).unwrap());
        let (second, _) = expect_upload(session.select_file(pdf("two.pdf")).unwrap());

        assert!(session.complete_upload(second, "two.pdf", Ok(uploaded("D2"))));
        assert!(!session.complete_upload(first, "one.pdf", Ok(uploaded("D1"))));
        assert_eq!(session.current_document_id(), Some("D2"));
        assert!(!session.is_uploading());
    }

    #[test]
    fn test_superseded_upload_failure_adds_no_message() {
        let mut session = Session::new();
        let (first, _) = expect_upload(session.select_file(pdf("a.pdf")).unwrap());
        let (second, _) = expect_upload(session.select_file(pdf("b.pdf")).unwrap());

        let failed = Err(crate::transport::TransportError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        });
        assert!(!session.complete_upload(first, "a.pdf", failed));
        assert!(session.messages().is_empty());
        assert!(session.is_uploading());

        assert!(session.complete_upload(second, "b.pdf", Ok(uploaded("D2"))));
        let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec![welcome_text("b.pdf").as_str()]);
        assert!(!contents.contains(&UPLOAD_ERROR_TEXT));
    }

    #[test]
    fn test_ticket_sequence_increases() {
        let mut session = Session::new();
        let a = session.select_file(pdf("a.pdf")).unwrap().ticket();
        let b = session.select_file(pdf("b.pdf")).unwrap().ticket();
        assert!(b.seq > a.seq);
        assert_eq!(a.generation, b.generation);
    }
}
