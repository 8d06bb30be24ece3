//! Chat with a PDF through a document question-answering backend.
//!
//! The headless pieces (transport, session state, markdown rendering) build
//! without a UI toolkit. The Dioxus front end sits behind the `web`, `desktop`
//! and `mobile` features.

pub mod config;
pub mod controller;
pub mod logging;
pub mod markdown;
pub mod transport;
pub mod types;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;

pub use controller::{Completion, Notice, Request, Session, execute};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{AskResponse, ChatMessage, Role, SelectedFile, UploadResponse};
