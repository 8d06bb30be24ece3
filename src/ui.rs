use crate::config::Config;
use crate::transport::HttpTransport;
use crate::views::{Backend, ChatView};
use dioxus::prelude::*;
use std::sync::Arc;

const APP_CSS: &str = r#"
:root {
    --color-bg-primary: #000000;
    --color-text-primary: #ffffff;
    --color-text-muted: #cfcfcf;
    --color-border: #2a2a2a;
    --color-surface-muted: #111111;
    --color-chat-user-bg: #ffffff;
    --color-chat-user-text: #000000;
    --color-chat-assistant-bg: #0b0b0b;
    --color-chat-assistant-text: #ffffff;
    --color-notice-bg: #3a1204;
    --color-timestamp: #9b9b9b;
    --color-accent: #ff3509;
}
body { margin: 0; font-family: system-ui, sans-serif; background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { padding: 0.75rem 1rem; border-bottom: 1px solid var(--color-border); }
.header h1 { margin: 0; font-size: 1.1rem; }
.main-container { display: flex; flex-direction: column; height: calc(100vh - 3rem); }
.doc-bar { display: flex; gap: 0.75rem; align-items: center; padding: 0.75rem 1rem; }
.doc-info { display: flex; flex-direction: column; }
.doc-stats { color: var(--color-text-muted); font-size: 0.8rem; }
.notice { display: flex; justify-content: space-between; margin: 0 1rem; padding: 0.5rem 0.75rem; background: var(--color-notice-bg); border-radius: 6px; }
.chat-wrap { flex: 1; overflow-y: auto; padding: 1rem; }
.message-row { display: flex; margin-bottom: 0.75rem; }
.message-row.user { justify-content: flex-end; }
.message-stack { max-width: 75%; }
.bubble { padding: 0.6rem 0.8rem; border-radius: 10px; white-space: pre-wrap; }
.bubble.user { background: var(--color-chat-user-bg); color: var(--color-chat-user-text); }
.bubble.assistant { background: var(--color-chat-assistant-bg); color: var(--color-chat-assistant-text); border: 1px solid var(--color-border); }
.bubble .md { white-space: normal; }
.message-meta { font-size: 0.75rem; color: var(--color-timestamp); margin-top: 0.2rem; }
.message-meta.align-end { text-align: right; }
.shimmer-text { color: var(--color-accent); }
.composer { border-top: 1px solid var(--color-border); padding: 0.75rem 1rem; }
.composer-inner { display: flex; gap: 0.5rem; align-items: flex-end; }
.composer textarea { flex: 1; resize: none; background: var(--color-surface-muted); color: var(--color-text-primary); border: 1px solid var(--color-border); border-radius: 6px; padding: 0.5rem; }
.btn { cursor: pointer; border: 1px solid var(--color-border); border-radius: 6px; padding: 0.45rem 0.9rem; background: transparent; color: var(--color-text-primary); }
.btn-primary { border-color: var(--color-accent); }
.btn:disabled { opacity: 0.5; cursor: default; }
.action-btn { background: none; border: none; color: var(--color-text-muted); cursor: pointer; }
"#;

#[component]
pub fn App() -> Element {
    use_context_provider(|| {
        let config = Config::from_env();
        tracing::debug!(backend = %config.backend_url, "using document QA backend");
        Backend(Arc::new(HttpTransport::new(config.backend_url)))
    });

    rsx! {
        style { dangerous_inner_html: APP_CSS }
        div { class: "header no-divider",
            h1 { "Document Q&A" }
        }
        ChatView {}
    }
}
