use crate::controller::{Notice, Request, Session, execute};
use crate::transport::Transport;
use crate::types::{ChatMessage, Role, SelectedFile};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Transport shared with every view through context.
#[derive(Clone)]
pub struct Backend(pub Arc<dyn Transport>);

fn role_class(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn picked_name(raw: &str) -> String {
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw)
        .to_string()
}

fn dispatch(backend: Backend, mut session: Signal<Session>, request: Request) {
    spawn(async move {
        let completion = execute(backend.0.as_ref(), request).await;
        session.with_mut(|state| {
            state.apply(completion);
        });
    });
}

fn report(mut notice: Signal<Option<Notice>>, result: Result<Request, Notice>) -> Option<Request> {
    match result {
        Ok(request) => {
            notice.set(None);
            Some(request)
        }
        Err(rejected) => {
            notice.set(Some(rejected));
            None
        }
    }
}

fn submit_question(backend: Backend, mut session: Signal<Session>, notice: Signal<Option<Notice>>) {
    let result = session.with_mut(|state| state.ask());
    if let Some(request) = report(notice, result) {
        dispatch(backend, session, request);
    }
}

#[component]
pub fn ChatView() -> Element {
    let backend = use_context::<Backend>();
    let mut session = use_signal(Session::new);
    let mut notice = use_signal(|| Option::<Notice>::None);

    let state = session.read();
    let messages: Vec<ChatMessage> = state.messages().to_vec();
    let file_name = state.uploaded_file_name().to_string();
    let has_document = state.current_document_id().is_some();
    let stats = state.document_stats().cloned();
    let uploading = state.is_uploading();
    let asking = state.is_asking();
    let question = state.current_question().to_string();
    drop(state);

    let upload_backend = backend.clone();
    let on_file = move |ev: Event<FormData>| {
        let Some(engine) = ev.files() else {
            notice.set(Some(Notice::NotPdf));
            return;
        };
        let Some(raw_name) = engine.files().into_iter().next() else {
            notice.set(Some(Notice::NotPdf));
            return;
        };
        let backend = upload_backend.clone();
        spawn(async move {
            let Some(bytes) = engine.read_file(&raw_name).await else {
                tracing::warn!(file = %raw_name, "could not read picked file");
                notice.set(Some(Notice::NoFileStaged));
                return;
            };
            let file = SelectedFile::from_name(picked_name(&raw_name), bytes);
            let result = session.with_mut(|state| state.select_file(file));
            if let Some(request) = report(notice, result) {
                dispatch(backend, session, request);
            }
        });
    };

    let placeholder = if has_document {
        "Ask a question about the document"
    } else {
        "Upload a PDF to start"
    };
    let enter_backend = backend.clone();
    let click_backend = backend.clone();

    rsx! {
        div { class: "main-container",
            div { class: "doc-bar",
                label { class: "btn btn-primary",
                    if uploading { "Uploading…" } else { "Upload PDF" }
                    input {
                        r#type: "file",
                        accept: ".pdf,application/pdf",
                        disabled: uploading,
                        style: "display: none;",
                        onchange: on_file,
                    }
                }
                if has_document {
                    div { class: "doc-info",
                        span { class: "doc-name", "{file_name}" }
                        if let Some(stats) = stats.as_ref() {
                            span { class: "doc-stats",
                                "{stats.total_chunks} chunks • {stats.document_length} chars"
                            }
                        }
                    }
                    button {
                        class: "btn btn-ghost", r#type: "button",
                        onclick: move |_| {
                            notice.set(None);
                            session.with_mut(|state| state.clear_document());
                        },
                        "Clear"
                    }
                }
            }

            if let Some(current) = notice() {
                div { class: "notice",
                    span { "{current}" }
                    button { class: "action-btn", r#type: "button", onclick: move |_| notice.set(None), "Dismiss" }
                }
            }

            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    for msg in messages.iter() {
                        div { key: "{msg.id}", class: format_args!("message-row {}", role_class(msg.role)),
                            div { class: "message-stack",
                                div { class: format_args!("bubble {}", role_class(msg.role)),
                                    if msg.is_markdown {
                                        div { class: "md", dangerous_inner_html: "{msg.content}" }
                                    } else {
                                        "{msg.content}"
                                    }
                                }
                                div { class: format_args!(
                                        "message-meta {}",
                                        match msg.role { Role::User => "align-end", Role::Assistant => "align-start" }
                                    ),
                                    span { class: "message-timestamp", "{msg.display_time()}" }
                                }
                            }
                        }
                    }
                    if asking {
                        div { class: "shimmer-line",
                            span { class: "shimmer-text", "Thinking…" }
                        }
                    }
                }
            }

            form { class: "composer",
                onsubmit: move |ev| ev.prevent_default(),
                div { class: "composer-inner",
                    textarea {
                        rows: "1",
                        placeholder,
                        value: "{question}",
                        disabled: asking,
                        oninput: move |ev| session.with_mut(|state| state.set_question(ev.value())),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                submit_question(enter_backend.clone(), session, notice);
                            }
                        },
                    }
                    button {
                        class: "btn btn-primary", r#type: "button",
                        disabled: asking || question.trim().is_empty(),
                        onclick: move |_| submit_question(click_backend.clone(), session, notice),
                        "Ask"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_name_strips_directories() {
        assert_eq!(picked_name("/home/me/docs/invoice.pdf"), "invoice.pdf");
        assert_eq!(picked_name("invoice.pdf"), "invoice.pdf");
    }
}
