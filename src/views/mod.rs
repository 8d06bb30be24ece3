pub mod chat;

pub use chat::{Backend, ChatView};
