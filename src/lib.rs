//! Client for a remote chatbot reachable at `POST {base_url}/chatbot`.

pub mod config;
pub mod error;
pub mod message;
pub mod repl;
pub mod services;

pub use config::ClientConfig;
pub use error::{ChatError, ConfigError};
pub use message::{ChatRequest, ChatResponse, Message, MessageRole};
pub use services::chatbot::{CHATBOT_PATH, ChatApi, ChatApiClient};
pub use services::session::ChatSession;
