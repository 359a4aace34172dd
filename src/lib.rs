//! # Loichao
//!
//! A TUI that suggests how to open a conversation, using Gemini.
//!
//! ## Features
//!
//! - **Structured Intelligence**: Returns a typed `ConversationSuggestion` with an opening line,
//!   an analysis, and the misunderstandings it could cause
//! - **Single-screen form**: Four inputs, one submit control, result cards rendered with ratatui
//! - **Explicit start-up**: A missing API key stops the program before the terminal is touched

pub mod agent;
pub mod app;
pub mod config;
pub mod form;
pub mod logging;
pub mod suggestion;
pub mod ui;

pub use agent::{AgentError, GeminiAgent, SuggestionClient};
pub use config::Config;
pub use form::{Field, FormController, FormInputs, RequestState};
pub use suggestion::ConversationSuggestion;
