//! Chat application module for interactive conversations with Gemini.
//!
//! This module provides a REPL chat interface built on top of the gemini-chat
//! client library. It supports:
//!
//! - A transcript that is reloaded on the next run
//! - Markdown rendering of replies
//! - Reserved words (`exit`, `save`, `clear`, `list models`) for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The context the remote model sees
//! - [`commands`]: Command parsing
//! - [`app`]: The command loop tying transcript, session and renderer together

mod app;
mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer, render_markdown};
pub use app::{ChatApp, Flow, print_models};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, resolve_api_key};
pub use session::ChatSession;
