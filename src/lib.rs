//! Edris is a terminal-first chat client for the Edris assistant backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the chat session controller, knowledge
//!   stacks, preferences, and the query transport service.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop (mode tags, knowledge stacks, appearance).
//! - [`api`] defines the wire payloads exchanged with the backend's
//!   `/query` and `/knowledge/upload` endpoints.
//!
//! The runtime entrypoint lives in the binary crate (`src/main.rs`), which
//! parses arguments and dispatches into [`ui::chat_loop`] for interactive
//! sessions.

pub mod api;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
