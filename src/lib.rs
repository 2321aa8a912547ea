//! Penpal is a desktop companion chat client for locally hosted language models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns contacts and their conversation history, persona handling,
//!   layered prompt construction, content validation, and the chat session
//!   orchestrator that drives one exchange with the inference server.
//! - [`api`] defines the wire payloads and the HTTP client for the
//!   Ollama-style inference endpoint.
//! - [`cli`] parses command-line arguments and runs the interactive chat loop
//!   plus the model/persona listing commands.
//! - [`utils`] carries small shared helpers (URL normalization, id minting).
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes logging and dispatches into
//! [`core::session`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
