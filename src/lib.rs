//! Policy Navigator is a terminal client for an education-policy question
//! answering service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state, the session cache, configuration
//!   and the reducer that turns user and backend events into state changes.
//! - [`ui`] renders the full-screen terminal interface and runs the
//!   interactive event loop.
//! - [`api`] defines the backend's JSON payloads and the HTTP client behind
//!   the [`api::backend::PolicyBackend`] trait.
//! - [`cli`] parses arguments and hosts the one-shot subcommands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
