//! Terminal UI frontend for the .kot name registry.
//!
//! This crate provides a terminal-based user interface implementing the
//! `kot_frontend_core::Frontend` trait.
//!
//! # Architecture
//!
//! CliFrontend is a pure UI layer that:
//! - Receives a RuntimeHandle for communication
//! - Does NOT own the Runtime
//! - Subscribes to events and submits commands via the handle

mod app;
mod config;
mod event;
mod feedback;
mod input;
pub mod logging;
pub mod presentation;
mod state;

pub use app::CliFrontend;
pub use config::{CliConfig, UiConfig};

// Re-export for convenience (used in main.rs)
pub use kot_frontend_core::FrontendConfig;
