//! Event handling for CLI client.
//!
//! This module contains the event loop that coordinates runtime events,
//! user input, command replies, and UI updates.

mod handlers;
mod r#loop;

pub use r#loop::EventLoop;
