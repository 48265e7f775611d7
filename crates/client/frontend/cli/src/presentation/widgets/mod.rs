//! Widget modules for UI rendering.
//!
//! Each widget is a pure function that reads the ViewModel and renders to a
//! terminal frame without mutating anything.

pub mod footer;
pub mod header;
pub mod listing;
pub mod messages;
pub mod panel;
