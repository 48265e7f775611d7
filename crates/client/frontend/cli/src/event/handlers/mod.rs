//! Event loop handlers split by concern.
//!
//! - `input`: keyboard input and command dispatch
//! - `rendering`: UI rendering

mod input;
mod rendering;
