//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns all session state; wallet prompts, transaction
//! sagas, and listing fetches run as spawned tasks that report back to it.

mod session;

pub use session::{Command, SessionWorker};
