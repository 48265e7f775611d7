//! Public runtime API surface.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError, WorkflowError};
pub use handle::RuntimeHandle;
