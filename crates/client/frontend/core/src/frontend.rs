//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;
use kot_runtime::RuntimeHandle;

/// Frontend abstraction for UI layers.
///
/// Frontends talk to the session via [`RuntimeHandle`]:
/// - Subscribe to events (Session, Workflow, Listing)
/// - Submit connect / switch / mint / update commands
/// - Query the current session and listing
///
/// Frontends do NOT own the Runtime; they receive a handle for communication only.
///
/// # Example Implementation
///
/// ```no_run
/// use async_trait::async_trait;
/// use kot_frontend_core::Frontend;
/// use kot_runtime::{RuntimeHandle, Topic};
/// use anyhow::Result;
///
/// struct MyFrontend;
///
/// #[async_trait]
/// impl Frontend for MyFrontend {
///     async fn run(&mut self, handle: RuntimeHandle) -> Result<()> {
///         let mut events = handle.subscribe(Topic::Workflow);
///         while let Ok(event) = events.recv().await {
///             // Render progress
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend event loop until the user quits.
    async fn run(&mut self, handle: RuntimeHandle) -> Result<()>;
}
