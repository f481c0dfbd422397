//! Error taxonomy for the creation path.
//!
//! Only context creation can fail in a way the caller must handle. The two
//! recoverable races (a render callback arriving after teardown, a teardown
//! request with nothing live) are reported as outcomes by the bridge module,
//! not as errors.

use thiserror::Error;

/// The platform could not negotiate a GPU context.
///
/// Carries the provider's error chain as source. The bridge does not
/// interpret it; the shell may retry on the next attach or show a fallback.
#[derive(Debug, Error)]
#[error("context negotiation failed: {0}")]
pub struct ContextError(#[from] anyhow::Error);

impl ContextError {
    /// Convenience constructor for providers without a richer error chain.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(message.into()))
    }
}

/// Engine-side resource setup failed after the context was created.
///
/// The factory destroys the just-created context before surfacing this, so
/// a failed creation leaves no orphaned resources behind.
#[derive(Debug, Error)]
#[error("engine initialization failed: {0}")]
pub struct EngineInitError(#[from] anyhow::Error);

impl EngineInitError {
    /// Convenience constructor for engines without a richer error chain.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(message.into()))
    }
}

/// Why a surface-created notification failed to produce a live context.
#[derive(Debug, Error)]
pub enum CreateContextError {
    /// Context negotiation failed; nothing was created.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The engine rejected the new context; the context was rolled back.
    #[error(transparent)]
    EngineInit(#[from] EngineInitError),

    /// The notification arrived outside the attach window.
    #[error("surface notification received while the bridge is detached")]
    Detached,
}
