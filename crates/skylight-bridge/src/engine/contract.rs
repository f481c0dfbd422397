use crate::context::ContextDescriptor;
use crate::error::EngineInitError;

use super::EngineHandle;

/// Contract implemented by the externally-owned rendering engine.
///
/// Every entry point takes the handle explicitly; the engine must locate its
/// per-context resources through it rather than through any global. Calls
/// for one context generation are serialized by the bridge, but creation,
/// dispatch, and teardown may originate on different threads, hence the
/// `Send + Sync` bound.
pub trait RenderEngine: Send + Sync {
    /// Binds engine resources to a freshly negotiated GPU context.
    ///
    /// Returns the handle under which all further calls for this context
    /// generation address the engine. Failure is fatal to context creation
    /// as a whole; the factory destroys the context before reporting it.
    fn create_context_resources(
        &self,
        descriptor: &ContextDescriptor,
    ) -> Result<EngineHandle, EngineInitError>;

    /// Releases every engine resource bound to `handle`.
    ///
    /// Invoked while the paired GPU context still exists, since the engine
    /// may hold resources that can only be released while it does.
    fn destroy_context_resources(&self, handle: EngineHandle);

    /// First-time setup for this context generation.
    ///
    /// Ordered before any resize or draw call carrying the same handle.
    fn on_surface_created(&self, handle: EngineHandle);

    /// The drawable's pixel dimensions changed.
    ///
    /// Must be idempotent for repeated identical dimensions. The bridge
    /// additionally drops consecutive duplicates before they get here.
    fn on_surface_resized(&self, handle: EngineHandle, width: u32, height: u32);

    /// One display refresh tick.
    ///
    /// Must complete a full frame submission before returning; the platform
    /// may present immediately afterwards.
    fn on_draw_frame(&self, handle: EngineHandle);
}
