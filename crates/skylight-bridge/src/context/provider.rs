use crate::error::ContextError;

use super::ContextDescriptor;

/// Platform seam for GPU context creation and destruction.
///
/// One provider is shared between the lifecycle and render threads: creation
/// runs on the render thread, while destruction executes on whichever thread
/// observed the teardown trigger. `Context: Send` is what makes the latter
/// legal.
pub trait ContextProvider: Send + Sync {
    /// The platform GPU context type.
    type Context: Send + 'static;

    /// Negotiates and creates a context according to `descriptor`.
    fn create_context(
        &self,
        descriptor: &ContextDescriptor,
    ) -> Result<Self::Context, ContextError>;

    /// Adapts a live context to new drawable dimensions.
    ///
    /// Invoked only on actual dimension changes. The default does nothing,
    /// for platforms whose contexts are size-independent.
    fn resize_context(&self, context: &mut Self::Context, width: u32, height: u32) {
        let _ = (context, width, height);
    }

    /// Destroys a context previously created by this provider.
    fn destroy_context(&self, context: Self::Context);
}
