use std::sync::Arc;

use crate::engine::{EngineHandle, RenderEngine};
use crate::error::CreateContextError;

use super::{ContextDescriptor, ContextProvider};

/// Creates and destroys GPU contexts with the engine handle in lock-step.
///
/// The factory is the only component that calls the engine's resource entry
/// points. A context without a handle, or a handle without a context, never
/// escapes it.
pub struct ContextFactory<P: ContextProvider> {
    provider: P,
    engine: Arc<dyn RenderEngine>,
}

impl<P: ContextProvider> ContextFactory<P> {
    pub fn new(provider: P, engine: Arc<dyn RenderEngine>) -> Self {
        Self { provider, engine }
    }

    /// Negotiates a GPU context, then binds engine resources to it.
    ///
    /// If the engine rejects the new context, the context is destroyed
    /// before the error returns, so a failed creation leaves nothing behind.
    pub fn create_context(
        &self,
        descriptor: &ContextDescriptor,
    ) -> Result<(P::Context, EngineHandle), CreateContextError> {
        let context = self.provider.create_context(descriptor)?;

        match self.engine.create_context_resources(descriptor) {
            Ok(handle) => {
                log::info!("context negotiated, engine resources bound as {handle}");
                Ok((context, handle))
            }
            Err(e) => {
                log::error!("engine rejected the new context, rolling it back: {e}");
                self.provider.destroy_context(context);
                Err(e.into())
            }
        }
    }

    /// Destroys the engine resources, then the GPU context.
    ///
    /// Reverse of creation order: the engine may hold GPU resources that are
    /// only valid while the context exists.
    pub fn destroy_context(&self, context: P::Context, handle: EngineHandle) {
        self.engine.destroy_context_resources(handle);
        self.provider.destroy_context(context);
        log::info!("context destroyed, engine resources for {handle} released");
    }

    /// Adapts a live context to new drawable dimensions.
    pub fn resize_context(&self, context: &mut P::Context, width: u32, height: u32) {
        self.provider.resize_context(context, width, height);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::error::{ContextError, EngineInitError};

    use super::*;

    /// Provider that appends to a shared call log.
    struct LogProvider(Arc<Mutex<Vec<&'static str>>>);

    impl ContextProvider for LogProvider {
        type Context = ();

        fn create_context(&self, _d: &ContextDescriptor) -> Result<(), ContextError> {
            self.0.lock().unwrap().push("provider.create");
            Ok(())
        }

        fn destroy_context(&self, _context: ()) {
            self.0.lock().unwrap().push("provider.destroy");
        }
    }

    /// Engine that refuses every context, logging the attempt.
    struct RefusingEngine(Arc<Mutex<Vec<&'static str>>>);

    impl RenderEngine for RefusingEngine {
        fn create_context_resources(
            &self,
            _d: &ContextDescriptor,
        ) -> Result<EngineHandle, EngineInitError> {
            self.0.lock().unwrap().push("engine.create");
            Err(EngineInitError::msg("refused"))
        }

        fn destroy_context_resources(&self, _handle: EngineHandle) {
            self.0.lock().unwrap().push("engine.destroy");
        }

        fn on_surface_created(&self, _handle: EngineHandle) {}
        fn on_surface_resized(&self, _handle: EngineHandle, _w: u32, _h: u32) {}
        fn on_draw_frame(&self, _handle: EngineHandle) {}
    }

    #[test]
    fn engine_failure_rolls_the_context_back() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let factory = ContextFactory::new(
            LogProvider(calls.clone()),
            Arc::new(RefusingEngine(calls.clone())),
        );

        let result = factory.create_context(&ContextDescriptor::default());
        assert!(matches!(result, Err(CreateContextError::EngineInit(_))));

        // The context created before the engine refused must be gone by the
        // time the error surfaces.
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["provider.create", "engine.create", "provider.destroy"]
        );
    }
}
