use std::sync::Arc;

use crate::context::{ContextDescriptor, ContextProvider};
use crate::engine::{EngineHandle, RenderEngine};

use super::dispatcher::RenderDispatcher;
use super::shared::{Attachment, Shared};
use super::{LifecyclePhase, TeardownOutcome};

/// Lifecycle-thread endpoint, bound to one platform view instance.
///
/// The bridge exclusively owns at most one engine handle at a time. The
/// handle is created when the GPU context is (re)created and destroyed with
/// it, which can happen several times across this object's life: context
/// loss followed by recreation yields a fresh generation with a distinct
/// handle.
pub struct SurfaceBridge<P: ContextProvider> {
    shared: Arc<Shared<P>>,
}

impl<P: ContextProvider> SurfaceBridge<P> {
    /// Creates a detached bridge for one view instance.
    pub fn new(provider: P, engine: Arc<dyn RenderEngine>, descriptor: ContextDescriptor) -> Self {
        Self {
            shared: Arc::new(Shared::new(provider, engine, descriptor)),
        }
    }

    /// Returns the render-thread endpoint.
    ///
    /// The platform's render callback mechanism should own this and feed it
    /// the created/resized/draw notifications.
    pub fn dispatcher(&self) -> RenderDispatcher<P> {
        RenderDispatcher::new(self.shared.clone())
    }

    /// Marks the view as placed in the hierarchy.
    ///
    /// Surface notifications are accepted only between `attach` and
    /// [`detach`](Self::detach). Attaching a detached bridge is a logic
    /// error; a new view gets a new bridge.
    pub fn attach(&self) {
        let mut slot = self.shared.lock();
        match slot.attachment {
            Attachment::Initial => {
                slot.attachment = Attachment::Attached;
                log::info!("surface bridge attached");
            }
            Attachment::Attached => log::warn!("attach ignored: already attached"),
            Attachment::Detached => log::error!("attach ignored: bridge is permanently detached"),
        }
    }

    /// Handles the platform's surface-destroyed notification.
    ///
    /// Blocks until any in-flight render callback for the current handle has
    /// returned, destroys the engine resources and then the context, and
    /// clears the slot. With nothing live this is a reported no-op.
    pub fn surface_destroyed(&self) -> TeardownOutcome {
        let mut slot = self.shared.lock();
        let outcome = self.shared.teardown_locked(&mut slot);
        if outcome == TeardownOutcome::AlreadyClear {
            log::warn!("surface destroyed with no live context");
        }
        outcome
    }

    /// Removes the view from the hierarchy. Terminal.
    ///
    /// Performs the same teardown as [`Self::surface_destroyed`] first if a
    /// generation is still live.
    pub fn detach(&self) -> TeardownOutcome {
        let mut slot = self.shared.lock();
        let outcome = self.shared.teardown_locked(&mut slot);
        slot.attachment = Attachment::Detached;
        log::info!("surface bridge detached");
        outcome
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        let slot = self.shared.lock();
        match slot.attachment {
            Attachment::Initial | Attachment::Detached => LifecyclePhase::Detached,
            Attachment::Attached if slot.generation.is_some() => LifecyclePhase::ContextLive,
            Attachment::Attached => LifecyclePhase::NoContext,
        }
    }

    /// Handle of the live generation, if any.
    ///
    /// Read under the slot lock: the value is either fully valid at the time
    /// of the read or absent, never in between.
    pub fn current_handle(&self) -> Option<EngineHandle> {
        self.shared.lock().generation.as_ref().map(|g| g.handle)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ContextError, EngineInitError};

    use super::*;

    struct NullProvider;

    impl ContextProvider for NullProvider {
        type Context = ();

        fn create_context(&self, _d: &ContextDescriptor) -> Result<(), ContextError> {
            Ok(())
        }

        fn destroy_context(&self, _context: ()) {}
    }

    struct NullEngine(crate::engine::HandleAllocator);

    impl NullEngine {
        fn shared() -> Arc<Self> {
            Arc::new(Self(crate::engine::HandleAllocator::new()))
        }
    }

    impl RenderEngine for NullEngine {
        fn create_context_resources(
            &self,
            _d: &ContextDescriptor,
        ) -> Result<EngineHandle, EngineInitError> {
            Ok(self.0.mint())
        }

        fn destroy_context_resources(&self, _handle: EngineHandle) {}
        fn on_surface_created(&self, _handle: EngineHandle) {}
        fn on_surface_resized(&self, _handle: EngineHandle, _w: u32, _h: u32) {}
        fn on_draw_frame(&self, _handle: EngineHandle) {}
    }

    fn bridge() -> SurfaceBridge<NullProvider> {
        SurfaceBridge::new(
            NullProvider,
            NullEngine::shared(),
            ContextDescriptor::default(),
        )
    }

    // ── phases ────────────────────────────────────────────────────────────

    #[test]
    fn starts_detached() {
        assert_eq!(bridge().phase(), LifecyclePhase::Detached);
    }

    #[test]
    fn attach_enters_no_context() {
        let b = bridge();
        b.attach();
        assert_eq!(b.phase(), LifecyclePhase::NoContext);
        assert_eq!(b.current_handle(), None);
    }

    #[test]
    fn created_surface_enters_context_live() {
        let b = bridge();
        b.attach();
        let handle = b.dispatcher().surface_created().unwrap();
        assert_eq!(b.phase(), LifecyclePhase::ContextLive);
        assert_eq!(b.current_handle(), Some(handle));
    }

    #[test]
    fn detach_is_terminal() {
        let b = bridge();
        b.attach();
        b.detach();
        assert_eq!(b.phase(), LifecyclePhase::Detached);

        // Attach after detach stays detached.
        b.attach();
        assert_eq!(b.phase(), LifecyclePhase::Detached);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn destroy_without_context_reports_already_clear() {
        let b = bridge();
        b.attach();
        assert_eq!(b.surface_destroyed(), TeardownOutcome::AlreadyClear);
    }

    #[test]
    fn detach_tears_down_a_live_generation() {
        let b = bridge();
        b.attach();
        b.dispatcher().surface_created().unwrap();
        assert_eq!(b.detach(), TeardownOutcome::Destroyed);
        assert_eq!(b.current_handle(), None);
    }
}
