use std::sync::Arc;

use crate::context::ContextProvider;
use crate::engine::EngineHandle;
use crate::error::CreateContextError;

use super::shared::{Attachment, Generation, Shared};
use super::{DispatchOutcome, TeardownOutcome};

/// Render-thread endpoint of a surface bridge.
///
/// The platform's render callback mechanism feeds this the created, resized,
/// and draw notifications. Each call resolves the current engine handle
/// under the slot lock and passes it to the engine explicitly; the handle is
/// never cached across calls, since it may be invalidated between any two of
/// them.
pub struct RenderDispatcher<P: ContextProvider> {
    shared: Arc<Shared<P>>,
}

impl<P: ContextProvider> RenderDispatcher<P> {
    pub(super) fn new(shared: Arc<Shared<P>>) -> Self {
        Self { shared }
    }

    /// Handles the platform's surface-created notification.
    ///
    /// Negotiates a fresh context generation and performs the engine's
    /// first-time setup while still holding the slot lock, so no draw call
    /// can observe the generation before its setup ran. A generation that is
    /// still live at this point was lost without notification; it is torn
    /// down first and a fresh one, with a distinct handle, replaces it.
    pub fn surface_created(&self) -> Result<EngineHandle, CreateContextError> {
        let mut slot = self.shared.lock();

        if slot.attachment != Attachment::Attached {
            log::error!("surface-created notification outside the attach window");
            return Err(CreateContextError::Detached);
        }

        if slot.generation.is_some() {
            log::warn!("surface re-created over a live context; treating the old one as lost");
            self.shared.teardown_locked(&mut slot);
        }

        let (context, handle) = self.shared.factory.create_context(&self.shared.descriptor)?;
        let index = self.shared.next_generation_index();

        slot.generation = Some(Generation {
            context,
            handle,
            index,
            last_size: None,
        });

        self.shared.engine.on_surface_created(handle);
        log::info!("context generation {index} live as {handle}");

        Ok(handle)
    }

    /// Forwards a drawable dimension change.
    ///
    /// The platform context adapts first (swapchain reconfigure), then the
    /// engine is told. Consecutive identical dimensions are dropped, which
    /// also keeps the engine-side idempotence requirement trivially true.
    pub fn surface_resized(&self, width: u32, height: u32) -> DispatchOutcome {
        let mut slot = self.shared.lock();

        let Some(generation) = slot.generation.as_mut() else {
            log::debug!("resize to {width}x{height} ignored: no live context");
            return DispatchOutcome::Stale;
        };

        if generation.last_size == Some((width, height)) {
            return DispatchOutcome::Unchanged;
        }
        generation.last_size = Some((width, height));

        self.shared
            .factory
            .resize_context(&mut generation.context, width, height);
        self.shared
            .engine
            .on_surface_resized(generation.handle, width, height);

        log::debug!("surface resized to {width}x{height} for {}", generation.handle);
        DispatchOutcome::Delivered
    }

    /// Forwards one display refresh tick.
    ///
    /// With no live handle this is a safely ignorable no-op: a teardown that
    /// races this call blocks on the slot lock until the frame returns, and
    /// a tick arriving after teardown finds the slot empty.
    pub fn draw_frame(&self) -> DispatchOutcome {
        let slot = self.shared.lock();

        let Some(generation) = slot.generation.as_ref() else {
            log::trace!("draw tick ignored: no live context");
            return DispatchOutcome::Stale;
        };

        self.shared.engine.on_draw_frame(generation.handle);
        DispatchOutcome::Delivered
    }

    /// Handles platform-initiated context loss observed on the render thread.
    ///
    /// Same teardown as the lifecycle thread's surface-destroyed path; the
    /// platform is expected to follow up with a surface-created notification
    /// once a drawable is available again.
    pub fn context_lost(&self) -> TeardownOutcome {
        let mut slot = self.shared.lock();
        let outcome = self.shared.teardown_locked(&mut slot);
        if outcome == TeardownOutcome::Destroyed {
            log::warn!("context lost");
        }
        outcome
    }
}
