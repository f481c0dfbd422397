use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::context::{ContextDescriptor, ContextFactory, ContextProvider};
use crate::engine::{EngineHandle, RenderEngine};

use super::TeardownOutcome;

/// One live context generation.
///
/// Pairs the platform context with the engine handle bound to it, plus the
/// bookkeeping the dispatcher needs between callbacks.
pub(crate) struct Generation<C> {
    pub context: C,
    pub handle: EngineHandle,

    /// Monotonic index of this generation within its bridge, for logs.
    pub index: u64,

    /// Last dimensions forwarded to the engine, for duplicate suppression.
    pub last_size: Option<(u32, u32)>,
}

/// Attachment status of the bridge's view.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Attachment {
    /// Constructed, not yet placed in a hierarchy.
    Initial,
    /// Placed in a hierarchy; surface notifications are accepted.
    Attached,
    /// Removed from the hierarchy. Terminal.
    Detached,
}

/// Mutable half of the shared state, behind the slot mutex.
pub(crate) struct Slot<C> {
    pub attachment: Attachment,
    pub generation: Option<Generation<C>>,
}

/// State shared between the lifecycle endpoint and the render endpoint.
pub(crate) struct Shared<P: ContextProvider> {
    pub factory: ContextFactory<P>,
    pub engine: Arc<dyn RenderEngine>,
    pub descriptor: ContextDescriptor,
    slot: Mutex<Slot<P::Context>>,
    generations: AtomicU64,
}

impl<P: ContextProvider> Shared<P> {
    pub fn new(provider: P, engine: Arc<dyn RenderEngine>, descriptor: ContextDescriptor) -> Self {
        Self {
            factory: ContextFactory::new(provider, engine.clone()),
            engine,
            descriptor,
            slot: Mutex::new(Slot {
                attachment: Attachment::Initial,
                generation: None,
            }),
            generations: AtomicU64::new(0),
        }
    }

    /// Locks the slot, recovering from poisoning.
    ///
    /// A panic inside an engine callback leaves the slot data coherent
    /// (every mutation completes before the lock is released), so teardown
    /// keeps working afterwards.
    pub fn lock(&self) -> MutexGuard<'_, Slot<P::Context>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next generation index for this bridge.
    pub fn next_generation_index(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed)
    }

    /// Destroys the live generation, if any, with the slot already locked.
    ///
    /// Engine resources go first, then the context. Callers decide how loud
    /// an `AlreadyClear` should be.
    pub fn teardown_locked(&self, slot: &mut Slot<P::Context>) -> TeardownOutcome {
        match slot.generation.take() {
            Some(generation) => {
                log::info!(
                    "tearing down context generation {} ({})",
                    generation.index,
                    generation.handle
                );
                self.factory
                    .destroy_context(generation.context, generation.handle);
                TeardownOutcome::Destroyed
            }
            None => TeardownOutcome::AlreadyClear,
        }
    }
}
