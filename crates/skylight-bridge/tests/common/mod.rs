//! Shared doubles for the integration suites: an engine that records every
//! entry point in call order, and a platform provider whose contexts count
//! themselves while alive.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

use skylight_bridge::context::{ContextDescriptor, ContextProvider};
use skylight_bridge::engine::{EngineHandle, HandleAllocator, RenderEngine};
use skylight_bridge::error::{ContextError, EngineInitError};

/// Everything an engine implementation can observe, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CreateResources(EngineHandle),
    DestroyResources(EngineHandle),
    SurfaceCreated(EngineHandle),
    SurfaceResized(EngineHandle, u32, u32),
    DrawStart(EngineHandle),
    DrawEnd(EngineHandle),
}

/// Engine double: mints real handles and records every call.
///
/// A draw barrier can be armed to hold exactly one frame in flight: the next
/// `on_draw_frame` rendezvouses on it after `DrawStart`, then dwells briefly
/// before `DrawEnd`, giving another thread a window to race teardown against
/// the in-flight call.
pub struct RecordingEngine {
    allocator: HandleAllocator,
    events: Mutex<Vec<EngineEvent>>,
    draw_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            allocator: HandleAllocator::new(),
            events: Mutex::new(Vec::new()),
            draw_barrier: Mutex::new(None),
        })
    }

    /// Arms the one-shot draw barrier.
    pub fn arm_draw_barrier(&self, barrier: Arc<Barrier>) {
        *self.draw_barrier.lock().unwrap() = Some(barrier);
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Handles minted so far, in creation order.
    pub fn created_handles(&self) -> Vec<EngineHandle> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::CreateResources(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RenderEngine for RecordingEngine {
    fn create_context_resources(
        &self,
        _descriptor: &ContextDescriptor,
    ) -> Result<EngineHandle, EngineInitError> {
        let handle = self.allocator.mint();
        self.push(EngineEvent::CreateResources(handle));
        Ok(handle)
    }

    fn destroy_context_resources(&self, handle: EngineHandle) {
        self.push(EngineEvent::DestroyResources(handle));
    }

    fn on_surface_created(&self, handle: EngineHandle) {
        self.push(EngineEvent::SurfaceCreated(handle));
    }

    fn on_surface_resized(&self, handle: EngineHandle, width: u32, height: u32) {
        self.push(EngineEvent::SurfaceResized(handle, width, height));
    }

    fn on_draw_frame(&self, handle: EngineHandle) {
        self.push(EngineEvent::DrawStart(handle));

        let armed = self.draw_barrier.lock().unwrap().take();
        if let Some(barrier) = armed {
            barrier.wait();
            // Dwell with the frame in flight; a teardown that fails to wait
            // for this call would slip in here and corrupt the event order.
            std::thread::sleep(Duration::from_millis(50));
        }

        self.push(EngineEvent::DrawEnd(handle));
    }
}

/// Engine double whose context-resource setup always fails.
pub struct FailingEngine;

impl RenderEngine for FailingEngine {
    fn create_context_resources(
        &self,
        _descriptor: &ContextDescriptor,
    ) -> Result<EngineHandle, EngineInitError> {
        Err(EngineInitError::msg("forced engine-init failure"))
    }

    fn destroy_context_resources(&self, _handle: EngineHandle) {}
    fn on_surface_created(&self, _handle: EngineHandle) {}
    fn on_surface_resized(&self, _handle: EngineHandle, _width: u32, _height: u32) {}
    fn on_draw_frame(&self, _handle: EngineHandle) {}
}

/// Counters observed by tests after the provider moved into a bridge.
#[derive(Clone)]
pub struct ProviderStats {
    live: Arc<AtomicU32>,
    created: Arc<AtomicU32>,
    destroyed: Arc<AtomicU32>,
}

impl ProviderStats {
    pub fn live(&self) -> u32 {
        self.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> u32 {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> u32 {
        self.destroyed.load(Ordering::SeqCst)
    }
}

/// Context guard: decrements the live counter when it goes away, however it
/// goes away.
pub struct CountingContext {
    live: Arc<AtomicU32>,
}

impl Drop for CountingContext {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Platform double that counts context creations and destructions.
pub struct CountingProvider {
    stats: ProviderStats,
    fail_creation: bool,
}

impl CountingProvider {
    pub fn new() -> (Self, ProviderStats) {
        Self::with_failure(false)
    }

    /// A provider whose negotiation always fails.
    pub fn failing() -> (Self, ProviderStats) {
        Self::with_failure(true)
    }

    fn with_failure(fail_creation: bool) -> (Self, ProviderStats) {
        let stats = ProviderStats {
            live: Arc::new(AtomicU32::new(0)),
            created: Arc::new(AtomicU32::new(0)),
            destroyed: Arc::new(AtomicU32::new(0)),
        };
        (
            Self {
                stats: stats.clone(),
                fail_creation,
            },
            stats,
        )
    }
}

impl ContextProvider for CountingProvider {
    type Context = CountingContext;

    fn create_context(
        &self,
        _descriptor: &ContextDescriptor,
    ) -> Result<CountingContext, ContextError> {
        if self.fail_creation {
            return Err(ContextError::msg("no compatible display configuration"));
        }

        self.stats.live.fetch_add(1, Ordering::SeqCst);
        self.stats.created.fetch_add(1, Ordering::SeqCst);
        Ok(CountingContext {
            live: self.stats.live.clone(),
        })
    }

    fn destroy_context(&self, context: CountingContext) {
        self.stats.destroyed.fetch_add(1, Ordering::SeqCst);
        drop(context);
    }
}
