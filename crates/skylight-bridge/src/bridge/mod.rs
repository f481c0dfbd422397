//! Surface lifecycle coordination.
//!
//! One [`SurfaceBridge`] is bound to one platform view instance and holds
//! zero or one engine handle at a time. The lifecycle thread talks to the
//! bridge itself (attach, surface-destroyed, detach); the platform's render
//! thread talks to the [`RenderDispatcher`] it hands out (created, resized,
//! draw). Both endpoints share a mutex-guarded slot holding the current
//! context generation.
//!
//! The slot mutex is the cross-thread synchronization point: every render
//! callback resolves the handle and calls the engine while holding it, and
//! teardown holds it across destruction. A teardown therefore blocks until
//! any in-flight callback returns, and a callback that starts after teardown
//! observes an empty slot and becomes a no-op.

mod dispatcher;
mod shared;
mod surface;

pub use dispatcher::RenderDispatcher;
pub use surface::SurfaceBridge;

/// Where a bridge currently is in its life.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecyclePhase {
    /// Not yet placed in, or permanently removed from, a view hierarchy.
    Detached,
    /// Attached, with no live GPU context.
    NoContext,
    /// Attached, with a live context generation and a valid engine handle.
    ContextLive,
}

/// High-level response after forwarding one render callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DispatchOutcome {
    /// The engine saw the call, with a handle that was valid at call time.
    Delivered,
    /// Dropped as a duplicate; the same dimensions were already forwarded.
    Unchanged,
    /// No live handle; the call was ignored.
    Stale,
}

/// High-level response after a teardown request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TeardownOutcome {
    /// A live generation was destroyed.
    Destroyed,
    /// Nothing was live; the request was ignored.
    AlreadyClear,
}
