//! The native engine side of the bridge.
//!
//! An engine is external to this crate and opaque to it. The bridge talks to
//! it through [`RenderEngine`], a fixed five-entry contract in which the
//! current [`EngineHandle`] is an explicit argument on every call. Engines
//! keep their own per-context state keyed by handle; nothing in this crate
//! assumes, or provides, process-global engine state.

mod contract;
mod handle;

pub use contract::RenderEngine;
pub use handle::{EngineHandle, HandleAllocator};
