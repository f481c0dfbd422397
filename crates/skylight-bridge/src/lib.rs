//! Skylight bridge crate.
//!
//! This crate owns the mapping between a platform-managed drawable surface
//! and an externally-owned rendering engine: it creates and destroys the
//! platform GPU context and the engine's per-context resources in lock-step,
//! and forwards created/resized/draw notifications from the platform's
//! render thread to the engine with the current handle passed explicitly on
//! every call.
//!
//! The crate deliberately knows nothing about pixels. Drawing belongs to the
//! engine behind [`engine::RenderEngine`]; window management belongs to the
//! shell that owns the event loop. What lives here is sequencing: an engine
//! handle is valid exactly while its context generation is, teardown waits
//! for in-flight render callbacks, and a callback that loses the race sees a
//! clean no-op instead of a dangling handle.

pub mod bridge;
pub mod context;
pub mod engine;
pub mod error;
pub mod logging;
