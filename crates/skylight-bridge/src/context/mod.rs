//! GPU context negotiation and lifetime.
//!
//! This module is responsible for:
//! - describing the context the platform should negotiate ([`ContextDescriptor`])
//! - the platform seam behind which negotiation happens ([`ContextProvider`])
//! - creating and destroying the context and the engine handle in lock-step
//!   ([`ContextFactory`]), which is the single authoritative site of engine
//!   handle creation and destruction

mod descriptor;
mod factory;
mod gpu;
mod provider;

pub use descriptor::ContextDescriptor;
pub use factory::ContextFactory;
pub use gpu::{WgpuContext, WgpuContextProvider};
pub use provider::ContextProvider;
