/// Negotiated GPU context parameters.
///
/// Owned by the context factory for the life of the bridge; render callbacks
/// never see it. Keep this structure stable and minimal, and add fields only
/// when a concrete platform or engine requirement exists.
#[derive(Debug, Clone)]
pub struct ContextDescriptor {
    /// Requested client API major version.
    ///
    /// Forwarded verbatim to the platform layer and to the engine's context
    /// setup. Providers that negotiate their own API level treat it as a
    /// hint.
    pub client_version: u32,

    /// Prefer an sRGB surface format when available.
    ///
    /// sRGB is typically required for correct UI color output.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and generally appropriate as a default.
    pub present_mode: wgpu::PresentMode,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly
    /// necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for ContextDescriptor {
    fn default() -> Self {
        Self {
            client_version: 3,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_portable() {
        let desc = ContextDescriptor::default();
        assert_eq!(desc.client_version, 3);
        assert!(desc.prefer_srgb);
        assert_eq!(desc.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(desc.required_features, wgpu::Features::empty());
    }
}
