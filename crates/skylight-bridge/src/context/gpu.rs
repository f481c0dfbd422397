use std::sync::Arc;

use anyhow::Context as _;

use crate::error::ContextError;

use super::{ContextDescriptor, ContextProvider};

/// Platform GPU context negotiated through wgpu.
///
/// Owns the chain from surface to queue. The swapchain is configured lazily:
/// the platform reports drawable dimensions only after the surface exists,
/// so `configure` first runs on the first non-zero resize.
pub struct WgpuContext {
    /// Surface bound to the shell's window. `'static` because the window is
    /// shared as an `Arc` and outlives the context by construction.
    surface: wgpu::Surface<'static>,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Surface configuration to apply on resize.
    config: wgpu::SurfaceConfiguration,

    /// Whether the swapchain has been configured with real dimensions yet.
    configured: bool,
}

impl WgpuContext {
    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns a reference to the selected adapter.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Whether the swapchain has seen its first real dimensions.
    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

/// [`ContextProvider`] backed by a real window-system surface.
///
/// Generic over the window handle so this crate stays independent of the
/// windowing toolkit the shell happens to use; anything satisfying wgpu's
/// window-handle traits works.
pub struct WgpuContextProvider<W: wgpu::WindowHandle + 'static> {
    window: Arc<W>,
}

impl<W: wgpu::WindowHandle + 'static> WgpuContextProvider<W> {
    pub fn new(window: Arc<W>) -> Self {
        Self { window }
    }
}

impl<W: wgpu::WindowHandle + 'static> ContextProvider for WgpuContextProvider<W> {
    type Context = WgpuContext;

    fn create_context(&self, descriptor: &ContextDescriptor) -> Result<WgpuContext, ContextError> {
        negotiate(self.window.clone(), descriptor).map_err(ContextError::from)
    }

    fn resize_context(&self, context: &mut WgpuContext, width: u32, height: u32) {
        // wgpu does not support a 0x0 configuration; keep the old one until
        // real dimensions arrive.
        if width == 0 || height == 0 {
            return;
        }

        context.config.width = width;
        context.config.height = height;
        context.surface.configure(&context.device, &context.config);
        context.configured = true;
    }

    fn destroy_context(&self, context: WgpuContext) {
        // Dropping the context releases the swapchain, device, and queue;
        // the surface is freed last through wgpu's internal refcounts.
        drop(context);
        log::debug!("wgpu context dropped");
    }
}

fn negotiate<W: wgpu::WindowHandle + 'static>(
    window: Arc<W>,
    descriptor: &ContextDescriptor,
) -> anyhow::Result<WgpuContext> {
    log::info!(
        "negotiating GPU context (client API v{} requested)",
        descriptor.client_version
    );

    // All backends, so wgpu picks the optimal platform backend.
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let surface = instance
        .create_surface(window)
        .context("failed to create wgpu surface")?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .context("failed to find a suitable GPU adapter")?;

    log::debug!("adapter: {:?}", adapter.get_info());

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("skylight context device"),
        required_features: descriptor.required_features,
        required_limits: descriptor.required_limits.clone(),
        experimental_features: wgpu::ExperimentalFeatures::disabled(),
        memory_hints: wgpu::MemoryHints::Performance,
        trace: wgpu::Trace::Off,
    }))
    .context("failed to create wgpu device/queue")?;

    let caps = surface.get_capabilities(&adapter);
    let format = choose_surface_format(&caps, descriptor.prefer_srgb)
        .context("no supported surface formats")?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    // Dimensions are unknown until the platform reports them; configuration
    // is deferred to the first resize.
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: 1,
        height: 1,
        present_mode: descriptor.present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: descriptor.desired_maximum_frame_latency,
    };

    Ok(WgpuContext {
        surface,
        adapter,
        device,
        queue,
        config,
        configured: false,
    })
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(format) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(format);
        }
    }

    caps.formats.first().copied()
}
