//! Thin presentation shell for the surface bridge.
//!
//! Owns the winit event loop (the lifecycle thread), spawns one dedicated
//! render thread, and wires platform notifications into a single
//! [`SurfaceBridge`]. The engine behind the bridge is [`TraceEngine`], which
//! keeps per-context state in an arena keyed by handle and logs every entry
//! point; it produces no pixels.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use skylight_bridge::bridge::{RenderDispatcher, SurfaceBridge};
use skylight_bridge::context::{ContextDescriptor, WgpuContextProvider};
use skylight_bridge::engine::{EngineHandle, HandleAllocator, RenderEngine};
use skylight_bridge::error::EngineInitError;
use skylight_bridge::logging::{LoggingConfig, init_logging};

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// How often the render thread ticks a frame when no command is pending.
    pub frame_interval: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "skylight".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            frame_interval: Duration::from_millis(16),
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    install_panic_hook();

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut shell = Shell::new(ShellConfig::default());

    event_loop
        .run_app(&mut shell)
        .context("winit event loop terminated with error")?;

    Ok(())
}

/// Routes panic reports through the logger before the default hook runs, so
/// a panic on the render thread is attributed to it in the log stream.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("panic: {info}");
        default_hook(info);
    }));
}

// ── lifecycle thread ──────────────────────────────────────────────────────

struct Shell {
    config: ShellConfig,
    view: Option<View>,
}

/// One platform view: the window, its bridge, and the render thread that
/// drives the bridge's dispatcher.
struct View {
    window: Arc<Window>,
    bridge: SurfaceBridge<WgpuContextProvider<Window>>,
    render: RenderThread,
}

impl Shell {
    fn new(config: ShellConfig) -> Self {
        Self { config, view: None }
    }

    fn create_view(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        // AutoVsync degrades gracefully where FIFO mailbox variants differ
        // per backend; everything else keeps the portable defaults.
        let descriptor = ContextDescriptor {
            present_mode: wgpu::PresentMode::AutoVsync,
            ..ContextDescriptor::default()
        };

        let provider = WgpuContextProvider::new(window.clone());
        let bridge = SurfaceBridge::new(provider, Arc::new(TraceEngine::new()), descriptor);
        bridge.attach();

        let render = RenderThread::spawn(bridge.dispatcher(), self.config.frame_interval)?;
        render.send(RenderCommand::SurfaceCreated);

        let size = window.inner_size();
        render.send(RenderCommand::Resized(size.width, size.height));

        self.view = Some(View {
            window,
            bridge,
            render,
        });
        Ok(())
    }

    /// Full teardown: destroy the live generation, stop the render thread,
    /// then detach the bridge for good.
    fn destroy_view(&mut self) {
        let Some(view) = self.view.take() else {
            return;
        };

        view.bridge.surface_destroyed();
        view.render.shutdown();
        view.bridge.detach();
    }
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        match &self.view {
            // The window survived a suspend; only the context generation was
            // lost. Ask the render thread for a fresh one.
            Some(view) => view.render.send(RenderCommand::SurfaceCreated),
            None => {
                if let Err(e) = self.create_view(event_loop) {
                    log::error!("failed to bring up the surface view: {e:#}");
                    event_loop.exit();
                }
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Mobile-style context loss: the drawable is gone until the next
        // resume. Blocks until any in-flight frame has returned.
        if let Some(view) = &self.view {
            view.bridge.surface_destroyed();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // The render thread ticks itself; the lifecycle thread only reacts.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(view) = &self.view else {
            return;
        };
        if window_id != view.window.id() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                view.render
                    .send(RenderCommand::Resized(size.width, size.height));
            }

            WindowEvent::CloseRequested => {
                self.destroy_view();
                event_loop.exit();
            }

            _ => {}
        }
    }
}

// ── render thread ─────────────────────────────────────────────────────────

enum RenderCommand {
    SurfaceCreated,
    Resized(u32, u32),
    Shutdown,
}

struct RenderThread {
    tx: mpsc::Sender<RenderCommand>,
    join: Option<thread::JoinHandle<()>>,
}

impl RenderThread {
    fn spawn(
        dispatcher: RenderDispatcher<WgpuContextProvider<Window>>,
        frame_interval: Duration,
    ) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let join = thread::Builder::new()
            .name("render".into())
            .spawn(move || render_loop(dispatcher, rx, frame_interval))
            .context("failed to spawn the render thread")?;

        Ok(Self {
            tx,
            join: Some(join),
        })
    }

    fn send(&self, command: RenderCommand) {
        if self.tx.send(command).is_err() {
            log::error!("render thread is gone; command dropped");
        }
    }

    fn shutdown(mut self) {
        self.send(RenderCommand::Shutdown);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("render thread panicked before shutdown");
            }
        }
    }
}

fn render_loop(
    dispatcher: RenderDispatcher<WgpuContextProvider<Window>>,
    rx: mpsc::Receiver<RenderCommand>,
    frame_interval: Duration,
) {
    log::info!(
        "render thread up, {}ms frame interval",
        frame_interval.as_millis()
    );

    loop {
        match rx.recv_timeout(frame_interval) {
            Ok(RenderCommand::SurfaceCreated) => match dispatcher.surface_created() {
                Ok(handle) => log::info!("surface ready as {handle}"),
                Err(e) => log::error!("surface creation failed: {e}"),
            },

            Ok(RenderCommand::Resized(width, height)) => {
                dispatcher.surface_resized(width, height);
            }

            // Quiet interval: tick one frame. A tick that races teardown is
            // a no-op inside the dispatcher.
            Err(mpsc::RecvTimeoutError::Timeout) => {
                dispatcher.draw_frame();
            }

            Ok(RenderCommand::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    log::info!("render thread down");
}

// ── demo engine ───────────────────────────────────────────────────────────

/// Engine that traces the call contract instead of producing pixels.
///
/// Per-context state lives in an arena keyed by handle; nothing about a
/// context survives anywhere else, so destroying a generation removes every
/// trace of it.
struct TraceEngine {
    allocator: HandleAllocator,
    arena: Mutex<HashMap<EngineHandle, ContextState>>,
}

#[derive(Default)]
struct ContextState {
    size: Option<(u32, u32)>,
    frames: u64,
}

impl TraceEngine {
    fn new() -> Self {
        Self {
            allocator: HandleAllocator::new(),
            arena: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EngineHandle, ContextState>> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderEngine for TraceEngine {
    fn create_context_resources(
        &self,
        descriptor: &ContextDescriptor,
    ) -> Result<EngineHandle, EngineInitError> {
        let handle = self.allocator.mint();
        self.lock().insert(handle, ContextState::default());
        log::info!(
            "engine resources created as {handle} (client API v{})",
            descriptor.client_version
        );
        Ok(handle)
    }

    fn destroy_context_resources(&self, handle: EngineHandle) {
        match self.lock().remove(&handle) {
            Some(state) => log::info!(
                "engine resources for {handle} destroyed after {} frames",
                state.frames
            ),
            None => log::warn!("destroy for unknown {handle}"),
        }
    }

    fn on_surface_created(&self, handle: EngineHandle) {
        log::info!("{handle}: surface created");
    }

    fn on_surface_resized(&self, handle: EngineHandle, width: u32, height: u32) {
        if let Some(state) = self.lock().get_mut(&handle) {
            state.size = Some((width, height));
            log::info!("{handle}: surface resized to {width}x{height}");
        }
    }

    fn on_draw_frame(&self, handle: EngineHandle) {
        if let Some(state) = self.lock().get_mut(&handle) {
            state.frames += 1;
            if state.frames % 120 == 0 {
                log::debug!("{handle}: {} frames submitted", state.frames);
            }
        }
    }
}
