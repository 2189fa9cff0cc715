use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use flowboard_engine::coords::{BoardPoint, HostRect, WorldPoint};
use flowboard_engine::device::{SurfaceErrorAction, gpu_available};
use flowboard_engine::graph::{Edge, Node};
use flowboard_engine::input::{BoardController, PointerId, PressTarget, RenderBackend};
use flowboard_engine::render::{GpuRenderer, RuntimeSlot};
use flowboard_engine::svg::{SvgRenderOptions, render_scene_svg};

/// Pointer id reserved for the mouse; touch contacts use their platform id
/// shifted past it.
const MOUSE_POINTER: PointerId = PointerId(0);

/// Board pixels applied per wheel line. The controller's zoom response is
/// exponential in pixels, so this only tunes desktop wheel speed.
const PIXELS_PER_SCROLL_LINE: f64 = 16.0;

/// Where the retained backend writes its scene document.
const SNAPSHOT_PATH: &str = "flowboard-snapshot.svg";

/// Window configuration for the studio shell.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "flowboard".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runs the studio until the window closes.
pub fn run(config: StudioConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = StudioApp::new(config);

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    Ok(())
}

/// Session seed: two nodes joined by one edge.
fn session_graph() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        Node::new("1", WorldPoint::new(0.0, 0.0), 100.0, 50.0),
        Node::new("2", WorldPoint::new(120.0, 0.0), 100.0, 50.0),
    ];
    let edges = vec![Edge::new("1-2", "1", "2")];
    (nodes, edges)
}

// The surface borrows the window, so both live in one self-referencing
// entry, as the GPU runtime slot must be torn down before the window.
#[self_referencing]
struct BoardEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    backend: RuntimeSlot<GpuRenderer<'this>>,
}

struct StudioApp {
    config: StudioConfig,
    controller: BoardController,
    entry: Option<BoardEntry>,
    cursor: BoardPoint,
}

impl StudioApp {
    fn new(config: StudioConfig) -> Self {
        let available = gpu_available();
        let (nodes, edges) = session_graph();
        let mut controller = BoardController::new(nodes, edges, available);

        // The window is the GPU backend's native surface; prefer it whenever
        // the probe passes. The retained backend stays one keypress away.
        if available {
            controller.set_backend(RenderBackend::Gpu);
        } else {
            log::warn!("no GPU adapter found; the board runs on the retained backend");
        }

        Self {
            config,
            controller,
            entry: None,
            cursor: BoardPoint::new(0.0, 0.0),
        }
    }

    fn host_rect(window: &Window) -> HostRect {
        let size: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
        HostRect::new(0.0, 0.0, size.width, size.height)
    }

    /// Drives one initialization attempt for the GPU runtime.
    ///
    /// Device acquisition is async; it is driven to completion here and the
    /// result routed through the slot, which discards it if the slot was
    /// retired or destroyed in the meantime.
    fn ensure_gpu_runtime(&mut self) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            if fields.backend.runtime_mut().is_some() {
                return;
            }

            let generation = fields.backend.begin_initializing();
            let result = pollster::block_on(GpuRenderer::initialize(fields.window))
                .map_err(|err| format!("{err:#}"));
            fields.backend.install(generation, result);

            if let Some(cause) = fields.backend.error() {
                log::error!("gpu backend unavailable: {cause}");
            }
        });
    }

    fn request_redraw(&self) {
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|window| window.request_redraw());
        }
    }

    fn redraw_if(&self, changed: bool) {
        if changed {
            self.request_redraw();
        }
    }

    fn toggle_backend(&mut self) {
        let next = match self.controller.backend() {
            RenderBackend::Gpu => RenderBackend::Svg,
            RenderBackend::Svg => RenderBackend::Gpu,
        };

        if !self.controller.set_backend(next) {
            return;
        }

        match self.controller.backend() {
            RenderBackend::Gpu => self.ensure_gpu_runtime(),
            RenderBackend::Svg => {
                // Unmounting the GPU backend runs full teardown; a later
                // switch back re-initializes from scratch.
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_backend_mut(|backend| backend.retire());
                }
            }
        }

        log::info!("render backend: {:?}", self.controller.backend());
        self.request_redraw();
    }

    fn write_snapshot(&self) {
        let Some(entry) = self.entry.as_ref() else {
            return;
        };

        let host = entry.with_window(|window| Self::host_rect(window));
        let options = SvgRenderOptions {
            width: host.width,
            height: host.height,
            ..Default::default()
        };

        let document = render_scene_svg(&self.controller.scene(), &options);
        match std::fs::write(SNAPSHOT_PATH, document) {
            Ok(()) => log::info!("wrote scene snapshot to {SNAPSHOT_PATH}"),
            Err(err) => log::error!("failed to write {SNAPSHOT_PATH}: {err}"),
        }
    }

    fn sync_surface(&mut self) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            let host = Self::host_rect(fields.window);
            let dpr = fields.window.scale_factor();
            if let Some(renderer) = fields.backend.runtime_mut() {
                renderer.sync_canvas_size(host, dpr);
            }
        });
    }

    fn draw_frame(&mut self) {
        if self.controller.backend() != RenderBackend::Gpu {
            // The retained backend is a document, not a swapchain; nothing
            // to present here.
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let scene = self.controller.scene();
        let mut fatal = false;

        entry.with_mut(|fields| {
            let Some(renderer) = fields.backend.runtime_mut() else {
                return;
            };

            let host = Self::host_rect(fields.window);
            let dpr = fields.window.scale_factor();
            renderer.sync_canvas_size(host, dpr);

            if let Some(action) = renderer.render(&scene, dpr) {
                match action {
                    SurfaceErrorAction::Fatal => fatal = true,
                    SurfaceErrorAction::Reconfigured => {
                        fields.window.request_redraw();
                    }
                    SurfaceErrorAction::SkipFrame => {}
                }
            }
        });

        if fatal {
            entry.with_backend_mut(|backend| {
                backend.fail("GPU surface ran out of memory".to_string());
            });
        }
    }

    /// Pointer position in board space from a window-relative physical
    /// position.
    fn board_point(window: &Window, position: winit::dpi::PhysicalPosition<f64>) -> BoardPoint {
        let logical = position.to_logical::<f64>(window.scale_factor());
        BoardPoint::new(logical.x, logical.y)
    }
}

impl ApplicationHandler for StudioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        self.entry = Some(
            BoardEntryBuilder {
                window,
                backend_builder: |_| RuntimeSlot::new(),
            }
            .build(),
        );

        if self.controller.backend() == RenderBackend::Gpu {
            self.ensure_gpu_runtime();
        }
        self.request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Frames are produced by state changes and resizes, not a clock.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_backend_mut(|backend| backend.destroy());
                }
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.sync_surface();
                self.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let Some(entry) = self.entry.as_ref() else {
                    return;
                };
                self.cursor = entry.with_window(|window| Self::board_point(window, position));
                let changed = self.controller.pointer_move(MOUSE_POINTER, self.cursor);
                self.redraw_if(changed);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button != MouseButton::Left {
                    return;
                }
                match state {
                    ElementState::Pressed => {
                        self.controller
                            .pointer_down(MOUSE_POINTER, self.cursor, PressTarget::Board);
                    }
                    ElementState::Released => {
                        self.controller.pointer_up(MOUSE_POINTER);
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // winit's +Y is "scroll away"; the board zooms in on that,
                // so the sign flips into the browser-style delta.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -f64::from(y) * PIXELS_PER_SCROLL_LINE,
                    MouseScrollDelta::PixelDelta(p) => -p.y,
                };
                let changed = self.controller.wheel(self.cursor, delta_y);
                self.redraw_if(changed);
            }

            WindowEvent::Touch(touch) => {
                let Some(entry) = self.entry.as_ref() else {
                    return;
                };
                let pointer = PointerId(touch.id + 1);
                let point = entry.with_window(|window| Self::board_point(window, touch.location));

                let changed = match touch.phase {
                    TouchPhase::Started => {
                        self.controller.pointer_down(pointer, point, PressTarget::Board)
                    }
                    TouchPhase::Moved => self.controller.pointer_move(pointer, point),
                    TouchPhase::Ended => self.controller.pointer_up(pointer),
                    TouchPhase::Cancelled => self.controller.pointer_cancel(pointer),
                };
                self.redraw_if(changed);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Tab) => self.toggle_backend(),
                    PhysicalKey::Code(KeyCode::KeyS) => self.write_snapshot(),
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => self.draw_frame(),

            _ => {}
        }
    }
}
