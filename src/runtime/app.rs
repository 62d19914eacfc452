use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

use notegrid::cli::StartupConfig;
use notegrid::commands::Cmd;
use notegrid::config::GridConfig;
use notegrid::messages::{GestureMsg, Msg, PointerMsg, TransportMsg, ViewMsg};
use notegrid::model::{GridModel, Size, ViewState};
use notegrid::store::{ContentStore, MemoryStore, TrackId};
use notegrid::theme::{load_theme, Theme};
use notegrid::transport::{ClockTransport, Transport};
use notegrid::update::Env;
use notegrid::view::{Frame, FrameInput, LayeredRenderer, PaintStats, RenderScheduler};
use notegrid::GridStore;

use super::mouse::{pointer_button, PointerTracker};

/// Frame interval while the transport is running
const PLAYBACK_FRAME: Duration = Duration::from_millis(16);

/// Wheel lines to pixels
const LINE_SCROLL_PX: f64 = 40.0;

pub struct App {
    store: GridStore,
    content: MemoryStore,
    transport: ClockTransport,
    scheduler: RenderScheduler,
    renderer: LayeredRenderer,
    pointer: PointerTracker,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    window_size: (u32, u32),
    render_margin: f64,
    last_paint: Option<PaintStats>,
}

impl App {
    pub fn new(startup: StartupConfig) -> Result<Self> {
        let config = startup.config;
        let (width, height) = startup.window_size;

        let theme = load_theme(&config.theme).unwrap_or_else(|e| {
            tracing::warn!(theme = %config.theme, error = %e, "falling back to default theme");
            Theme::default()
        });

        let mut view = ViewState::piano_roll(&config, Size::new(width as f64, height as f64))?;
        view.mode = startup.mode;
        // Start around middle C
        let middle_c = view.transform().y(72.0);
        view.set_scroll(0.0, middle_c);

        let mut content = MemoryStore::new(1, config.timebase as f64);
        if startup.demo_notes {
            seed_demo_notes(&mut content, &config)?;
        }

        let transport = ClockTransport::new(config.tempo_bpm, config.timebase, Instant::now());
        let render_margin = config.render_margin_px;
        let mut store = GridStore::new(GridModel::with_view(view, config));
        let mut scheduler = RenderScheduler::new();
        scheduler.mount(&mut store);

        Ok(Self {
            store,
            content,
            transport,
            scheduler,
            renderer: LayeredRenderer::new(theme.grid),
            pointer: PointerTracker::default(),
            window: None,
            context: None,
            surface: None,
            window_size: (width, height),
            render_margin,
            last_paint: None,
        })
    }

    fn dispatch(&mut self, msg: Msg) -> Option<Cmd> {
        let mut env = Env::new(&mut self.content, &mut self.transport);
        self.store.dispatch(&mut env, msg)
    }

    fn init_surface(&mut self, window: Rc<Window>) -> Result<()> {
        let context =
            Context::new(Rc::clone(&window)).map_err(|e| anyhow::anyhow!("Failed to create context: {}", e))?;
        let surface = Surface::new(&context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;
        let size = window.inner_size();
        self.window_size = (size.width, size.height);
        self.surface = Some(surface);
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }

    fn handle_event(&mut self, event: &WindowEvent) -> Option<Cmd> {
        let now = Instant::now();
        match event {
            WindowEvent::Resized(size) => {
                self.window_size = (size.width, size.height);
                self.scheduler.invalidate();
                self.dispatch(Msg::View(ViewMsg::Resize {
                    width: size.width as f64,
                    height: size.height as f64,
                }))
            }
            WindowEvent::ModifiersChanged(mods) => {
                self.pointer.set_modifiers(mods.state());
                None
            }
            WindowEvent::Focused(false) => {
                self.pointer.clear();
                self.dispatch(Msg::Gesture(GestureMsg::Cancel))
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.handle_key(&event.logical_key, now)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.set_position(position.x, position.y);
                let event = self.pointer.moved(now)?;
                self.dispatch(Msg::Pointer(PointerMsg::Move(event)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = pointer_button(*button)?;
                match state {
                    ElementState::Pressed => {
                        let event = self.pointer.press(button, now);
                        self.dispatch(Msg::Pointer(PointerMsg::Down(event)))
                    }
                    ElementState::Released => {
                        let event = self.pointer.release(button, now)?;
                        self.dispatch(Msg::Pointer(PointerMsg::Up(event)))
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => {
                        (-*x as f64 * LINE_SCROLL_PX, -*y as f64 * LINE_SCROLL_PX)
                    }
                    MouseScrollDelta::PixelDelta(pos) => (-pos.x, -pos.y),
                };
                if self.pointer.modifiers().command() {
                    let factor = if dy < 0.0 { 1.25 } else { 0.8 };
                    let anchor_x = self.pointer.position().x;
                    return self.dispatch(Msg::View(ViewMsg::ZoomAt { factor, anchor_x }));
                }
                self.dispatch(Msg::View(ViewMsg::ScrollBy { dx, dy }))
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    tracing::error!(error = %e, "render failed");
                }
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &Key, now: Instant) -> Option<Cmd> {
        match key {
            Key::Named(NamedKey::Space) => {
                self.transport.toggle(now);
                let playing = self.transport.is_playing();
                tracing::info!(playing, "transport toggled");
                self.dispatch(Msg::Transport(TransportMsg::PlayStateChanged(playing)))
            }
            Key::Named(NamedKey::Escape) => self.dispatch(Msg::Gesture(GestureMsg::Cancel)),
            #[cfg(debug_assertions)]
            Key::Named(NamedKey::F7) => {
                let dump = notegrid::debug_dump::StateDump::capture(
                    self.store.state(),
                    &self.content,
                    self.last_paint.clone(),
                );
                match dump.save_to(std::path::Path::new("dumps")) {
                    Ok(path) => tracing::info!(path = %path.display(), "state dumped"),
                    Err(e) => tracing::error!(error = %e, "failed to dump state"),
                }
                None
            }
            Key::Character(c) => match c.as_str() {
                "p" => self.dispatch(Msg::View(ViewMsg::SetMouseMode(
                    notegrid::gesture::MouseMode::Pencil,
                ))),
                "s" => self.dispatch(Msg::View(ViewMsg::SetMouseMode(
                    notegrid::gesture::MouseMode::Selection,
                ))),
                "q" => {
                    let enabled = !self.store.state().view.quantizer.is_enabled();
                    self.dispatch(Msg::View(ViewMsg::SetQuantizeEnabled(enabled)))
                }
                "f" => {
                    let follow = !self.store.state().view.auto_scroll;
                    self.dispatch(Msg::View(ViewMsg::SetAutoScroll(follow)))
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self) -> Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let (width, height) = self.window_size;
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(());
        };

        let view = &self.store.state().view;
        let Some(pending) = self.scheduler.next_frame(view, self.content.revision()) else {
            return Ok(());
        };
        tracing::trace!(damage = ?pending.damage, "painting frame");

        surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;
        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get surface buffer: {}", e))?;

        let input = FrameInput::derive(view, &self.content, self.render_margin);
        let mut frame = Frame::new(&mut buffer, width as usize, height as usize);
        self.last_paint = Some(self.renderer.paint(&mut frame, &input));

        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Redraw | Cmd::RedrawLayers(_) => {}
            Cmd::OpenContextMenu(event) => {
                // The demo host has no native menus
                tracing::info!(x = event.client.x, y = event.client.y, "context menu requested");
            }
            Cmd::ReportError(err) => tracing::error!(error = %err, "grid error"),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn shutdown(&mut self) {
        self.dispatch(Msg::Gesture(GestureMsg::Cancel));
        self.scheduler.unmount(&mut self.store);
    }
}

/// Two bars of a C major scale
fn seed_demo_notes(store: &mut MemoryStore, config: &GridConfig) -> Result<()> {
    let beat = config.timebase as f64;
    let scale = [60.0, 62.0, 64.0, 65.0, 67.0, 69.0, 71.0, 72.0];
    for (i, key) in scale.iter().enumerate() {
        store.insert(TrackId(0), i as f64 * beat, beat * 0.9, *key)?;
    }
    store.insert(TrackId(0), 0.0, beat * 4.0, 48.0)?;
    store.insert(TrackId(0), beat * 4.0, beat * 4.0, 55.0)?;
    Ok(())
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let (width, height) = self.window_size;
        let window_attributes = Window::default_attributes()
            .with_title("notegrid")
            .with_inner_size(LogicalSize::new(width, height));

        let result = event_loop
            .create_window(window_attributes)
            .map_err(anyhow::Error::from)
            .and_then(|window| self.init_surface(Rc::new(window)));
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to create window");
            event_loop.exit();
            return;
        }

        let (width, height) = self.window_size;
        let cmd = self.dispatch(Msg::View(ViewMsg::Resize {
            width: width as f64,
            height: height as f64,
        }));
        if let Some(cmd) = cmd {
            self.process_cmd(cmd);
        }
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        if window_id != window.id() {
            return;
        }

        if matches!(event, WindowEvent::CloseRequested) {
            self.shutdown();
            event_loop.exit();
            return;
        }

        if let Some(cmd) = self.handle_event(&event) {
            self.process_cmd(cmd);
        }
        if self.scheduler.needs_paint() {
            self.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.transport.is_playing() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        let now = Instant::now();
        let position = self.transport.tick_clock(now);
        if let Some(cmd) = self.dispatch(Msg::Transport(TransportMsg::PositionChanged(position))) {
            self.process_cmd(cmd);
        }
        if self.scheduler.needs_paint() {
            self.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(now + PLAYBACK_FRAME));
    }
}
