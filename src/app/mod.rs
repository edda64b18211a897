//! Application Framework
//!
//! Winit plumbing around the [`Viewer`]: window lifecycle, event dispatch,
//! the frame-rate-capped redraw cycle and the keyboard/mouse wiring.
//!
//! The redraw cycle follows a fixed order every frame: drain loader events,
//! check the delayed start trigger, then (unless the window is occluded)
//! accumulate wall time and, once the frame interval is reached, advance the
//! simulation by the accumulated delta and render.

pub mod input;

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::input::Input;
use crate::errors::Result;
use crate::render::{RenderSettings, Renderer};
use crate::utils::{FpsCounter, FramePacer, Timer};
use crate::viewer::Viewer;

/// Minimum interval between rendered frames (1/60 s).
pub const FRAME_INTERVAL: f32 = 1.0 / 60.0;

pub struct App {
    title: String,
    window: Option<Arc<Window>>,
    renderer: Renderer,
    viewer: Viewer,

    input: Input,
    timer: Timer,
    pacer: FramePacer,
    fps: FpsCounter,
    occluded: bool,
    shown_percent: Option<u32>,
}

impl App {
    #[must_use]
    pub fn new(viewer: Viewer) -> Self {
        Self {
            title: "Vitrine".into(),
            window: None,
            renderer: Renderer::new(RenderSettings::default()),
            viewer,
            input: Input::new(),
            timer: Timer::new(),
            pacer: FramePacer::new(FRAME_INTERVAL),
            fps: FpsCounter::new(),
            occluded: false,
            shown_percent: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the render settings. Only meaningful before [`run`](Self::run).
    #[must_use]
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.renderer = Renderer::new(settings);
        self
    }

    /// Runs the event loop. Blocks until the window is closed.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self).map_err(Into::into)
    }

    fn frame(&mut self) {
        self.viewer.handle_load_events(&mut self.renderer);

        if self.viewer.try_start(Instant::now())
            && let Some(window) = &self.window
        {
            window.set_title(&self.title);
        }
        if !self.viewer.started {
            let percent = self.viewer.progress.display_percent();
            if self.shown_percent != Some(percent)
                && let Some(window) = &self.window
            {
                window.set_title(&format!("{} | loading {percent}%", self.title));
                self.shown_percent = Some(percent);
            }
        }

        // While occluded nothing runs and the clock is not ticked; the first
        // visible frame afterwards observes the whole hidden span at once.
        if self.occluded {
            return;
        }

        let dt = self.timer.tick();
        let Some(step) = self.pacer.tick(dt) else {
            return;
        };

        if self.viewer.started {
            self.viewer.update(step, &self.input);
        }
        self.input.end_frame();

        if let Err(err) = self.renderer.render(&self.viewer.scene) {
            log::error!("Render error: {err}");
        }

        if self.viewer.started
            && let Some(fps) = self.fps.update()
            && let Some(window) = &self.window
        {
            window.set_title(&format!("{} | FPS: {fps:.0}", self.title));
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Space | KeyCode::KeyN) => {
                self.viewer.next_animation();
            }
            PhysicalKey::Code(KeyCode::KeyP) => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
                    .pick_file();
                if let Some(path) = picked {
                    self.viewer.loader.begin_photo_load(path);
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");
        let window = Arc::new(window);
        self.window = Some(window.clone());

        log::info!("Initializing renderer backend...");
        let size = window.inner_size();
        if let Err(e) = pollster::block_on(self.renderer.init(
            window.clone(),
            size.width,
            size.height,
        )) {
            log::error!("Fatal renderer error: {e}");
            event_loop.exit();
            return;
        }

        self.input.handle_resize(size.width, size.height);
        if size.height > 0 {
            self.viewer
                .set_aspect(size.width as f32 / size.height as f32);
        }

        self.viewer.begin_loading();
        self.timer = Timer::new();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.renderer
                    .resize(physical_size.width, physical_size.height);
                self.input
                    .handle_resize(physical_size.width, physical_size.height);
                if physical_size.height > 0 {
                    self.viewer
                        .set_aspect(physical_size.width as f32 / physical_size.height as f32);
                }
            }
            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_move(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_input(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.handle_mouse_wheel(delta);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
