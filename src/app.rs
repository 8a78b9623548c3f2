//! winit application: owns the stage and its renderer, and turns window
//! events into stage calls.

use std::sync::Arc;

use glam::Vec2;
use log::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::clock::Clock;
use crate::config::StageConfig;
use crate::error::StageError;
use crate::input::MouseButton;
use crate::render::Renderer;
use crate::stage::Stage;
use crate::viewport::Viewport;

/// Pixels of trackpad scrolling counted as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 100.0;

/// Events sent back into the loop by async start-up work.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub enum StageEvent {
    RendererReady(Box<Renderer>),
    RendererFailed(String),
}

pub struct StageApp {
    config: StageConfig,
    stage: Stage,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    error: Option<anyhow::Error>,
    #[cfg(target_arch = "wasm32")]
    canvas: Option<web_sys::HtmlCanvasElement>,
    #[cfg(target_arch = "wasm32")]
    proxy: winit::event_loop::EventLoopProxy<StageEvent>,
}

impl StageApp {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(config: StageConfig, viewport: Viewport) -> Self {
        let stage = Stage::new(&config, viewport, Clock::new());
        Self {
            config,
            stage,
            window: None,
            renderer: None,
            error: None,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new(
        config: StageConfig,
        viewport: Viewport,
        canvas: web_sys::HtmlCanvasElement,
        proxy: winit::event_loop::EventLoopProxy<StageEvent>,
    ) -> Self {
        let stage = Stage::new(&config, viewport, Clock::new());
        Self {
            config,
            stage,
            window: None,
            renderer: None,
            error: None,
            canvas: Some(canvas),
            proxy,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn window_attributes(&mut self) -> winit::window::WindowAttributes {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(
                f64::from(self.stage.viewport().width),
                f64::from(self.stage.viewport().height),
            ));
        #[cfg(target_arch = "wasm32")]
        let attributes = {
            use winit::platform::web::WindowAttributesExtWebSys;
            attributes.with_canvas(self.canvas.take())
        };
        attributes
    }

    fn attach(&mut self, mut renderer: Renderer) {
        let window = renderer.window();
        let (width, height) = logical_size(window.inner_size(), window.scale_factor());
        let scale_factor = window.scale_factor();
        if !self.stage.resize(width, height, scale_factor, &mut renderer) {
            self.stage.attach(&mut renderer);
        }
        renderer.window().request_redraw();
        info!("Renderer attached at {width}x{height} @ {scale_factor:.2}");
        self.renderer = Some(renderer);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start_renderer(&mut self, event_loop: &ActiveEventLoop, window: Arc<Window>) {
        match pollster::block_on(Renderer::new(window)) {
            Ok(renderer) => self.attach(renderer),
            Err(err) => self.fail(event_loop, err),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn start_renderer(&mut self, _event_loop: &ActiveEventLoop, window: Arc<Window>) {
        let proxy = self.proxy.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let event = match Renderer::new(window).await {
                Ok(renderer) => StageEvent::RendererReady(Box::new(renderer)),
                Err(err) => StageEvent::RendererFailed(format!("{err:#}")),
            };
            if proxy.send_event(event).is_err() {
                log::warn!("Event loop closed before the renderer was ready");
            }
        });
    }
}

impl ApplicationHandler<StageEvent> for StageApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = self.window_attributes();
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                let err = StageError::Window {
                    stage: "window",
                    message: err.to_string(),
                };
                self.fail(event_loop, err.into());
                return;
            }
        };
        self.window = Some(Arc::clone(&window));
        self.start_renderer(event_loop, window);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: StageEvent) {
        match event {
            StageEvent::RendererReady(renderer) => self.attach(*renderer),
            StageEvent::RendererFailed(message) => {
                self.fail(event_loop, anyhow::anyhow!(message));
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(renderer) = self.renderer.as_mut() else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };
        if window_id != renderer.window_id() {
            return;
        }
        let consumed = renderer.handle_overlay_event(&event);
        let scale_factor = renderer.window().scale_factor();

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let (width, height) = logical_size(size, scale_factor);
                self.stage.resize(width, height, scale_factor, renderer);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let (width, height) = logical_size(renderer.window().inner_size(), scale_factor);
                self.stage.resize(width, height, scale_factor, renderer);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.stage
                    .pointer_moved(logical_position(position, scale_factor));
            }
            WindowEvent::CursorLeft { .. } => self.stage.pointer_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                // Releases always go through so no button stays stuck.
                if !(pressed && consumed) {
                    self.stage.pointer_button(map_mouse_button(button), pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_NOTCH) as f32,
                };
                self.stage.wheel(notches);
            }
            WindowEvent::RedrawRequested => {
                let (panel, scene) = self.stage.panel_and_scene();
                renderer.prepare_overlay(panel, scene);
                if let Err(err) = self.stage.tick(renderer) {
                    self.fail(event_loop, err);
                    return;
                }
                renderer.window().request_redraw();
            }
            _ => {}
        }
    }
}

/// Runs the stage in a native window until it is closed.
#[cfg(not(target_arch = "wasm32"))]
pub fn run(config: StageConfig, event_loop: EventLoop<StageEvent>) -> anyhow::Result<()> {
    let viewport = Viewport::new(config.width, config.height, 1.0);
    let mut app = StageApp::new(config, viewport);
    event_loop
        .run_app(&mut app)
        .map_err(|err| StageError::Window {
            stage: "event loop",
            message: err.to_string(),
        })?;
    if let Some(err) = app.take_error() {
        return Err(err);
    }
    info!("Stage closed after {} frame(s)", app.stage().frames());
    Ok(())
}

/// Starts the stage on `canvas` and hands the loop to the browser.
#[cfg(target_arch = "wasm32")]
pub fn spawn(
    config: StageConfig,
    viewport: Viewport,
    canvas: web_sys::HtmlCanvasElement,
    event_loop: EventLoop<StageEvent>,
) {
    use winit::platform::web::EventLoopExtWebSys;

    let proxy = event_loop.create_proxy();
    let app = StageApp::new(config, viewport, canvas, proxy);
    event_loop.spawn_app(app);
}

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical = size.to_logical::<f64>(scale_factor);
    (logical.width.round() as u32, logical.height.round() as u32)
}

fn logical_position(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = position.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::LEFT,
        WinitMouseButton::Middle => MouseButton::MIDDLE,
        WinitMouseButton::Right => MouseButton::RIGHT,
        WinitMouseButton::Back => MouseButton::new(3),
        WinitMouseButton::Forward => MouseButton::new(4),
        WinitMouseButton::Other(index) => MouseButton::new(index.min(u16::from(u8::MAX)) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_size_divides_by_scale() {
        assert_eq!(logical_size(PhysicalSize::new(2560, 1440), 2.0), (1280, 720));
        assert_eq!(logical_size(PhysicalSize::new(1000, 0), 1.0), (1000, 0));
    }

    #[test]
    fn winit_buttons_map_to_stage_buttons() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::LEFT);
        assert_eq!(map_mouse_button(WinitMouseButton::Right), MouseButton::RIGHT);
        assert_eq!(map_mouse_button(WinitMouseButton::Other(900)).index(), u8::MAX);
    }
}
