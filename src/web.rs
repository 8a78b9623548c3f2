#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;
use winit::event_loop::EventLoop;

use crate::app::{self, StageEvent};
use crate::config::StageConfig;
use crate::error::StageError;
use crate::viewport::Viewport;

/// The page's drawing surface.
pub const CANVAS_SELECTOR: &str = "canvas.webgl";

#[wasm_bindgen(start)]
pub fn bootstrap() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = wasm_logger::init(wasm_logger::Config::default());

    start().map_err(|err| {
        log::error!("{err:#}");
        JsValue::from_str(&format!("{err:#}"))
    })
}

fn start() -> anyhow::Result<()> {
    let window = web_sys::window().ok_or(StageError::Window {
        stage: "browser window",
        message: "no global `window`".to_string(),
    })?;
    let canvas = find_canvas(&window)?;

    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);
    let viewport = Viewport::new(width as u32, height as u32, window.device_pixel_ratio());
    log::info!(
        "Starting on {CANVAS_SELECTOR} at {}x{} @ {:.2}",
        viewport.width,
        viewport.height,
        viewport.device_pixel_ratio
    );

    let config = StageConfig {
        width: viewport.width,
        height: viewport.height,
        ..StageConfig::default()
    };

    let event_loop = EventLoop::<StageEvent>::with_user_event()
        .build()
        .map_err(|err| StageError::Window {
            stage: "event loop",
            message: err.to_string(),
        })?;
    app::spawn(config, viewport, canvas, event_loop);
    Ok(())
}

fn find_canvas(window: &web_sys::Window) -> Result<HtmlCanvasElement, StageError> {
    let missing = || StageError::CanvasNotFound(CANVAS_SELECTOR.to_string());
    let document = window.document().ok_or_else(missing)?;
    let element = document
        .query_selector(CANVAS_SELECTOR)
        .ok()
        .flatten()
        .ok_or_else(missing)?;
    element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| StageError::NotACanvas(CANVAS_SELECTOR.to_string()))
}
