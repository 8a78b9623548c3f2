use egui::{Align2, ClippedPrimitive, CollapsingHeader, RawInput, TexturesDelta};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::color::Color;
use crate::scene::Scene;
use crate::tweaks::{Control, Folder, TweakPanel, Value};

/// egui layer drawing the tweak panel over the scene.
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pending: Option<OverlayFrame>,
}

struct OverlayFrame {
    primitives: Vec<ClippedPrimitive>,
    textures: TexturesDelta,
    pixels_per_point: f32,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            state,
            renderer,
            pending: None,
        }
    }

    /// Returns true when the panel used the event and the scene should not
    /// see it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Lays out the panel, applying any edits to `scene`. The result is
    /// painted by the next [`paint`](Self::paint) at `pixels_per_point`
    /// surface pixels per logical point.
    pub fn run(
        &mut self,
        window: &Window,
        pixels_per_point: f64,
        panel: &TweakPanel,
        scene: &mut Scene,
    ) {
        let raw_input = at_surface_density(self.state.take_egui_input(window), pixels_per_point);
        let full_output = self.ctx.run(raw_input, |ctx| show_panel(ctx, panel, scene));
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self.ctx.tessellate(full_output.shapes, pixels_per_point);
        let mut textures = full_output.textures_delta;
        // A frame that was never painted still owes its texture uploads.
        if let Some(mut skipped) = self.pending.take() {
            skipped.textures.append(textures);
            textures = skipped.textures;
        }
        self.pending = Some(OverlayFrame {
            primitives,
            textures,
            pixels_per_point,
        });
    }

    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) {
        let Some(frame) = self.pending.take() else {
            return;
        };
        for (id, image_delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };
        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &screen_descriptor,
        );

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut pass.forget_lifetime(), &frame.primitives, &screen_descriptor);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
    }
}

/// egui-winit lays out in logical points and reports the window's scale
/// factor as the native density. The surface may be drawn at a different
/// density, so that one is used for rasterizing and painting instead. The
/// screen rect and pointer positions stay in logical points.
fn at_surface_density(mut raw_input: RawInput, pixels_per_point: f64) -> RawInput {
    if pixels_per_point > 0.0 {
        raw_input
            .viewports
            .entry(raw_input.viewport_id)
            .or_default()
            .native_pixels_per_point = Some(pixels_per_point as f32);
    }
    raw_input
}

fn show_panel(ctx: &egui::Context, panel: &TweakPanel, scene: &mut Scene) {
    egui::Window::new(panel.title.as_str())
        .anchor(Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, folder) in panel.folders.iter().enumerate() {
                    show_folder(ui, folder, &index.to_string(), scene);
                }
            });
        });
}

fn show_folder(ui: &mut egui::Ui, folder: &Folder, path: &str, scene: &mut Scene) {
    CollapsingHeader::new(folder.title.as_str())
        .id_salt(path)
        .default_open(folder.open)
        .show(ui, |ui| {
            for control in &folder.controls {
                show_control(ui, control, scene);
            }
            for (index, child) in folder.folders.iter().enumerate() {
                show_folder(ui, child, &format!("{path}/{index}"), scene);
            }
        });
}

fn show_control(ui: &mut egui::Ui, control: &Control, scene: &mut Scene) {
    let Some(current) = control.field().read(scene) else {
        return;
    };
    let edited = match (control, current) {
        (
            Control::Slider {
                label,
                min,
                max,
                step,
                ..
            },
            Value::Number(mut number),
        ) => {
            let slider = egui::Slider::new(&mut number, *min..=*max)
                .step_by(f64::from(*step))
                .text(label.as_str());
            ui.add(slider).changed().then_some(Value::Number(number))
        }
        (Control::Color { label, .. }, Value::Color(color)) => {
            let mut srgb = to_srgb8(color);
            let changed = ui
                .horizontal(|ui| {
                    let changed = ui.color_edit_button_srgb(&mut srgb).changed();
                    ui.label(label.as_str());
                    changed
                })
                .inner;
            changed.then(|| Value::Color(from_srgb8(srgb)))
        }
        (Control::Toggle { label, .. }, Value::Flag(mut on)) => ui
            .checkbox(&mut on, label.as_str())
            .changed()
            .then_some(Value::Flag(on)),
        _ => None,
    };
    if let Some(value) = edited {
        control.apply(scene, value);
    }
}

fn to_srgb8(color: Color) -> [u8; 3] {
    let hex = color.to_hex();
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

fn from_srgb8([r, g, b]: [u8; 3]) -> Color {
    Color::from_hex(u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb8_round_trips_hex_colors() {
        let color = Color::from_hex(0x4e00ff);
        assert_eq!(to_srgb8(color), [0x4e, 0x00, 0xff]);
        assert_eq!(from_srgb8(to_srgb8(color)), color);
    }

    #[test]
    fn layout_without_input_leaves_scene_untouched() {
        let ctx = egui::Context::default();
        let mut scene = Scene::showcase();
        let panel = TweakPanel::for_scene(&scene);
        let before: Vec<_> = scene.lights().to_vec();
        let _ = ctx.run(egui::RawInput::default(), |ctx| show_panel(ctx, &panel, &mut scene));
        assert_eq!(scene.lights(), before.as_slice());
    }

    /// Input as egui-winit builds it for a 1280x720 logical window at 300%.
    fn input_at_scale_three() -> RawInput {
        let mut raw_input = RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            ..RawInput::default()
        };
        raw_input
            .viewports
            .entry(raw_input.viewport_id)
            .or_default()
            .native_pixels_per_point = Some(3.0);
        raw_input
    }

    #[test]
    fn capped_density_keeps_the_panel_on_the_surface() {
        let ctx = egui::Context::default();
        let mut scene = Scene::showcase();
        let panel = TweakPanel::for_scene(&scene);

        let mut output = None;
        for _ in 0..2 {
            let raw_input = at_surface_density(input_at_scale_three(), 2.0);
            output = Some(ctx.run(raw_input, |ctx| show_panel(ctx, &panel, &mut scene)));
        }
        let output = output.expect("ran a frame");

        assert_eq!(output.pixels_per_point, 2.0);

        // Layout stays in the window's 1280 logical points.
        let used = ctx.used_rect();
        assert!(used.width() > 0.0);
        assert!(used.max.x <= 1280.5, "panel ends at {}", used.max.x);
        assert!(used.min.x >= 0.0);

        // Everything the painter draws lands inside a 2560x1440 surface.
        let surface_width = 1280.0 * output.pixels_per_point;
        let primitives = ctx.tessellate(output.shapes, output.pixels_per_point);
        assert!(!primitives.is_empty());
        for primitive in &primitives {
            assert!(primitive.clip_rect.max.x * output.pixels_per_point <= surface_width + 1.0);
        }
    }

    #[test]
    fn native_density_is_left_alone_without_a_ratio() {
        let raw_input = at_surface_density(input_at_scale_three(), 0.0);
        let viewport = &raw_input.viewports[&raw_input.viewport_id];
        assert_eq!(viewport.native_pixels_per_point, Some(3.0));
    }
}
