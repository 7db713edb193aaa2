use crate::{
    camera::{CameraController, OrbitCamera},
    data::model::load_gltf_model,
    data::types::ModelGpu,
    hotspot::{HotspotSet, Viewport},
    presets::{self, ModelPreset},
    renderer::Renderer,
    ui,
};
use anyhow::Result;
use glam::Vec3;
use std::path::Path;
use std::sync::Arc;
use winit::{event::WindowEvent, window::Window};

/// Vertical field of view, degrees.
const FOV_Y_DEG: f32 = 100.0;

/// The application context: every piece of mutable state the viewer needs,
/// owned in one place and handed to the event loop.
pub struct App {
    pub renderer: Renderer,
    pub camera: OrbitCamera,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub model: Option<ModelGpu>,
    pub hotspots: HotspotSet,
    preset: &'static ModelPreset,
    model_name: String,
}

impl App {
    pub async fn new(window: Arc<Window>, model_name: &str) -> Result<Self> {
        let renderer = Renderer::new(window.clone()).await?;
        let size = renderer.gfx.size;

        let preset = presets::preset_for(model_name);
        let camera = OrbitCamera::new(
            Vec3::ZERO,
            preset.camera_distance,
            FOV_Y_DEG,
            size.width as f32 / size.height.max(1) as f32,
        );
        let camera_controller = CameraController::new(preset.orbit);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        // The application is the external observer for hotspot clicks.
        let hotspots = HotspotSet::new(|label: &str| {
            log::info!("Clicked on hotspot: {label}");
        });

        Ok(Self {
            renderer,
            camera,
            camera_controller,
            egui_ctx,
            egui_state,
            model: None,
            hotspots,
            preset,
            model_name: model_name.to_string(),
        })
    }

    fn viewport(&self) -> Viewport {
        let size = self.renderer.gfx.size;
        Viewport::new(size.width as f32, size.height as f32)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera
                .set_aspect(new_size.width as f32 / new_size.height as f32);
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        self.camera_controller.handle_event(event, &mut self.camera);

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    /// Loads the configured model and, on success, creates its preset
    /// hotspots with positions consistent with the current camera. On
    /// failure the scene simply stays empty.
    pub fn load_model(&mut self, models_dir: &Path) -> Result<()> {
        let path = presets::model_path(models_dir, &self.model_name);
        let model = load_gltf_model(
            &self.renderer.gfx.device,
            &self.renderer.mesh.scene_layout,
            &self.camera,
            &path,
            self.preset.ambient_intensity,
        )?;
        self.model = Some(model);

        let viewport = self.viewport();
        for anchor in self.preset.hotspots {
            self.hotspots
                .create(anchor.position, anchor.label, &self.camera, viewport);
        }

        Ok(())
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame scene uniform from the camera as of this frame.
        if let Some(model) = &self.model {
            let scene_uniform = self
                .camera
                .make_scene_uniform(self.preset.ambient_intensity);
            self.renderer
                .gfx
                .queue
                .write_buffer(&model.ubo, 0, bytemuck::bytes_of(&scene_uniform));
        }

        // Hotspot positions must come from the same camera state the scene
        // is drawn with.
        self.hotspots
            .update_positions(&self.camera, self.viewport());

        self.renderer.render(&swap_view, self.model.as_ref());

        // Overlay: hotspot labels + HUD, then dispatch any clicks.
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let clicked = ui::draw_hotspots(&self.egui_ctx, &self.hotspots);
        ui::draw_hud(&self.egui_ctx, &self.model_name, self.hotspots.len());

        let egui_output = self.egui_ctx.end_frame();
        for index in clicked {
            self.hotspots.notify_clicked(index);
        }

        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
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
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
