//! Entry point for the product viewer application.

use anyhow::Result;
use clap::Parser;
use product_viewer::app::App;
use std::{path::PathBuf, sync::Arc};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

#[derive(Parser, Debug)]
#[command(about = "3D product viewer with clickable hotspots")]
struct Args {
    /// Model name; assets are expected at <models-dir>/<name>/scene.gltf.
    #[arg(long, default_value = product_viewer::presets::DEFAULT_MODEL_NAME)]
    model: String,

    /// Directory holding the model assets.
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Create the event loop and window.
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Product Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_transparent(true)
            .build(&event_loop)?,
    );

    // Initialise the application (async → sync).
    let mut app = pollster::block_on(App::new(window.clone(), &args.model))?;

    // Load the model; a failure leaves the scene empty but the viewer running.
    if let Err(err) = app.load_model(&args.models_dir) {
        log::error!("Failed to load model '{}': {err:#}", args.model);
    }

    // Run the winit event loop until the window closes or Escape is pressed.
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Forward events to the app; handle unconsumed window events.
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => match app.render(&window) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => {
                                app.resize(app.renderer.gfx.size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("WGPU out of memory – exiting.");
                                elwt.exit();
                            }
                            Err(e) => log::error!("Render error: {:?}", e),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // Request a redraw each frame.
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
