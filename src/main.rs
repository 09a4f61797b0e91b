use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::{info, warn};
use whitted::{config::RenderConfig, scene, FrameBuffer};

mod cli;

use cli::Args;

const DEFAULT_OUTPUT: &str = "whitted.png";

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    info!("whitted {}", env!("CARGO_PKG_VERSION"));

    let mut config = if args.config.exists() {
        RenderConfig::load(&args.config)?
    } else {
        warn!("{} not found, using defaults", args.config.display());
        RenderConfig::default()
    };
    if let Some(divisions) = args.divisions {
        config.plane.divisions = divisions;
    }
    config.validate()?;
    info!(
        "eye {:?}, plane {} x {} at distance {}, {} divisions",
        config.eye,
        config.plane.width,
        config.plane.height,
        config.plane.distance,
        config.plane.divisions
    );

    let scene = scene::reference();
    let camera = config.camera();
    let mut frame_buffer = camera.frame();
    camera.render(&scene, &mut frame_buffer);

    let windowed = cfg!(feature = "window") && !args.headless;
    let output = args
        .output
        .or_else(|| (!windowed).then(|| PathBuf::from(DEFAULT_OUTPUT)));
    if let Some(path) = output {
        frame_buffer.save_png(&path)?;
        info!("wrote {}", path.display());
    }

    if windowed {
        show(&frame_buffer)?;
    }
    Ok(())
}

#[cfg(feature = "window")]
fn show(frame_buffer: &FrameBuffer) -> Result<(), Box<dyn Error>> {
    let width = frame_buffer.width() as u32;
    let height = frame_buffer.height() as u32;
    let sdl2_context = sdl2::init()?;
    let mut canvas = sdl2_context
        .video()?
        .window("whitted", width, height)
        .position_centered()
        .build()?
        .into_canvas()
        .build()?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator.create_texture_streaming(
        sdl2::pixels::PixelFormatEnum::RGBA32,
        width,
        height,
    )?;
    let mut events = sdl2_context.event_pump()?;

    texture.update(
        sdl2::rect::Rect::new(0, 0, width, height),
        frame_buffer.pixel_data(),
        frame_buffer.width() * 4,
    )?;
    canvas.copy(&texture, None, None)?;
    canvas.present();

    loop {
        match events.wait_event() {
            sdl2::event::Event::Quit { .. } => break,
            _ => continue,
        }
    }
    Ok(())
}

#[cfg(not(feature = "window"))]
fn show(_: &FrameBuffer) -> Result<(), Box<dyn Error>> {
    Ok(())
}
