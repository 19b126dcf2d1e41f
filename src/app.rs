use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use software_rasterizer::io::config::Config;
use software_rasterizer::pipeline::shaders::ShadingMode;
use software_rasterizer::scene::camera::CameraInput;
use software_rasterizer::scene::loader::build_renderer;
use std::path::PathBuf;
use std::time::Instant;

/// Headless CPU rasterizer: renders a TOML-described scene to an image file.
#[derive(Parser, Debug)]
#[command(name = "software-rasterizer", version)]
pub struct Cli {
    /// Scene configuration (TOML). Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output image; the format follows the extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of fixed-timestep frames to simulate before saving.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Shading mode of the saved frame.
    #[arg(long, value_enum)]
    pub mode: Option<ShadingMode>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// Keep the model still.
    #[arg(long)]
    pub no_rotate: bool,
}

impl Cli {
    /// Loads the config file (or defaults) and applies the command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config file: {:?}", path);
                Config::load(path).with_context(|| format!("invalid scene config {:?}", path))?
            }
            None => {
                info!("No config file given. Using default settings.");
                Config::default()
            }
        };

        if let Some(output) = &self.output {
            config.render.output = output.to_string_lossy().into_owned();
        }
        if let Some(frames) = self.frames {
            config.render.frames = frames;
        }
        if let Some(mode) = self.mode {
            config.render.shading_mode = mode;
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if self.no_rotate {
            config.render.rotate = false;
        }
        Ok(config)
    }
}

/// Runs the requested number of frames and saves the last color buffer.
pub fn run_cli(config: &Config) -> Result<()> {
    anyhow::ensure!(
        config.render.width > 0 && config.render.height > 0,
        "output size must be non-zero, got {}x{}",
        config.render.width,
        config.render.height
    );

    let start_time = Instant::now();
    let mut renderer = build_renderer(config);
    let input = CameraInput::default();

    let frames = config.render.frames.max(1);
    for frame in 0..frames {
        renderer.update(config.render.frame_time, &input);
        renderer.render();
        debug!("Frame {}/{} done", frame + 1, frames);
    }

    info!(
        "Rendered {} frame(s) in {} mode in {:.2?}",
        frames,
        renderer.shading_mode().label(),
        start_time.elapsed()
    );

    let output = &config.render.output;
    renderer
        .save_buffer_to_image(output)
        .with_context(|| format!("could not write '{}'", output))?;
    println!("Render saved to {}", output);
    Ok(())
}
