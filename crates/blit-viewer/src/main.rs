//! One-shot textured-quad viewer.
//!
//! Opens an 800x600 window, uploads `texture.png`, draws it once per frame at
//! a fixed pixel-space rectangle, and exits after a short hold.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::RgbaImage;
use winit::dpi::LogicalSize;

use blit_engine::coords::Rect;
use blit_engine::core::{App, AppControl, FrameCtx};
use blit_engine::device::GpuInit;
use blit_engine::image_loader;
use blit_engine::logging::{init_logging, LoggingConfig};
use blit_engine::render::{SpriteRenderer, Texture};
use blit_engine::window::{Runtime, RuntimeConfig};

const TEXTURE_PATH: &str = "texture.png";
const DEST: Rect = Rect::new(50.0, 100.0, 512.0, 512.0);
const HOLD: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let image = image_loader::load_rgba(TEXTURE_PATH)
        .with_context(|| format!("the viewer expects '{TEXTURE_PATH}' in the working directory"))?;
    log::info!(
        "decoded '{TEXTURE_PATH}' ({}x{})",
        image.width(),
        image.height()
    );

    Runtime::run(
        RuntimeConfig {
            title: "blit viewer".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        },
        GpuInit::default(),
        ViewerApp::new(image, DEST, Some(HOLD)),
    )
}

/// Draws one texture into one rectangle, then asks the runtime to exit once
/// the hold duration has elapsed.
struct ViewerApp {
    /// Decoded pixels, consumed by the first frame's GPU upload.
    image: Option<RgbaImage>,
    sprite: Option<Texture>,
    renderer: SpriteRenderer,

    dest: Rect,
    hold: Option<Duration>,
    shown_since: Option<Instant>,
}

impl ViewerApp {
    fn new(image: RgbaImage, dest: Rect, hold: Option<Duration>) -> Self {
        Self {
            image: Some(image),
            sprite: None,
            renderer: SpriteRenderer::new(),
            dest,
            hold,
            shown_since: None,
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // The texture needs a live device, so the upload happens on the first
        // frame rather than in main().
        if self.sprite.is_none() {
            let Some(image) = self.image.take() else {
                return AppControl::Exit;
            };

            match Texture::from_image(ctx.gpu.device(), ctx.gpu.queue(), &image) {
                Ok(t) => {
                    log::info!("uploaded {}x{} texture", t.width(), t.height());
                    self.sprite = Some(t);
                }
                Err(e) => {
                    log::error!("texture upload failed: {e:#}");
                    return AppControl::Exit;
                }
            }
        }

        let Some(sprite) = self.sprite.as_ref() else {
            return AppControl::Exit;
        };

        let renderer = &mut self.renderer;
        let dest = self.dest;

        let control = ctx.render(wgpu::Color::BLACK, |rctx, target| {
            renderer.draw(rctx, target, sprite, dest);
        });
        if control == AppControl::Exit {
            return control;
        }

        // Hold timer runs from the first presented frame.
        let shown_since = *self.shown_since.get_or_insert(ctx.time.now);
        if let Some(hold) = self.hold {
            if ctx.time.now.duration_since(shown_since) >= hold {
                log::info!("hold of {hold:?} elapsed; exiting");
                return AppControl::Exit;
            }
        }

        AppControl::Continue
    }
}
