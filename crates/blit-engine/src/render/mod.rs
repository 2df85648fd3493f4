//! GPU rendering subsystem.
//!
//! Renderers issue GPU commands via wgpu against a caller-provided target.
//! Each renderer owns its GPU resources (pipeline, uniform buffers, sampler).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod ctx;
mod sprite;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::SpriteRenderer;
pub use texture::Texture;
