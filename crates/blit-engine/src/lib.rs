//! Blit engine crate.
//!
//! A minimal windowed GPU runtime plus a textured-quad (sprite) renderer.
//! Geometry is expressed in logical pixels (top-left origin, +Y down); the
//! vertex shader converts to NDC against a viewport uniform.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod image_loader;
