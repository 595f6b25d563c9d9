//! Shared geometry and color types.
//!
//! The viewport is expressed in physical pixels with origin top-left,
//! matching the surface configuration and render-pass viewport.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
