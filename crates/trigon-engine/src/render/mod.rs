//! GPU rendering subsystem.
//!
//! The triangle renderer owns its GPU resources (vertex buffer, pipeline)
//! for its whole lifetime: created in `new`, released on drop.

mod ctx;
mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::{TriangleRenderer, Vertex};
