use std::path::PathBuf;

use anyhow::{Context, Result};

use trigon_engine::coords::ColorRgba;
use trigon_engine::core::{App, AppControl, FrameCtx, LoadCtx};
use trigon_engine::input::Key;
use trigon_engine::render::{TriangleRenderer, Vertex};
use trigon_engine::shader;

/// Background color for every frame.
const CLEAR_COLOR: ColorRgba = ColorRgba::new(0.6, 0.3, 1.0, 1.0);

/// Shader file names, resolved against the host's shader directory.
const VERTEX_SHADER: &str = "triangle.vert.wgsl";
const FRAGMENT_SHADER: &str = "triangle.frag.wgsl";

/// The triangle, one vertex per row: apex top-center, base at the bottom.
const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.5, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0] },
];

/// The application: owns the triangle data and its GPU resources.
///
/// `renderer` is `Some` exactly between load and unload; every GPU resource
/// lives inside it, so there is no partial-lifetime state to observe.
pub struct RenderHost {
    shader_dir: PathBuf,
    renderer: Option<TriangleRenderer>,
}

impl RenderHost {
    pub fn new(shader_dir: PathBuf) -> Self {
        Self {
            shader_dir,
            renderer: None,
        }
    }
}

impl App for RenderHost {
    fn on_load(&mut self, ctx: &mut LoadCtx<'_, '_>) -> Result<()> {
        let vertex_src = shader::load_source(&self.shader_dir, VERTEX_SHADER);
        let fragment_src = shader::load_source(&self.shader_dir, FRAGMENT_SHADER);

        let renderer = TriangleRenderer::new(
            ctx.gpu.device(),
            ctx.gpu.surface_format(),
            &TRIANGLE,
            &vertex_src,
            &fragment_src,
        )
        .context("failed to build the triangle pipeline")?;

        self.renderer = Some(renderer);
        log::info!("render host loaded ({} vertices)", TRIANGLE.len());
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            ctx.runtime.exit();
        }
        AppControl::Continue
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_ref() else {
            return AppControl::Continue;
        };

        ctx.render(CLEAR_COLOR, |rctx, target| renderer.render(rctx, target))
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        log::debug!("resized to {width}x{height}");
    }

    fn on_unload(&mut self) {
        // Dropping the renderer releases the vertex buffer and pipeline.
        self.renderer = None;
        log::info!("render host unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_exactly_nine_fixed_floats() {
        let flat: Vec<f32> = TRIANGLE.iter().flat_map(|v| v.position).collect();
        assert_eq!(
            flat,
            [0.0, 0.5, 0.0, -0.5, -0.5, 0.0, 0.5, -0.5, 0.0]
        );
    }

    #[test]
    fn apex_is_top_center_base_below() {
        let [apex, left, right] = TRIANGLE;
        assert_eq!(apex.position[0], 0.0);
        assert!(apex.position[1] > left.position[1]);
        assert!(apex.position[1] > right.position[1]);
        assert_eq!(left.position[1], right.position[1]);
    }

    #[test]
    fn clear_color_is_fixed() {
        assert_eq!(CLEAR_COLOR, ColorRgba::new(0.6, 0.3, 1.0, 1.0));
    }

    #[test]
    fn host_owns_no_gpu_resources_before_load() {
        let host = RenderHost::new(PathBuf::from("shaders"));
        assert!(host.renderer.is_none());
    }
}
