use anyhow::Result;

use super::ctx::{FrameCtx, LoadCtx};

/// Control directive returned by per-frame app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application lifecycle contract implemented by the binary.
///
/// Callback order guaranteed by the runtime:
/// - `on_load` once, after the window and GPU context exist
/// - per frame: `on_update`, then `on_render` (skipped when update
///   requested exit)
/// - `on_resize` whenever the drawable size changes; may interleave
///   between any two frames
/// - `on_unload` exactly once while the window is closing
pub trait App {
    /// GPU resource creation. An `Err` aborts the run.
    fn on_load(&mut self, ctx: &mut LoadCtx<'_, '_>) -> Result<()>;

    /// Input handling. Return [`AppControl::Exit`] to request close.
    fn on_update(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Clear, draw, present.
    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Drawable size changed. Surface reconfiguration already happened
    /// in the runtime; this is a notification.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// GPU resource release.
    fn on_unload(&mut self) {}
}
