use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, LoadCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Center the window on its monitor after creation.
    pub center: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(1024.0, 700.0),
            center: false,
        }
    }
}

/// Runtime command surface passed to app callbacks.
///
/// Requests are buffered and honored after the current callback returns,
/// at the loop iteration boundary.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit_requested: bool,
}

impl RuntimeCtx {
    /// Requests loop termination (window close + unload).
    ///
    /// Idempotent: repeated calls within one callback collapse into a
    /// single close request.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs the app lifecycle, and blocks until close.
    ///
    /// Window/GPU construction failures and `on_load` errors are returned
    /// to the caller after the loop winds down.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.fatal.take() {
            return Err(err);
        }

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Lifecycle phases of the single window, in order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Uninitialized,
    Loaded,
    Unloaded,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    phase: Phase,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            phase: Phase::Uninitialized,
            fatal: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        if self.config.center {
            center_window(&window);
        }

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.entry = Some(entry);
        Ok(())
    }

    fn load_app(&mut self) -> Result<()> {
        let (app, entry) = (&mut self.app, self.entry.as_ref());
        let Some(entry) = entry else {
            return Ok(());
        };

        entry.with_gpu(|gpu| {
            let mut ctx = LoadCtx { gpu };
            app.on_load(&mut ctx)
        })
    }

    /// Tears the window down: unload (once, only if loaded), release the
    /// entry, stop the loop.
    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase == Phase::Loaded {
            self.app.on_unload();
        }
        self.phase = Phase::Unloaded;
        self.entry = None;
        event_loop.exit();
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.entry = None;
        self.phase = Phase::Unloaded;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.phase != Phase::Uninitialized {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.abort(event_loop, err);
            return;
        }

        if let Err(err) = self.load_app() {
            self.abort(event_loop, err.context("app load failed"));
            return;
        }

        self.phase = Phase::Loaded;

        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase == Phase::Unloaded {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: this program re-renders every frame.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        match &event {
            WindowEvent::CloseRequested => {
                self.finish(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
                self.app.on_resize(new_size.width, new_size.height);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
                self.app.on_resize(new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut control = AppControl::Continue;

                // Split borrows: `app` must be usable inside the ouroboros
                // closure over `entry`.
                let app = &mut self.app;

                entry.with_mut(|fields| {
                    let ft: FrameTime = fields.clock.tick();

                    // Scope so `ctx` drops before frame state is mutated.
                    {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                id: window_id,
                                window: fields.window,
                            },
                            gpu: fields.gpu,
                            input: fields.input_state,
                            input_frame: fields.input_frame,
                            time: ft,
                            runtime: &mut runtime_ctx,
                        };

                        control = app.on_update(&mut ctx);

                        // Update requesting exit skips rendering; the close
                        // is honored at this loop boundary.
                        if control == AppControl::Continue && !ctx.runtime.exit_requested() {
                            control = app.on_render(&mut ctx);
                        }
                    }

                    fields.input_frame.clear();
                });

                if control == AppControl::Exit || runtime_ctx.exit_requested() {
                    self.finish(event_loop);
                }
            }

            _ => {}
        }
    }
}

/// Centers `window` on its current (or primary) monitor.
///
/// Best effort: monitors can be unavailable on some platforms (Wayland),
/// in which case the window manager placement stands.
fn center_window(window: &Window) {
    let Some(monitor) = window.current_monitor().or_else(|| window.primary_monitor()) else {
        return;
    };

    let monitor_size = monitor.size();
    if monitor_size.width == 0 || monitor_size.height == 0 {
        return;
    }

    let monitor_pos = monitor.position();
    let outer = window.outer_size();

    let x = monitor_pos.x + (monitor_size.width.saturating_sub(outer.width) / 2) as i32;
    let y = monitor_pos.y + (monitor_size.height.saturating_sub(outer.height) / 2) as i32;

    window.set_outer_position(PhysicalPosition::new(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_bootstrap_window() {
        let config = RuntimeConfig::default();
        assert_eq!(config.initial_size, LogicalSize::new(1024.0, 700.0));
        assert!(!config.title.is_empty());
    }

    #[test]
    fn exit_request_is_idempotent() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.exit_requested());

        ctx.exit();
        ctx.exit();

        assert!(ctx.exit_requested());
    }
}
