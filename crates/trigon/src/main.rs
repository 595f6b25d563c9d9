use std::path::PathBuf;

use anyhow::Result;

use trigon_engine::device::GpuInit;
use trigon_engine::logging::{init_logging, LoggingConfig};
use trigon_engine::window::{LogicalSize, Runtime, RuntimeConfig};

mod host;

use host::RenderHost;

const WINDOW_TITLE: &str = "trigon";
const WINDOW_WIDTH: f64 = 1024.0;
const WINDOW_HEIGHT: f64 = 700.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: WINDOW_TITLE.to_string(),
        initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
        center: true,
    };

    let shader_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders");

    Runtime::run(config, GpuInit::default(), RenderHost::new(shader_dir))
}
