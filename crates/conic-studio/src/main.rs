//! Conic studio: two draggable triangles over an orbiting particle ring.
//!
//! Drag a triangle to move it, click to highlight it, drag empty space to
//! orbit the camera and scroll to zoom. The camera is saved on exit.

mod shaders;
mod studio;

use anyhow::Result;
use winit::dpi::LogicalSize;

use conic_engine::compile::diagnostics::{self, Severity};
use conic_engine::device::GpuInit;
use conic_engine::logging::{init_logging, LoggingConfig};
use conic_engine::perspective::FileStore;
use conic_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    diagnostics::set_diagnostic_sink(|diags, source| {
        for d in diags.iter().filter(|d| d.severity == Severity::Error) {
            let Some((line, _)) = d.location else { continue };
            if let Some(text) = source.lines().nth(line.saturating_sub(1) as usize) {
                eprintln!("  {line:>4} | {text}");
            }
        }
    });

    let store = FileStore::open(std::env::temp_dir().join("conic-studio.json"));

    Runtime::run(
        RuntimeConfig {
            title: "Conic Studio".to_string(),
            initial_size: LogicalSize::new(960.0, 640.0),
        },
        GpuInit::default(),
        studio::Studio::new(store),
    )
}
