use std::path::Path;
use std::process::ExitCode;

use orbit_engine::logging::{init_logging, LoggingConfig};
use orbit_engine::pipeline::{self, PipelineConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let shader_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"));
    match pipeline::run(PipelineConfig::color_cube(shader_dir)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
