use anyhow::Result;

use flowboard_engine::logging::{LoggingConfig, init_logging};

mod app;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    app::run(app::StudioConfig::default())
}
