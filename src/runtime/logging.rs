use std::fs::File;

use simplelog::{CombinedLogger, Config, LevelFilter, WriteLogger};

use crate::config::LoggingSettings;

/// Log to a file; the terminal belongs to the TUI.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Box<dyn std::error::Error>> {
    let level = settings
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);

    CombinedLogger::init(vec![WriteLogger::new(
        level,
        Config::default(),
        File::create(&settings.file)?,
    )])?;

    log::info!("droplist {} logging to {}", env!("CARGO_PKG_VERSION"), settings.file.display());
    Ok(())
}
