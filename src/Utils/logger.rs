use crate::Utils::config::LogConfig;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;

/// Installs the global logger described by `config`: a terminal logger when `console` is set
/// and a file logger when `file` is given. Returns `Ok(false)` when nothing was installed,
/// either because no sink is configured or because a logger is already in place.
pub fn init_logger(config: &LogConfig) -> io::Result<bool> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if config.console {
        loggers.push(TermLogger::new(
            config.level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    if let Some(ref path) = config.file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(config.level, Config::default(), file));
    }

    if loggers.is_empty() {
        return Ok(false);
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}
