use std::path::Path;

use anyhow::Context;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {M} - {m}{n}";
const CONSOLE_PATTERN: &str = "{l} {M} - {m}{n}";

/// Build the log4rs configuration.
///
/// Logs go to `log_file` when given and to standard error otherwise, so that
/// standard output only ever carries metrics.
pub fn app_config(log_file: Option<&Path>, level: LevelFilter) -> anyhow::Result<Config> {
    let appender = match log_file {
        Some(path) => {
            let file = FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
                .build(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Appender::builder().build("app", Box::new(file))
        }
        None => {
            let console = ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
                .build();
            Appender::builder().build("app", Box::new(console))
        }
    };

    Config::builder()
        .appender(appender)
        .build(Root::builder().appender("app").build(level))
        .context("invalid logging configuration")
}
