use std::path::PathBuf;

use clap::Parser;
use clap::ValueHint;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Silent or quiet mode
    ///
    /// Print nothing; only the exit code tells whether the metrics are clean.
    #[arg(short, long, env = "PROMLINT_SILENT")]
    pub silent: bool,

    /// File to read metrics from
    ///
    /// Metrics in the text exposition format. Standard input is read when omitted.
    #[arg(short, long, value_hint=ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Disable a lint rule
    ///
    /// Can be given several times. Use --list-rules to see the rule names.
    #[arg(short, long = "disable", value_name = "RULE", value_hint=ValueHint::Other)]
    pub disabled_rules: Vec<String>,

    /// List the lint rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Set the logging level
    ///
    /// Log records at or above this level are written to standard error, or to --log-file.
    #[arg(short, long, env="LOG_LEVEL", value_hint=ValueHint::Other, default_value="WARN")]
    pub loglevel: log::LevelFilter,

    /// Write logs to this file instead of standard error
    #[arg(long, env="PROMLINT_LOG_FILE", value_hint=ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}
