use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use promlint::lint::BUILTIN_RULES;
use promlint::{check_metrics, CheckStatus, LintConfig, Linter, Report};

mod cli;
mod logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(status) => ExitCode::from(status.exit_code() as u8),
        Err(err) => {
            if !cli.silent {
                eprintln!("{err:#}");
            }
            ExitCode::from(CheckStatus::ParseFailure.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<CheckStatus> {
    // a silent run stays silent unless logs go to a file
    let level = if cli.silent && cli.log_file.is_none() {
        LevelFilter::Off
    } else {
        cli.loglevel
    };
    log4rs::init_config(logging::app_config(cli.log_file.as_deref(), level)?)
        .context("cannot initialize logging")?;
    log::info!("Starting promlint {}", env!("CARGO_PKG_VERSION"));

    if cli.list_rules {
        for rule in BUILTIN_RULES {
            println!("{:<28} {}", rule.name, rule.description);
        }
        return Ok(CheckStatus::Clean);
    }

    let config = LintConfig {
        disabled_rules: cli.disabled_rules.clone(),
    };
    let linter = Linter::from_config(&config)?;
    log::debug!("linting with {} rules", linter.rules().len());

    let input = read_input(cli)?;
    let report = check_metrics(&input, &linter);
    if !cli.silent {
        output(&report);
    }
    Ok(report.status)
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    match &cli.file {
        Some(path) => {
            log::info!("Reading metrics from {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("cannot read metrics from {}", path.display()))
        }
        None => {
            log::info!("Reading metrics from standard input");
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("cannot read metrics from standard input")?;
            Ok(input)
        }
    }
}

/// Clean metrics go to stdout in canonical form; anything else is a list of
/// diagnostics on stderr.
fn output(report: &Report) {
    if report.status != CheckStatus::Clean {
        for line in &report.diagnostics {
            eprintln!("{line}");
        }
        return;
    }
    match report.render() {
        Ok(metrics) => print!("{metrics}"),
        Err(err) => {
            log::error!("cannot render metrics: {err}");
            eprintln!("{err}");
        }
    }
}
