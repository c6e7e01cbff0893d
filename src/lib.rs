//! Lint metrics written in the Prometheus text exposition format.
//!
//! Raw text is normalized, parsed into [`prom::MetricFamily`] values and run
//! through a [`lint::Linter`]. [`check::check_metrics`] ties the steps together
//! and maps the outcome onto an exit status.

pub mod check;
pub mod lint;
pub mod prom;

pub use check::{check_metrics, CheckStatus, Report};
pub use lint::{LintConfig, Linter, Problem};
