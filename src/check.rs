use crate::lint::Linter;
use crate::prom::{self, MetricFamily, SerializeError};

/// Outcome of a check, mapped onto the process exit codes tooling relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Clean,
    ParseFailure,
    Problems,
}

impl CheckStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            CheckStatus::Clean => 0,
            CheckStatus::ParseFailure => 1,
            CheckStatus::Problems => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub status: CheckStatus,
    /// One line per lint problem, or the single parse error.
    pub diagnostics: Vec<String>,
    /// The input after normalization, which is what was parsed.
    pub normalized: String,
    /// Parsed families; empty when parsing failed.
    pub families: Vec<MetricFamily>,
}

impl Report {
    /// Canonical exposition text for the parsed families.
    pub fn render(&self) -> Result<String, SerializeError> {
        prom::serialize(&self.families)
    }
}

/// Normalize, parse and lint raw exposition text.
///
/// A parse error stops the pipeline before linting.
pub fn check_metrics(input: &str, linter: &Linter) -> Report {
    let normalized = prom::normalize(input);

    let families = match prom::parse(&normalized) {
        Ok(families) => families,
        Err(err) => {
            log::info!("input failed to parse: {err}");
            return Report {
                status: CheckStatus::ParseFailure,
                diagnostics: vec![format!("error while linting: {err}")],
                normalized,
                families: Vec::new(),
            };
        }
    };

    let problems = linter.lint(&families);
    let status = if problems.is_empty() {
        CheckStatus::Clean
    } else {
        CheckStatus::Problems
    };
    log::info!(
        "checked {} metric families: {:?} with {} problems",
        families.len(),
        status,
        problems.len()
    );

    Report {
        status,
        diagnostics: problems.iter().map(ToString::to_string).collect(),
        normalized,
        families,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prom::test_data::COMPLETE_EXPOSITION;

    #[test]
    fn clean_input() {
        let report = check_metrics(COMPLETE_EXPOSITION, &Linter::default());
        assert_eq!(report.status, CheckStatus::Clean);
        assert_eq!(report.status.exit_code(), 0);
        assert!(report.diagnostics.is_empty());
        let expected = COMPLETE_EXPOSITION
            .replace("2.4576e+07", "24576000")
            .replace("1.7560473e+07", "17560473");
        assert_eq!(report.render().unwrap(), expected);
    }

    #[test]
    fn missing_help_is_a_single_problem() {
        let input = "# TYPE http_requests_total counter\nhttp_requests_total{code=\"200\"} 1027\n";
        let report = check_metrics(input, &Linter::default());
        assert_eq!(report.status, CheckStatus::Problems);
        assert_eq!(report.status.exit_code(), 3);
        assert_eq!(report.diagnostics, vec!["http_requests_total no help text"]);
        assert_eq!(report.render().unwrap(), input);
    }

    #[test]
    fn invalid_float_stops_before_linting() {
        let input = "# TYPE fooBar counter\nfooBar 10a27\n";
        let report = check_metrics(input, &Linter::default());
        assert_eq!(report.status, CheckStatus::ParseFailure);
        assert_eq!(report.status.exit_code(), 1);
        assert_eq!(
            report.diagnostics,
            vec![
                "error while linting: text format parsing error in line 2: \
                 expected float as value, got \"10a27\""
            ]
        );
        assert!(report.families.is_empty());
        assert_eq!(report.render().unwrap(), "");
    }

    #[test]
    fn empty_input_is_clean() {
        let report = check_metrics("", &Linter::default());
        assert_eq!(report.status, CheckStatus::Clean);
        assert_eq!(report.normalized, "\n");
        assert_eq!(report.render().unwrap(), "");
    }

    #[test]
    fn duplicate_lines_are_normalized_away() {
        let input = "# HELP up_info Up.\r\n# TYPE up_info gauge\r\n\
                     # HELP up_info Up.\r\nup_info 1\r\nup_info 1\r\n";
        let report = check_metrics(input, &Linter::default());
        assert_eq!(report.status, CheckStatus::Clean);
        assert_eq!(
            report.render().unwrap(),
            "# HELP up_info Up.\n# TYPE up_info gauge\nup_info 1\n"
        );
    }

    #[test]
    fn repeated_runs_agree() {
        let input = "requestCount_ms{__x=\"1\"} 1\n# TYPE a_total gauge\na_total 1\n";
        let first = check_metrics(input, &Linter::default());
        let second = check_metrics(input, &Linter::default());
        assert_eq!(first.status, CheckStatus::Problems);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
