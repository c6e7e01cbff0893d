use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{Problem, Rule};
use crate::prom::{Label, MetricFamily, MetricType};

pub static BUILTIN_RULES: &[Rule] = &[
    Rule {
        name: "help",
        description: "every metric family has HELP text",
        check: lint_help,
    },
    Rule {
        name: "units",
        description: "metric names use base units",
        check: lint_metric_units,
    },
    Rule {
        name: "counter",
        description: "only counters carry the _total suffix, and all counters do",
        check: lint_counter,
    },
    Rule {
        name: "histogram-summary-reserved",
        description: "_bucket, _count, _sum, le and quantile are left to histograms and summaries",
        check: lint_histogram_summary_reserved,
    },
    Rule {
        name: "type-in-name",
        description: "metric names do not repeat the metric type",
        check: lint_metric_type_in_name,
    },
    Rule {
        name: "reserved-chars",
        description: "metric names do not contain ':'",
        check: lint_reserved_chars,
    },
    Rule {
        name: "camel-case",
        description: "metric and label names are snake_case",
        check: lint_camel_case,
    },
    Rule {
        name: "reserved-labels",
        description: "label names do not start with __",
        check: lint_reserved_labels,
    },
    Rule {
        name: "unit-abbreviations",
        description: "metric names spell units out",
        check: lint_unit_abbreviations,
    },
    Rule {
        name: "duplicate-series",
        description: "no two samples share a series name and label set",
        check: lint_duplicate_series,
    },
];

static CAMEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[a-z][A-Z]").expect("valid camel case pattern"));

/// Units and the base unit they should be expressed in.
const UNITS: &[(&str, &str)] = &[
    ("amperes", "amperes"),
    ("bytes", "bytes"),
    ("celsius", "celsius"),
    ("grams", "grams"),
    ("joules", "joules"),
    ("kelvin", "kelvin"),
    ("meters", "meters"),
    ("metres", "metres"),
    ("seconds", "seconds"),
    ("volts", "volts"),
    ("minutes", "seconds"),
    ("hours", "seconds"),
    ("days", "seconds"),
    ("weeks", "seconds"),
    ("kelvins", "kelvin"),
    ("fahrenheit", "celsius"),
    ("rankine", "celsius"),
    ("inches", "meters"),
    ("yards", "meters"),
    ("miles", "meters"),
    ("bits", "bytes"),
    ("calories", "joules"),
    ("pounds", "grams"),
    ("ounces", "grams"),
];

const UNIT_PREFIXES: &[&str] = &[
    "pico", "nano", "micro", "milli", "centi", "deci", "deca", "hecto", "kilo", "kibi", "mega",
    "mibi", "giga", "gibi", "tera", "tebi", "peta", "pebi",
];

const UNIT_ABBREVIATIONS: &[&str] = &[
    "s", "ms", "us", "ns", "sec", "b", "kb", "mb", "gb", "tb", "pb", "m", "h", "d",
];

fn lint_help(family: &MetricFamily) -> Vec<Problem> {
    match family.help {
        None => vec![Problem::new(family, "no help text")],
        Some(_) => Vec::new(),
    }
}

fn lint_metric_units(family: &MetricFamily) -> Vec<Problem> {
    match metric_unit(&family.name) {
        Some((unit, base)) if unit != base => vec![Problem::new(
            family,
            format!("use base unit {base:?} instead of {unit:?}"),
        )],
        _ => Vec::new(),
    }
}

/// The first name token that is a unit, optionally with an SI or binary prefix.
fn metric_unit(name: &str) -> Option<(&str, &'static str)> {
    for token in name.split('_') {
        if let Some(base) = base_unit(token) {
            return Some((token, base));
        }
        for prefix in UNIT_PREFIXES {
            if let Some(base) = token.strip_prefix(prefix).and_then(base_unit) {
                return Some((token, base));
            }
        }
    }
    None
}

fn base_unit(unit: &str) -> Option<&'static str> {
    UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|&(_, base)| base)
}

fn lint_counter(family: &MetricFamily) -> Vec<Problem> {
    let is_counter = family.metric_type == MetricType::Counter;
    let is_untyped = family.metric_type == MetricType::Untyped;
    let has_total = family.name.ends_with("_total");

    if is_counter && !has_total {
        vec![Problem::new(
            family,
            r#"counter metrics should have "_total" suffix"#,
        )]
    } else if !is_counter && !is_untyped && has_total {
        vec![Problem::new(
            family,
            r#"non-counter metrics should not have "_total" suffix"#,
        )]
    } else {
        Vec::new()
    }
}

fn lint_histogram_summary_reserved(family: &MetricFamily) -> Vec<Problem> {
    let is_histogram = family.metric_type == MetricType::Histogram;
    let is_summary = family.metric_type == MetricType::Summary;
    if family.metric_type == MetricType::Untyped {
        return Vec::new();
    }

    let mut texts = Vec::new();
    let name = family.name.as_str();
    if !is_histogram && name.ends_with("_bucket") {
        texts.push(r#"non-histogram metrics should not have "_bucket" suffix"#);
    }
    if !is_histogram && !is_summary && name.ends_with("_count") {
        texts.push(r#"non-histogram and non-summary metrics should not have "_count" suffix"#);
    }
    if !is_histogram && !is_summary && name.ends_with("_sum") {
        texts.push(r#"non-histogram and non-summary metrics should not have "_sum" suffix"#);
    }

    let label_names = family.label_names();
    if !is_histogram && label_names.contains(&"le") {
        texts.push(r#"non-histogram metrics should not have "le" label"#);
    }
    if !is_summary && label_names.contains(&"quantile") {
        texts.push(r#"non-summary metrics should not have "quantile" label"#);
    }

    texts
        .into_iter()
        .map(|text| Problem::new(family, text))
        .collect()
}

fn lint_metric_type_in_name(family: &MetricFamily) -> Vec<Problem> {
    if family.metric_type == MetricType::Untyped {
        return Vec::new();
    }
    let name = family.name.to_lowercase();
    let type_name = family.metric_type.as_str();
    if name.contains(&format!("_{type_name}_")) || name.ends_with(&format!("_{type_name}")) {
        return vec![Problem::new(
            family,
            format!("metric name should not include type '{type_name}'"),
        )];
    }
    Vec::new()
}

fn lint_reserved_chars(family: &MetricFamily) -> Vec<Problem> {
    if family.name.contains(':') {
        return vec![Problem::new(family, "metric names should not contain ':'")];
    }
    Vec::new()
}

fn lint_camel_case(family: &MetricFamily) -> Vec<Problem> {
    let mut problems = Vec::new();
    if CAMEL_CASE.is_match(&family.name) {
        problems.push(Problem::new(
            family,
            "metric names should be written in 'snake_case' not 'camelCase'",
        ));
    }
    if family
        .label_names()
        .iter()
        .any(|label| CAMEL_CASE.is_match(label))
    {
        problems.push(Problem::new(
            family,
            "label names should be written in 'snake_case' not 'camelCase'",
        ));
    }
    problems
}

fn lint_reserved_labels(family: &MetricFamily) -> Vec<Problem> {
    if family
        .label_names()
        .iter()
        .any(|label| label.starts_with("__"))
    {
        return vec![Problem::new(
            family,
            r#"label names starting with "__" are reserved for internal use"#,
        )];
    }
    Vec::new()
}

fn lint_unit_abbreviations(family: &MetricFamily) -> Vec<Problem> {
    let name = family.name.to_lowercase();
    let abbreviated = UNIT_ABBREVIATIONS.iter().any(|abbreviation| {
        name.contains(&format!("_{abbreviation}_")) || name.ends_with(&format!("_{abbreviation}"))
    });
    if abbreviated {
        return vec![Problem::new(
            family,
            "metric names should not contain abbreviated units",
        )];
    }
    Vec::new()
}

fn lint_duplicate_series(family: &MetricFamily) -> Vec<Problem> {
    let mut seen: HashSet<(&str, Vec<&Label>)> = HashSet::new();
    let duplicated = family
        .samples
        .iter()
        .any(|sample| !seen.insert((sample.name.as_str(), sample.sorted_labels())));
    if duplicated {
        return vec![Problem::new(family, "metric not unique")];
    }
    Vec::new()
}
