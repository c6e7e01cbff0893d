use std::fmt::Write;

use thiserror::Error;

use super::model::{MetricFamily, MetricType, Sample};
use super::parser::{is_label_name, is_metric_name};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    #[error("invalid metric name {0:?}")]
    InvalidMetricName(String),
    #[error("invalid label name {label:?} for metric {metric:?}")]
    InvalidLabelName { metric: String, label: String },
    #[error("metric family {0:?} has no samples")]
    EmptyFamily(String),
}

/// Render metric families back into the text exposition format.
///
/// The output parses back into the same families: HELP and label values are
/// escaped the way the parser unescapes them and floats use their shortest
/// round-trip form.
pub fn serialize(families: &[MetricFamily]) -> Result<String, SerializeError> {
    let mut out = String::new();
    for family in families {
        write_family(&mut out, family)?;
    }
    Ok(out)
}

fn write_family(out: &mut String, family: &MetricFamily) -> Result<(), SerializeError> {
    if !is_metric_name(&family.name) {
        return Err(SerializeError::InvalidMetricName(family.name.clone()));
    }
    if family.samples.is_empty() {
        return Err(SerializeError::EmptyFamily(family.name.clone()));
    }

    match family.help.as_deref() {
        Some("") => {
            let _ = writeln!(out, "# HELP {}", family.name);
        }
        Some(help) => {
            let _ = writeln!(out, "# HELP {} {}", family.name, escape_help(help));
        }
        None => {}
    }
    // untyped too, so that `x_sum` and friends keep their own family on re-parse
    let _ = writeln!(out, "# TYPE {} {}", family.name, family.metric_type);
    for sample in &family.samples {
        write_sample(out, sample)?;
    }
    Ok(())
}

fn write_sample(out: &mut String, sample: &Sample) -> Result<(), SerializeError> {
    if !is_metric_name(&sample.name) {
        return Err(SerializeError::InvalidMetricName(sample.name.clone()));
    }
    out.push_str(&sample.name);

    if !sample.labels.is_empty() {
        out.push('{');
        for (i, label) in sample.labels.iter().enumerate() {
            if !is_label_name(&label.name) {
                return Err(SerializeError::InvalidLabelName {
                    metric: sample.name.clone(),
                    label: label.name.clone(),
                });
            }
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}=\"{}\"", label.name, escape_label_value(&label.value));
        }
        out.push('}');
    }

    out.push(' ');
    out.push_str(&format_float(sample.value));
    if let Some(timestamp) = sample.timestamp_ms {
        let _ = write!(out, " {timestamp}");
    }
    out.push('\n');
    Ok(())
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-7..1e21).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
