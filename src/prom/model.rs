use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    #[default]
    Untyped,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Histogram => "histogram",
            MetricType::Summary => "summary",
            MetricType::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = String;

    /// Type tokens on `# TYPE` lines are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "counter" => Ok(MetricType::Counter),
            "gauge" => Ok(MetricType::Gauge),
            "histogram" => Ok(MetricType::Histogram),
            "summary" => Ok(MetricType::Summary),
            "untyped" => Ok(MetricType::Untyped),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Label {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single line of exposition: one series name, its labels and one observation.
///
/// `name` is the full series name as written (`foo_bucket`, `foo_sum`, ...), which
/// may differ from the name of the family the sample belongs to.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub labels: Vec<Label>,
    pub value: f64,
    pub timestamp_ms: Option<i64>,
}

impl Sample {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Sample {
            name: name.into(),
            labels: Vec::new(),
            value,
            timestamp_ms: None,
        }
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push(Label::new(name, value));
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }

    /// Labels sorted by name, the canonical form used for comparing label sets.
    pub fn sorted_labels(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = self.labels.iter().collect();
        labels.sort();
        labels
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        let same_value =
            self.value == other.value || (self.value.is_nan() && other.value.is_nan());
        self.name == other.name
            && same_value
            && self.timestamp_ms == other.timestamp_ms
            && self.sorted_labels() == other.sorted_labels()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricFamily {
    pub name: String,
    /// `None` when no `# HELP` line was seen, `Some("")` for an empty one.
    pub help: Option<String>,
    pub metric_type: MetricType,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: impl Into<String>, metric_type: MetricType) -> Self {
        MetricFamily {
            name: name.into(),
            help: None,
            metric_type,
            samples: Vec::new(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }

    /// Distinct label names across all samples, in order of first appearance.
    pub fn label_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for label in self.samples.iter().flat_map(|s| s.labels.iter()) {
            if !names.contains(&label.name.as_str()) {
                names.push(&label.name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_does_not_affect_equality() {
        let a = Sample::new("foo", 1.0)
            .with_label("a", "1")
            .with_label("b", "2");
        let b = Sample::new("foo", 1.0)
            .with_label("b", "2")
            .with_label("a", "1");
        assert_eq!(a, b);
    }

    #[test]
    fn nan_samples_are_equal() {
        assert_eq!(Sample::new("foo", f64::NAN), Sample::new("foo", f64::NAN));
        assert_ne!(Sample::new("foo", f64::NAN), Sample::new("foo", 0.0));
    }

    #[test]
    fn absent_and_empty_help_differ() {
        let absent = MetricFamily::new("foo", MetricType::Gauge);
        let empty = MetricFamily::new("foo", MetricType::Gauge).with_help("");
        assert_ne!(absent, empty);
    }

    #[test]
    fn metric_type_from_str_ignores_case() {
        assert_eq!("Counter".parse::<MetricType>(), Ok(MetricType::Counter));
        assert_eq!("HISTOGRAM".parse::<MetricType>(), Ok(MetricType::Histogram));
        assert!("info".parse::<MetricType>().is_err());
    }

    #[test]
    fn label_names_are_distinct_and_ordered() {
        let family = MetricFamily::new("foo", MetricType::Gauge)
            .with_sample(Sample::new("foo", 1.0).with_label("b", "1"))
            .with_sample(
                Sample::new("foo", 2.0)
                    .with_label("a", "1")
                    .with_label("b", "2"),
            );
        assert_eq!(family.label_names(), vec!["b", "a"]);
    }
}
