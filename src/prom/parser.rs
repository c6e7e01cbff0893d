use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::model::{Label, MetricFamily, MetricType, Sample};

const METRIC_NAME_LABEL: &str = "__name__";
const BUCKET_LABEL: &str = "le";
const QUANTILE_LABEL: &str = "quantile";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("invalid metric name {0:?}")]
    InvalidMetricName(String),
    #[error("invalid label name {label:?} for metric {metric:?}")]
    InvalidLabelName { metric: String, label: String },
    #[error("label name \"__name__\" is reserved")]
    ReservedLabelName,
    #[error("duplicate label name {label:?} for metric {metric:?}")]
    DuplicateLabel { metric: String, label: String },
    #[error("expected {expected:?} in label set of metric {metric:?}, found {found:?}")]
    UnexpectedLabelToken {
        metric: String,
        expected: char,
        found: String,
    },
    #[error("unterminated label set for metric {0:?}")]
    UnterminatedLabelSet(String),
    #[error("unterminated label value for metric {0:?}")]
    UnterminatedLabelValue(String),
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("unterminated escape sequence")]
    DanglingEscape,
    #[error("missing value for metric {0:?}")]
    MissingValue(String),
    #[error("expected float as value, got {0:?}")]
    InvalidValue(String),
    #[error("expected integer as timestamp, got {0:?}")]
    InvalidTimestamp(String),
    #[error("spurious string after timestamp: {0:?}")]
    TrailingInput(String),
    #[error("unknown metric type {0:?}")]
    UnknownType(String),
    #[error("second HELP line for metric name {0:?}")]
    DuplicateHelp(String),
    #[error("second TYPE line for metric name {0:?}, or TYPE reported after samples")]
    DuplicateType(String),
    #[error("expected float as value for {label:?} label, got {value:?}")]
    InvalidLabelFloat { label: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("text format parsing error in line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Parse exposition text into metric families, in order of first appearance.
///
/// Any syntax error aborts the whole parse; no partial result is returned.
pub fn parse(text: &str) -> Result<Vec<MetricFamily>, ParseError> {
    let mut parser = TextParser::default();
    for (index, line) in text.split('\n').enumerate() {
        parser.parse_line(line).map_err(|kind| ParseError {
            line: index + 1,
            kind,
        })?;
    }
    let families = parser.finish();
    log::debug!("parsed {} metric families", families.len());
    Ok(families)
}

#[derive(Default)]
struct TextParser {
    families: Vec<MetricFamily>,
    by_name: HashMap<String, usize>,
    typed: HashSet<String>,
}

impl TextParser {
    fn parse_line(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        let mut cursor = Cursor::new(line);
        cursor.skip_blank();
        if cursor.is_empty() {
            return Ok(());
        }
        if cursor.eat('#') {
            return self.parse_comment(cursor);
        }
        self.parse_sample(cursor)
    }

    fn parse_comment(&mut self, mut cursor: Cursor<'_>) -> Result<(), ParseErrorKind> {
        cursor.skip_blank();
        let keyword = cursor.token();
        if keyword != "HELP" && keyword != "TYPE" {
            return Ok(());
        }
        cursor.skip_blank();
        let name = cursor.token();
        if !is_metric_name(name) {
            return Err(ParseErrorKind::InvalidMetricName(name.to_string()));
        }
        cursor.skip_blank();

        if keyword == "HELP" {
            let help = unescape_help(cursor.rest())?;
            let family = self.family_mut(name);
            if family.help.is_some() {
                return Err(ParseErrorKind::DuplicateHelp(name.to_string()));
            }
            family.help = Some(help);
        } else {
            let token = cursor.rest().trim_end_matches([' ', '\t']);
            let metric_type = token
                .parse::<MetricType>()
                .map_err(ParseErrorKind::UnknownType)?;
            if !self.typed.insert(name.to_string()) {
                return Err(ParseErrorKind::DuplicateType(name.to_string()));
            }
            let family = self.family_mut(name);
            if !family.samples.is_empty() {
                return Err(ParseErrorKind::DuplicateType(name.to_string()));
            }
            family.metric_type = metric_type;
        }
        Ok(())
    }

    fn parse_sample(&mut self, mut cursor: Cursor<'_>) -> Result<(), ParseErrorKind> {
        let name = cursor.take_while(is_metric_name_char);
        let separated = matches!(cursor.peek(), None | Some(' ' | '\t' | '{'));
        if !is_metric_name(name) || !separated {
            let token = format!("{name}{}", cursor.token());
            return Err(ParseErrorKind::InvalidMetricName(token));
        }

        cursor.skip_blank();
        let labels = if cursor.eat('{') {
            parse_labels(&mut cursor, name)?
        } else {
            Vec::new()
        };

        cursor.skip_blank();
        let value = match cursor.token() {
            "" => return Err(ParseErrorKind::MissingValue(name.to_string())),
            token => match parse_float(token) {
                Some(value) => value,
                None => return Err(ParseErrorKind::InvalidValue(token.to_string())),
            },
        };

        cursor.skip_blank();
        let timestamp_ms = match cursor.token() {
            "" => None,
            token => Some(
                token
                    .parse::<i64>()
                    .map_err(|_| ParseErrorKind::InvalidTimestamp(token.to_string()))?,
            ),
        };
        cursor.skip_blank();
        if !cursor.is_empty() {
            return Err(ParseErrorKind::TrailingInput(cursor.rest().to_string()));
        }

        let sample = Sample {
            name: name.to_string(),
            labels,
            value,
            timestamp_ms,
        };
        let index = self.resolve_family(&sample)?;
        self.families[index].samples.push(sample);
        Ok(())
    }

    /// Find the family a sample line belongs to, creating an untyped one if needed.
    ///
    /// An exact name match wins; otherwise `_sum`, `_count`, `_bucket` and
    /// `_quantile` series attach to a summary or histogram declared under the
    /// base name.
    fn resolve_family(&mut self, sample: &Sample) -> Result<usize, ParseErrorKind> {
        let name = sample.name.as_str();

        if let Some(&index) = self.by_name.get(name) {
            match self.families[index].metric_type {
                MetricType::Histogram => check_float_label(sample, BUCKET_LABEL)?,
                MetricType::Summary => check_float_label(sample, QUANTILE_LABEL)?,
                _ => {}
            }
            return Ok(index);
        }

        for suffix in ["_sum", "_count", "_quantile"] {
            if let Some(index) = self.typed_base(name, suffix, MetricType::Summary) {
                if suffix == "_quantile" {
                    check_float_label(sample, QUANTILE_LABEL)?;
                }
                return Ok(index);
            }
        }

        for suffix in ["_sum", "_count", "_bucket"] {
            if let Some(index) = self.typed_base(name, suffix, MetricType::Histogram) {
                if suffix == "_bucket" {
                    check_float_label(sample, BUCKET_LABEL)?;
                }
                return Ok(index);
            }
        }

        Ok(self.insert_family(name))
    }

    fn typed_base(&self, name: &str, suffix: &str, metric_type: MetricType) -> Option<usize> {
        let base = name.strip_suffix(suffix)?;
        let &index = self.by_name.get(base)?;
        (self.families[index].metric_type == metric_type).then_some(index)
    }

    fn family_mut(&mut self, name: &str) -> &mut MetricFamily {
        let index = match self.by_name.get(name) {
            Some(&index) => index,
            None => self.insert_family(name),
        };
        &mut self.families[index]
    }

    fn insert_family(&mut self, name: &str) -> usize {
        let index = self.families.len();
        self.families.push(MetricFamily::new(name, MetricType::Untyped));
        self.by_name.insert(name.to_string(), index);
        index
    }

    /// Families that only ever had HELP or TYPE lines are dropped.
    fn finish(self) -> Vec<MetricFamily> {
        self.families
            .into_iter()
            .filter(|family| !family.samples.is_empty())
            .collect()
    }
}

fn parse_labels(cursor: &mut Cursor<'_>, metric: &str) -> Result<Vec<Label>, ParseErrorKind> {
    let mut labels: Vec<Label> = Vec::new();
    loop {
        cursor.skip_blank();
        if cursor.eat('}') {
            return Ok(labels);
        }
        if cursor.is_empty() {
            return Err(ParseErrorKind::UnterminatedLabelSet(metric.to_string()));
        }

        let name = cursor.take_while(is_label_name_char);
        if !is_label_name(name) {
            let tail = cursor.take_while(|c| !matches!(c, '=' | ' ' | '\t'));
            let label = format!("{name}{tail}");
            return Err(ParseErrorKind::InvalidLabelName {
                metric: metric.to_string(),
                label,
            });
        }
        if name == METRIC_NAME_LABEL {
            return Err(ParseErrorKind::ReservedLabelName);
        }

        cursor.skip_blank();
        expect_char(cursor, '=', metric)?;
        cursor.skip_blank();
        expect_char(cursor, '"', metric)?;
        let value = label_value(cursor, metric)?;

        if labels.iter().any(|l| l.name == name) {
            return Err(ParseErrorKind::DuplicateLabel {
                metric: metric.to_string(),
                label: name.to_string(),
            });
        }
        labels.push(Label::new(name, value));

        cursor.skip_blank();
        if cursor.eat(',') {
            continue;
        }
        if cursor.eat('}') {
            return Ok(labels);
        }
        if cursor.is_empty() {
            return Err(ParseErrorKind::UnterminatedLabelSet(metric.to_string()));
        }
        return Err(ParseErrorKind::UnexpectedLabelToken {
            metric: metric.to_string(),
            expected: ',',
            found: cursor.token().to_string(),
        });
    }
}

fn expect_char(
    cursor: &mut Cursor<'_>,
    expected: char,
    metric: &str,
) -> Result<(), ParseErrorKind> {
    if cursor.eat(expected) {
        return Ok(());
    }
    if cursor.is_empty() {
        return Err(ParseErrorKind::UnterminatedLabelSet(metric.to_string()));
    }
    Err(ParseErrorKind::UnexpectedLabelToken {
        metric: metric.to_string(),
        expected,
        found: cursor.token().to_string(),
    })
}

/// Read a quoted label value; the opening quote has already been consumed.
fn label_value(cursor: &mut Cursor<'_>, metric: &str) -> Result<String, ParseErrorKind> {
    let rest = cursor.rest;
    let mut value = String::new();
    let mut chars = rest.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => {
                cursor.rest = &rest[offset + 1..];
                return Ok(value);
            }
            '\\' => match chars.next() {
                Some((_, '\\')) => value.push('\\'),
                Some((_, '"')) => value.push('"'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, other)) => return Err(ParseErrorKind::InvalidEscape(other)),
                None => break,
            },
            c => value.push(c),
        }
    }
    Err(ParseErrorKind::UnterminatedLabelValue(metric.to_string()))
}

/// Decode HELP text, which only knows the `\\` and `\n` escapes.
fn unescape_help(text: &str) -> Result<String, ParseErrorKind> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some(other) => return Err(ParseErrorKind::InvalidEscape(other)),
            None => return Err(ParseErrorKind::DanglingEscape),
        }
    }
    Ok(out)
}

/// `le` and `quantile` are optional, but when present they must hold a float.
fn check_float_label(sample: &Sample, label: &'static str) -> Result<(), ParseErrorKind> {
    let Some(value) = sample.label(label) else {
        return Ok(());
    };
    match parse_float(value) {
        Some(_) => Ok(()),
        None => Err(ParseErrorKind::InvalidLabelFloat {
            label,
            value: value.to_string(),
        }),
    }
}

/// Floats follow the usual decimal grammar plus `NaN` and `[+-]Inf`, any case.
fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

pub(crate) fn is_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(is_metric_name_char)
}

pub(crate) fn is_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_label_name_char)
}

fn is_metric_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

fn is_label_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Cursor { rest: line }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn rest(&self) -> &'a str {
        self.rest
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn skip_blank(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\t']);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self
            .rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.rest.len(), |(i, _)| i);
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        taken
    }

    /// Everything up to the next blank.
    fn token(&mut self) -> &'a str {
        self.take_while(|c| c != ' ' && c != '\t')
    }
}
