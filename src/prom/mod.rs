mod model;
pub use self::model::Label;
pub use self::model::MetricFamily;
pub use self::model::MetricType;
pub use self::model::Sample;

mod normalize;
pub use self::normalize::normalize;

pub(crate) mod parser;
pub use self::parser::parse;
pub use self::parser::ParseError;
pub use self::parser::ParseErrorKind;

mod format;
pub use self::format::serialize;
pub use self::format::SerializeError;

#[cfg(test)]
pub(crate) mod test_data;
