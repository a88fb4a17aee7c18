use std::fmt;

use polars::prelude::{AnyValue, DataFrame};

/// Computed answer to a natural-language question
#[derive(Debug, Clone)]
pub enum ResponseValue {
    Number(f64),
    Text(String),
    DataFrame(DataFrame),
}

#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub value: ResponseValue,
    /// Query that produced the value
    pub last_query: String,
}

impl AgentResponse {
    /// Wrap a query result. A single numeric or string cell collapses to a scalar.
    pub fn from_frame(frame: DataFrame, last_query: impl Into<String>) -> Self {
        let value = match scalar_value(&frame) {
            Some(value) => value,
            None => ResponseValue::DataFrame(frame),
        };

        Self {
            value,
            last_query: last_query.into(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            ResponseValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            ResponseValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&DataFrame> {
        match &self.value {
            ResponseValue::DataFrame(frame) => Some(frame),
            _ => None,
        }
    }
}

fn scalar_value(frame: &DataFrame) -> Option<ResponseValue> {
    if frame.shape() != (1, 1) {
        return None;
    }

    let row = frame.get(0)?;
    match row.first()? {
        AnyValue::String(s) => Some(ResponseValue::Text(s.to_string())),
        AnyValue::StringOwned(s) => Some(ResponseValue::Text(s.to_string())),
        AnyValue::Boolean(b) => Some(ResponseValue::Text(b.to_string())),
        value @ (AnyValue::Int8(_)
        | AnyValue::Int16(_)
        | AnyValue::Int32(_)
        | AnyValue::Int64(_)
        | AnyValue::UInt8(_)
        | AnyValue::UInt16(_)
        | AnyValue::UInt32(_)
        | AnyValue::UInt64(_)
        | AnyValue::Float32(_)
        | AnyValue::Float64(_)) => value.extract::<f64>().map(ResponseValue::Number),
        _ => None,
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::DataFrame(frame) => write!(f, "{}", frame),
        }
    }
}

impl fmt::Display for AgentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_single_number_collapses() {
        let frame = df!("count" => [42u32]).unwrap();
        let response = AgentResponse::from_frame(frame, "SELECT COUNT(*) FROM t");

        assert_eq!(response.as_number(), Some(42.0));
        assert_eq!(response.last_query, "SELECT COUNT(*) FROM t");
        assert_eq!(response.to_string(), "42");
    }

    #[test]
    fn test_single_string_collapses() {
        let frame = df!("city" => ["Lisbon"]).unwrap();
        let response = AgentResponse::from_frame(frame, "q");

        assert_eq!(response.as_text(), Some("Lisbon"));
    }

    #[test]
    fn test_larger_results_stay_frames() {
        let frame = df!("city" => ["Lisbon", "Porto"], "n" => [1i64, 2]).unwrap();
        let response = AgentResponse::from_frame(frame, "q");

        assert_eq!(response.as_frame().map(|f| f.shape()), Some((2, 2)));
        assert!(response.as_number().is_none());
    }
}
