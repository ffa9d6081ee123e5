use thiserror::Error;

/// Why a single record could not be converted.
#[derive(Debug, Error)]
pub enum MalformedRecordError {
    #[error("record is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("record is empty")]
    Empty,

    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("malformed remote address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: &'static str },

    #[error("record of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

impl MalformedRecordError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid(field: &'static str, expected: &'static str) -> Self {
        Self::InvalidField { field, expected }
    }
}
