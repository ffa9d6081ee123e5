use crate::record::MalformedRecordError;
use bytes::Bytes;
use serde_json::Value;

/// One record exactly as it came off the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord(Bytes);

impl RawRecord {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record with surrounding whitespace (including the line terminator) removed.
    pub fn trimmed(&self) -> &[u8] {
        self.0.trim_ascii()
    }

    /// Decode the trimmed bytes as one JSON document.
    pub fn decode(&self) -> Result<Value, MalformedRecordError> {
        let bytes = self.trimmed();
        if bytes.is_empty() {
            return Err(MalformedRecordError::Empty);
        }
        serde_json::from_slice(bytes).map_err(|source| MalformedRecordError::Decode { source })
    }
}

impl From<&'static str> for RawRecord {
    fn from(s: &'static str) -> Self {
        Self(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Vec<u8>> for RawRecord {
    fn from(v: Vec<u8>) -> Self {
        Self(Bytes::from(v))
    }
}
