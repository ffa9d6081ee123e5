//! Access record decoding and analyzer line rendering.
//!
//! A record travels through three shapes:
//!
//! RawRecord (bytes as received)
//! serde_json::Value (decoded, also what the raw sink re-serializes)
//! AccessRecord (typed fields)
//! AnalyzerLine (fixed-column text for GoAccess)
//!
//! Nothing in here performs I/O.

mod access;
mod address;
mod error;
mod raw;
mod transform;

#[cfg(test)]
mod tests;

pub use access::AccessRecord;
pub use address::strip_port;
pub use error::MalformedRecordError;
pub use raw::RawRecord;
pub use transform::{
    ANALYZER_COLUMNS, ANALYZER_DATE_FORMAT, ANALYZER_TIME_FORMAT, AnalyzerLine, TimeZoneChoice,
    Transformer,
};
