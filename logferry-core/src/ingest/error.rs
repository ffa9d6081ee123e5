use crate::record::MalformedRecordError;
use crate::sink::SinkError;
use crate::source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    /// `record` is the 1-based position of the offending record in the input.
    #[error("record {record} is malformed: {source}")]
    Malformed {
        record: u64,
        #[source]
        source: MalformedRecordError,
    },
}
