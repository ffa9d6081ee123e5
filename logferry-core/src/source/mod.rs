//! Record sources.
//!
//! A source hands the ingestion loop one [`SourceEvent`] at a time. Records
//! and batch boundaries come out of the same call, so the loop does not care
//! whether it is reading a file that is polled for growth or a socket that a
//! producer connects to and disconnects from.
//!
//! Every wait inside a source (poll sleep, accept, receive) is raced against
//! the cancellation token passed to [`RecordSource::next_event`].

mod error;
mod file;
mod framing;
mod socket;

#[cfg(test)]
mod tests;

pub use error::SourceError;
pub use file::PollingFileSource;
pub use framing::{CHUNK_SIZE, Frame, RecordDecoder};
pub use socket::SocketStreamSource;

use crate::record::{MalformedRecordError, RawRecord};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum SourceEvent {
    Record(RawRecord),
    /// Bytes the source already knows cannot be a record.
    Rejected(MalformedRecordError),
    Connected { peer: SocketAddr },
    Boundary(Boundary),
    /// No further records will be produced.
    Exhausted,
    Cancelled,
}

/// Point at which the batch count is reported and reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// EOF reached; the source sleeps `next_check` before reading again.
    PollCycle { next_check: Duration },
    ConnectionClosed {
        peer: SocketAddr,
        reason: CloseReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The producer closed its end.
    Eof,
    /// The producer reset or aborted the connection.
    Reset,
    IdleTimeout,
}

#[async_trait]
pub trait RecordSource: Send {
    /// Short human readable description, for progress messages.
    fn describe(&self) -> String;

    async fn next_event(&mut self, cancel: &CancellationToken) -> Result<SourceEvent, SourceError>;
}
