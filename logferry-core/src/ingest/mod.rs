//! The ingestion loop.
//!
//! source.next_event
//! RawRecord
//! decode + Transformer
//! SinkSet
//!
//! One record at a time, in arrival order, written and flushed before the
//! next one is read.

mod error;
mod ingester;
mod report;
mod session;


pub use error::IngestError;
pub use ingester::Ingester;
pub use session::{IngestionSession, IngestionSummary, Termination};

use crate::conf::{FerryConfig, SourceConfig};
use crate::record::Transformer;
use crate::sink::SinkSet;
use crate::source::{PollingFileSource, SocketStreamSource};
use tokio_util::sync::CancellationToken;

/// Open the configured source and sinks and ingest until the source is
/// exhausted, `cancel` fires, or a fatal error occurs.
///
/// The source is opened before the sinks, so a missing input file or an
/// unbindable address never truncates existing output.
pub async fn run(
    config: FerryConfig,
    cancel: CancellationToken,
) -> Result<IngestionSummary, IngestError> {
    let transformer = Transformer::new(config.timezone);

    match &config.source {
        SourceConfig::File(file) => {
            let source = PollingFileSource::open(file).await?;
            let sinks = SinkSet::open(&config.sinks).await?;
            Ingester::new(source, sinks, transformer, config.on_malformed)
                .run(cancel)
                .await
        }
        SourceConfig::Socket(socket) => {
            let source = SocketStreamSource::bind(socket).await?;
            let sinks = SinkSet::open(&config.sinks).await?;
            Ingester::new(source, sinks, transformer, config.on_malformed)
                .run(cancel)
                .await
        }
    }
}
