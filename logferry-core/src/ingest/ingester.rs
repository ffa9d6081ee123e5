use crate::conf::MalformedPolicy;
use crate::ingest::report;
use crate::ingest::{IngestError, IngestionSession, IngestionSummary, Termination};
use crate::record::{AnalyzerLine, MalformedRecordError, RawRecord, Transformer};
use crate::sink::SinkSet;
use crate::source::{RecordSource, SourceEvent};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Moves records from one source into a sink set.
pub struct Ingester<S> {
    source: S,
    sinks: SinkSet,
    transformer: Transformer,
    policy: MalformedPolicy,
    session: IngestionSession,
}

impl<S> Ingester<S>
where
    S: RecordSource,
{
    pub fn new(
        source: S,
        sinks: SinkSet,
        transformer: Transformer,
        policy: MalformedPolicy,
    ) -> Self {
        Self {
            source,
            sinks,
            transformer,
            policy,
            session: IngestionSession::new(),
        }
    }

    /// Run until the source is exhausted or `cancel` fires.
    ///
    /// The final batch and the total are reported on every way out,
    /// including fatal errors, and the sinks are closed before returning.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<IngestionSummary, IngestError> {
        info!(source = %self.source.describe(), "ingestion started");

        let outcome = self.drive(&cancel).await;

        let target = self.sinks.primary_target().cloned();
        report::batch_written(self.session.take_batch(), target.as_ref());
        report::total_written(
            self.session.total(),
            self.session.rejected(),
            target.as_ref(),
        );

        let closed = self.sinks.close().await;

        let termination = outcome?;
        closed?;
        Ok(self.session.summary(termination))
    }

    async fn drive(&mut self, cancel: &CancellationToken) -> Result<Termination, IngestError> {
        loop {
            match self.source.next_event(cancel).await? {
                SourceEvent::Record(record) => self.process(&record).await?,

                SourceEvent::Rejected(e) => self.reject(e)?,

                SourceEvent::Connected { peer } => {
                    self.session.connection_opened();
                    report::connected(peer);
                }

                SourceEvent::Boundary(boundary) => {
                    report::batch_written(self.session.take_batch(), self.sinks.primary_target());
                    report::boundary(&boundary);
                }

                SourceEvent::Exhausted => return Ok(Termination::Exhausted),
                SourceEvent::Cancelled => return Ok(Termination::Cancelled),
            }
        }
    }

    async fn process(&mut self, record: &RawRecord) -> Result<(), IngestError> {
        let (raw, line) = match self.prepare(record) {
            Ok(prepared) => prepared,
            Err(e) => return self.reject(e),
        };

        self.sinks.write(raw.as_deref(), line.as_ref()).await?;
        self.session.record_written();
        Ok(())
    }

    /// Decode the record and build whatever each configured sink needs.
    ///
    /// Nothing is written until both outputs are ready, so a record that
    /// fails to convert never reaches the raw sink alone.
    fn prepare(
        &self,
        record: &RawRecord,
    ) -> Result<(Option<String>, Option<AnalyzerLine>), MalformedRecordError> {
        let value = record.decode()?;

        let line = if self.sinks.has_analyzer() {
            Some(self.transformer.convert(&value)?)
        } else {
            None
        };
        let raw = self.sinks.has_raw().then(|| value.to_string());

        Ok((raw, line))
    }

    fn reject(&mut self, e: MalformedRecordError) -> Result<(), IngestError> {
        let record = self.session.next_ordinal();
        match self.policy {
            MalformedPolicy::Fail => Err(IngestError::Malformed { record, source: e }),
            MalformedPolicy::Skip => {
                self.session.record_rejected();
                warn!(record, error = %e, "skipping malformed record");
                Ok(())
            }
        }
    }
}
