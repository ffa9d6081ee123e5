use crate::conf::FileSourceConfig;
use crate::record::RawRecord;
use crate::source::{Boundary, RecordSource, SourceError, SourceEvent};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileState {
    Reading,
    Sleeping,
    Exhausted,
}

/// Reads a JSON log file line by line, optionally polling it for appended lines.
///
/// The file is opened once and never rewound. A line caught half-written at
/// EOF stays in `pending` until the rest of it shows up on a later cycle.
pub struct PollingFileSource {
    path: PathBuf,
    poll_interval: Duration,
    reader: BufReader<File>,
    pending: Vec<u8>,
    state: FileState,
}

impl PollingFileSource {
    pub async fn open(config: &FileSourceConfig) -> Result<Self, SourceError> {
        let file = File::open(&config.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                path: config.path.clone(),
            },
            _ => SourceError::Open {
                path: config.path.clone(),
                source: e,
            },
        })?;

        tracing::info!(path = %config.path.display(), "processing JSON input file");

        Ok(Self {
            path: config.path.clone(),
            poll_interval: config.poll_interval,
            reader: BufReader::new(file),
            pending: Vec::new(),
            state: FileState::Reading,
        })
    }

    fn polling(&self) -> bool {
        !self.poll_interval.is_zero()
    }

    fn take_pending(&mut self) -> Option<RawRecord> {
        let line = std::mem::take(&mut self.pending);
        if line.trim_ascii().is_empty() {
            None
        } else {
            Some(RawRecord::from(line))
        }
    }
}

#[async_trait]
impl RecordSource for PollingFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn next_event(&mut self, cancel: &CancellationToken) -> Result<SourceEvent, SourceError> {
        loop {
            match self.state {
                FileState::Exhausted => return Ok(SourceEvent::Exhausted),

                FileState::Sleeping => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Ok(SourceEvent::Cancelled),
                        _ = tokio::time::sleep(self.poll_interval) => {
                            self.state = FileState::Reading;
                        }
                    }
                }

                FileState::Reading => {
                    if cancel.is_cancelled() {
                        return Ok(SourceEvent::Cancelled);
                    }

                    self.reader
                        .read_until(b'\n', &mut self.pending)
                        .await
                        .map_err(|e| SourceError::Read {
                            path: self.path.clone(),
                            source: e,
                        })?;

                    if self.pending.ends_with(b"\n") {
                        match self.take_pending() {
                            Some(record) => return Ok(SourceEvent::Record(record)),
                            None => continue,
                        }
                    }

                    // EOF. Anything left in `pending` is an unterminated line.
                    if self.polling() {
                        self.state = FileState::Sleeping;
                        return Ok(SourceEvent::Boundary(Boundary::PollCycle {
                            next_check: self.poll_interval,
                        }));
                    }

                    self.state = FileState::Exhausted;
                    if let Some(record) = self.take_pending() {
                        return Ok(SourceEvent::Record(record));
                    }
                }
            }
        }
    }
}
