//! Output sinks.
//!
//! Every line is written and flushed before the next record is read, so a
//! crash loses at most the record in flight.

mod error;
mod line_sink;


pub use error::SinkError;
pub use line_sink::LineSink;

use crate::conf::{SinkConfig, SinkTarget};
use crate::record::AnalyzerLine;

/// The analyzer sink and raw-copy sink, either of which may be absent.
pub struct SinkSet {
    analyzer: Option<LineSink>,
    raw: Option<LineSink>,
}

impl SinkSet {
    pub async fn open(config: &SinkConfig) -> Result<Self, SinkError> {
        let analyzer = match &config.analyzer {
            Some(target) => Some(LineSink::open(target).await?),
            None => None,
        };
        let raw = match &config.raw {
            Some(target) => Some(LineSink::open(target).await?),
            None => None,
        };
        Ok(Self { analyzer, raw })
    }

    pub fn from_sinks(analyzer: Option<LineSink>, raw: Option<LineSink>) -> Self {
        Self { analyzer, raw }
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn has_raw(&self) -> bool {
        self.raw.is_some()
    }

    /// Target named in progress messages: the analyzer output when there is one.
    pub fn primary_target(&self) -> Option<&SinkTarget> {
        self.analyzer
            .as_ref()
            .or(self.raw.as_ref())
            .map(LineSink::target)
    }

    /// Write one record to every configured sink, raw copy first.
    pub async fn write(
        &mut self,
        raw: Option<&str>,
        line: Option<&AnalyzerLine>,
    ) -> Result<(), SinkError> {
        if let (Some(sink), Some(raw)) = (self.raw.as_mut(), raw) {
            sink.write_line(raw).await?;
        }
        if let (Some(sink), Some(line)) = (self.analyzer.as_mut(), line) {
            sink.write_line(line.as_str()).await?;
        }
        Ok(())
    }

    /// Flush and close both sinks, reporting the first failure.
    pub async fn close(self) -> Result<(), SinkError> {
        let mut result = Ok(());
        for sink in [self.raw, self.analyzer].into_iter().flatten() {
            if let Err(e) = sink.close().await {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}
