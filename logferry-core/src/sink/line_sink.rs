use crate::conf::SinkTarget;
use crate::sink::SinkError;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Append-only, newline-terminated text output.
pub struct LineSink {
    target: SinkTarget,
    writer: Box<dyn AsyncWrite + Send + Unpin>,
    lines: u64,
}

impl LineSink {
    /// Open the target, truncating an existing file.
    pub async fn open(target: &SinkTarget) -> Result<Self, SinkError> {
        let writer: Box<dyn AsyncWrite + Send + Unpin> = match target {
            SinkTarget::File(path) => {
                let file = File::create(path).await.map_err(|source| SinkError::Open {
                    target: target.clone(),
                    source,
                })?;
                Box::new(file)
            }
            SinkTarget::Stdout => Box::new(tokio::io::stdout()),
        };

        tracing::debug!(output = %target, "output opened");
        Ok(Self::from_writer(target.clone(), writer))
    }

    pub fn from_writer(target: SinkTarget, writer: Box<dyn AsyncWrite + Send + Unpin>) -> Self {
        Self {
            target,
            writer,
            lines: 0,
        }
    }

    pub fn target(&self) -> &SinkTarget {
        &self.target
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> u64 {
        self.lines
    }

    /// Write `line` plus a newline and flush.
    pub async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        self.writer
            .write_all(&buf)
            .await
            .map_err(|source| self.write_error(source))?;
        self.writer
            .flush()
            .await
            .map_err(|source| self.write_error(source))?;

        self.lines += 1;
        Ok(())
    }

    pub async fn close(mut self) -> Result<(), SinkError> {
        tracing::debug!(output = %self.target, lines = self.lines, "closing output");
        self.writer
            .shutdown()
            .await
            .map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Write {
            target: self.target.clone(),
            source,
        }
    }
}
