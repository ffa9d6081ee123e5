use logferry_core::conf::FerryConfig;
use logferry_core::ingest::{self, IngestError, IngestionSummary};
use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to an ingestion run on the test runtime.
pub struct RunningFerry {
    cancel: CancellationToken,
    handle: JoinHandle<Result<IngestionSummary, IngestError>>,
}

impl RunningFerry {
    pub fn start(config: FerryConfig) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(ingest::run(config, cancel.clone()));
        Self { cancel, handle }
    }

    /// Wait for the run to end on its own.
    pub async fn finish(self) -> Result<IngestionSummary, IngestError> {
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("ingestion did not finish")
            .expect("ingestion task panicked")
    }

    /// Cancel the run and wait for it to wind down.
    pub async fn stop(self) -> Result<IngestionSummary, IngestError> {
        self.cancel.cancel();
        self.finish().await
    }

    /// Connect to a socket source, retrying until it is bound.
    pub async fn connect(&self, port: u16) -> TcpStream {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => return stream,
                Err(e) if tokio::time::Instant::now() >= deadline => {
                    panic!("logferry never listened on {port}: {e}")
                }
                Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    }
}

pub fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}

pub async fn wait_for_lines(path: &Path, count: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while read_lines(path).len() < count {
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected {count} lines in {}, found {}",
            path.display(),
            read_lines(path).len()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
