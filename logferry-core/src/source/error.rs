use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("input file \"{}\" not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to open input file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to accept connection: {source}")]
    Accept {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to receive from {peer}: {source}")]
    Receive {
        peer: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
