use crate::conf::SinkTarget;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output file \"{target}\" could not be opened: {source}")]
    Open {
        target: SinkTarget,
        #[source]
        source: std::io::Error,
    },

    #[error("output file \"{target}\" error: {source}")]
    Write {
        target: SinkTarget,
        #[source]
        source: std::io::Error,
    },
}
