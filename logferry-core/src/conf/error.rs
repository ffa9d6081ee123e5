use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    //-------------------------------------------------------------------------
    // Sources
    //-------------------------------------------------------------------------
    #[error("input can not be both a network address and a JSON input file")]
    #[diagnostic(help("Pass either --network-address or --input, not both."))]
    ConflictingSources,

    #[error("no input selected")]
    #[diagnostic(help(
        "Read a Caddy log file with --input <path>, or accept a Caddy \
         `output net` stream with --network-address <host:port>."
    ))]
    MissingSource,

    #[error("poll interval must be omitted (or zero) when a network address is the input")]
    #[diagnostic(help("Polling only applies to file input; a socket stream is read as it arrives."))]
    IntervalRequiresFileSource,

    #[error("invalid listen address '{addr}': {reason}")]
    #[diagnostic(help("Use host:port, for example localhost:55555 or 0.0.0.0:55555."))]
    InvalidListenAddress { addr: String, reason: &'static str },

    #[error("max record size must be greater than zero")]
    ZeroMaxRecordSize,

    //-------------------------------------------------------------------------
    // Sinks
    //-------------------------------------------------------------------------
    #[error("output can not be a JSON file when a JSON input file is also selected")]
    #[diagnostic(help("The input file already holds the raw records; drop --json-output."))]
    RawSinkRequiresSocketSource,

    #[error("goaccess and JSON output both write to {}", path.display())]
    #[diagnostic(help(
        "Each output needs its own file; two writers on one path overwrite each other's lines."
    ))]
    SameOutputTarget { path: PathBuf },

    #[error("no output file name specified")]
    #[diagnostic(help("Select --goaccess-output, --json-output, or both."))]
    NoSinks,

    //-------------------------------------------------------------------------
    // Top-level
    //-------------------------------------------------------------------------
    #[error("config validation failed")]
    Validation {
        #[related]
        errors: Vec<ConfigError>,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Individual violations, flattening an aggregated validation failure.
    pub fn violations(&self) -> Vec<&ConfigError> {
        match self {
            Self::Validation { errors } => errors.iter().collect(),
            other => vec![other],
        }
    }
}
