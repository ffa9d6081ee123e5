use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use crate::record::TimeZoneChoice;

/// Largest newline-framed record accepted from a socket.
pub const DEFAULT_MAX_RECORD_SIZE: usize = 1024 * 1024;

/// Path value that selects stdout instead of a file.
pub const STDOUT_PATH: &str = "-";

//-----------------------------------------------------------------------------
// Unvalidated options (config file and command line)
//-----------------------------------------------------------------------------

/// Everything an operator can set, before the combination is checked.
///
/// A TOML config file deserializes straight into this; the command line builds
/// another instance and [`FerryOptions::merge`] layers it on top.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FerryOptions {
    #[serde(default)]
    pub input: InputOptions,

    #[serde(default)]
    pub output: OutputOptions,

    #[serde(default)]
    pub records: RecordOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputOptions {
    /// Caddy JSON log file to read.
    pub file: Option<PathBuf>,

    /// `host:port` to accept a Caddy `output net` stream on.
    pub listen: Option<String>,

    /// Seconds between checks for appended lines (file input only).
    pub interval_secs: Option<u64>,

    pub framing: Option<Framing>,

    pub max_record_size: Option<usize>,

    /// Close a connection that stays silent this long.
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputOptions {
    /// Converted GoAccess lines.
    pub goaccess: Option<PathBuf>,

    /// Verbatim copy of the JSON records (network input only).
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordOptions {
    pub on_malformed: Option<MalformedPolicy>,
    pub timezone: Option<TimeZoneChoice>,
}

impl FerryOptions {
    /// Layer `overrides` on top of `self`; any value set in `overrides` wins.
    pub fn merge(self, overrides: FerryOptions) -> FerryOptions {
        FerryOptions {
            input: InputOptions {
                file: overrides.input.file.or(self.input.file),
                listen: overrides.input.listen.or(self.input.listen),
                interval_secs: overrides.input.interval_secs.or(self.input.interval_secs),
                framing: overrides.input.framing.or(self.input.framing),
                max_record_size: overrides.input.max_record_size.or(self.input.max_record_size),
                idle_timeout_secs: overrides
                    .input
                    .idle_timeout_secs
                    .or(self.input.idle_timeout_secs),
            },
            output: OutputOptions {
                goaccess: overrides.output.goaccess.or(self.output.goaccess),
                json: overrides.output.json.or(self.output.json),
            },
            records: RecordOptions {
                on_malformed: overrides.records.on_malformed.or(self.records.on_malformed),
                timezone: overrides.records.timezone.or(self.records.timezone),
            },
        }
    }
}

//-----------------------------------------------------------------------------
// Validated configuration
//-----------------------------------------------------------------------------

/// How socket bytes are cut into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// One record per `\n`-terminated line, reassembled across reads.
    #[default]
    Newline,
    /// One record per receive call of up to 4096 bytes.
    Chunk,
}

/// What to do with a record that cannot be decoded or converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop ingestion at the first malformed record.
    #[default]
    Fail,
    /// Drop the record, count it, keep going.
    Skip,
}

/// Immutable configuration handed to the ingestion loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FerryConfig {
    pub source: SourceConfig,
    pub sinks: SinkConfig,
    pub timezone: TimeZoneChoice,
    pub on_malformed: MalformedPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    File(FileSourceConfig),
    Socket(SocketSourceConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileSourceConfig {
    pub path: PathBuf,
    /// Zero means read to the first EOF and stop.
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocketSourceConfig {
    pub address: String,
    pub framing: Framing,
    pub max_record_size: usize,
    pub idle_timeout: Option<Duration>,
}

impl SocketSourceConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            framing: Framing::default(),
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            idle_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkConfig {
    pub analyzer: Option<SinkTarget>,
    pub raw: Option<SinkTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    File(PathBuf),
    Stdout,
}

impl SinkTarget {
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == STDOUT_PATH {
            Self::Stdout
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => f.write_str("<stdout>"),
        }
    }
}
