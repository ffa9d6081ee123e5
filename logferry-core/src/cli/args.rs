use crate::conf::{
    ConfigError, FerryOptions, Framing, InputOptions, MalformedPolicy, OutputOptions,
    RecordOptions, TimeZoneChoice, load_config,
};
use crate::logging::LogFormat;
use clap::Args;
use std::path::PathBuf;

/// Options shared by the default run and the `check` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct FerryArgs {
    /// Accept a Caddy `output net` log stream on host:port
    #[arg(short, long, global = true, value_name = "HOST:PORT")]
    pub network_address: Option<String>,

    /// Existing Caddy JSON log file to convert
    #[arg(short, long, global = true, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Seconds to sleep at end of input before checking for appended entries (0 = stop)
    #[arg(short = 't', long, global = true, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Write GoAccess lines here (`-` for stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub goaccess_output: Option<PathBuf>,

    /// Copy the JSON records here (`-` for stdout, network input only)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// TOML config file; command line flags take precedence
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub on_malformed: Option<MalformedPolicy>,

    #[arg(long, global = true, value_enum)]
    pub framing: Option<Framing>,

    /// Largest newline-framed record accepted from the network
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_record_size: Option<usize>,

    /// Drop a producer connection after this many silent seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub idle_timeout: Option<u64>,

    /// Render dates and times in UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl FerryArgs {
    /// Options set on the command line alone.
    pub fn to_options(&self) -> FerryOptions {
        FerryOptions {
            input: InputOptions {
                file: self.input.clone(),
                listen: self.network_address.clone(),
                interval_secs: self.interval,
                framing: self.framing,
                max_record_size: self.max_record_size,
                idle_timeout_secs: self.idle_timeout,
            },
            output: OutputOptions {
                goaccess: self.goaccess_output.clone(),
                json: self.json_output.clone(),
            },
            records: RecordOptions {
                on_malformed: self.on_malformed,
                timezone: self.utc.then_some(TimeZoneChoice::Utc),
            },
        }
    }

    /// Config file (if any) with the command line layered on top.
    pub fn resolve(&self) -> Result<FerryOptions, ConfigError> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => FerryOptions::default(),
        };
        Ok(base.merge(self.to_options()))
    }
}
