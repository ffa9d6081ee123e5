use crate::conf::{
    ConfigError, DEFAULT_MAX_RECORD_SIZE, FerryConfig, FerryOptions, FileSourceConfig,
    SinkConfig, SinkTarget, SocketSourceConfig, SourceConfig,
};
use std::path::{Component, Path};
use std::time::Duration;

#[derive(Default)]
struct ValidationCtx {
    errors: Vec<ConfigError>,
}

impl ValidationCtx {
    fn push(&mut self, err: ConfigError) {
        self.errors.push(err);
    }

    fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Check the option combination and build the immutable config.
///
/// Runs before any file or socket is touched. All violations are reported
/// together.
pub fn validate(options: &FerryOptions) -> Result<FerryConfig, ConfigError> {
    let mut ctx = ValidationCtx::default();

    let input = &options.input;
    let output = &options.output;
    let interval = input.interval_secs.unwrap_or(0);

    let source = match (&input.file, &input.listen) {
        (Some(path), None) => Some(SourceConfig::File(FileSourceConfig {
            path: path.clone(),
            poll_interval: Duration::from_secs(interval),
        })),
        (None, Some(addr)) => Some(SourceConfig::Socket(SocketSourceConfig {
            address: addr.clone(),
            framing: input.framing.unwrap_or_default(),
            max_record_size: input.max_record_size.unwrap_or(DEFAULT_MAX_RECORD_SIZE),
            idle_timeout: input
                .idle_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })),
        (Some(_), Some(_)) => {
            ctx.push(ConfigError::ConflictingSources);
            None
        }
        (None, None) => {
            ctx.push(ConfigError::MissingSource);
            None
        }
    };

    if input.listen.is_some() && interval > 0 {
        ctx.push(ConfigError::IntervalRequiresFileSource);
    }

    if input.file.is_some() && output.json.is_some() {
        ctx.push(ConfigError::RawSinkRequiresSocketSource);
    }

    if output.goaccess.is_none() && output.json.is_none() {
        ctx.push(ConfigError::NoSinks);
    }

    if let Some(addr) = &input.listen {
        if let Err(reason) = check_listen_address(addr) {
            ctx.push(ConfigError::InvalidListenAddress {
                addr: addr.clone(),
                reason,
            });
        }
    }

    if input.max_record_size == Some(0) {
        ctx.push(ConfigError::ZeroMaxRecordSize);
    }

    let sinks = SinkConfig {
        analyzer: output.goaccess.as_deref().map(SinkTarget::from_path),
        raw: output.json.as_deref().map(SinkTarget::from_path),
    };

    // Both sinks on stdout is allowed; whole lines interleave.
    if let (Some(SinkTarget::File(analyzer)), Some(SinkTarget::File(raw))) =
        (&sinks.analyzer, &sinks.raw)
    {
        if same_file_path(analyzer, raw) {
            ctx.push(ConfigError::SameOutputTarget {
                path: analyzer.clone(),
            });
        }
    }

    ctx.into_result()?;

    let Some(source) = source else {
        return Err(ConfigError::MissingSource);
    };

    Ok(FerryConfig {
        source,
        sinks,
        timezone: options.records.timezone.unwrap_or_default(),
        on_malformed: options.records.on_malformed.unwrap_or_default(),
    })
}

fn check_listen_address(addr: &str) -> Result<(), &'static str> {
    let Some((host, port)) = addr.rsplit_once(':') else {
        return Err("expected host:port");
    };

    if host.is_empty() {
        return Err("missing host");
    }

    port.parse::<u16>().map_err(|_| "port must be a number between 0 and 65535")?;
    Ok(())
}

/// Lexical comparison; `./a.log` and `a.log` name the same file.
fn same_file_path(a: &Path, b: &Path) -> bool {
    fn significant(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<Vec<_>>()
    }
    significant(a) == significant(b)
}
