use crate::cli::FerryArgs;
use crate::conf::{ConfigError, FerryConfig, SourceConfig, validate};
use miette::Report;
use owo_colors::OwoColorize;
use std::process::ExitCode;

/// Exit status for any configuration problem.
pub const CONFIG_ERROR_EXIT: u8 = 2;

pub fn check(args: &FerryArgs, plain: bool) -> ExitCode {
    match args.resolve().and_then(|options| validate(&options)) {
        Ok(config) => {
            println!("{} Config is valid", "✔".green());
            for line in describe(&config) {
                println!("{} {line}", "✔".green());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_config_error(err, plain);
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}

/// One line per resolved setting, as shown by `check`.
pub fn describe(config: &FerryConfig) -> Vec<String> {
    let mut lines = Vec::new();

    match &config.source {
        SourceConfig::File(file) if file.poll_interval.is_zero() => {
            lines.push(format!("input: file {}", file.path.display()));
        }
        SourceConfig::File(file) => lines.push(format!(
            "input: file {} (checked every {}s)",
            file.path.display(),
            file.poll_interval.as_secs()
        )),
        SourceConfig::Socket(socket) => {
            lines.push(format!("input: network {}", socket.address));
            lines.push(format!("framing: {:?}", socket.framing).to_lowercase());
            if let Some(idle) = socket.idle_timeout {
                lines.push(format!("idle timeout: {}s", idle.as_secs()));
            }
        }
    }

    if let Some(target) = &config.sinks.analyzer {
        lines.push(format!("goaccess output: {target}"));
    }
    if let Some(target) = &config.sinks.raw {
        lines.push(format!("json output: {target}"));
    }

    lines.push(format!("timezone: {:?}", config.timezone).to_lowercase());
    lines.push(format!("malformed records: {:?}", config.on_malformed).to_lowercase());
    lines
}

pub fn print_config_error(err: ConfigError, plain: bool) {
    let hints: Vec<&'static str> = err
        .violations()
        .into_iter()
        .filter_map(config_error_hint)
        .collect();

    if plain {
        eprintln!("{}: {err}", "error".red().bold());
        for violation in err.violations() {
            if !std::ptr::eq(violation, &err) {
                eprintln!("  - {violation}");
            }
        }
    } else {
        eprintln!();
        eprintln!("{:?}", Report::new(err));
    }

    for hint in hints {
        eprintln!();
        eprintln!("{hint}");
    }
}

/// Config file snippets for the errors an operator is likely to hit when
/// moving options into TOML.
pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Sources
        //---------------------------------------------------------------------
        ConfigError::MissingSource | ConfigError::ConflictingSources => Some(
            "Configure exactly one input.\n\
             \n\
             Example:\n\
             \n\
             [input]\n\
             file = \"/var/log/caddy/access.log\"\n\
             interval_secs = 600",
        ),

        ConfigError::InvalidListenAddress { .. } => Some(
            "Network input listens on host:port.\n\
             \n\
             Example:\n\
             \n\
             [input]\n\
             listen = \"localhost:55555\"",
        ),

        //---------------------------------------------------------------------
        // Sinks
        //---------------------------------------------------------------------
        ConfigError::NoSinks => Some(
            "Example:\n\
             \n\
             [output]\n\
             goaccess = \"access.goaccess.log\"\n\
             json = \"access.json\"",
        ),

        //---------------------------------------------------------------------
        // Everything else: the diagnostic help is enough
        //---------------------------------------------------------------------
        _ => None,
    }
}
