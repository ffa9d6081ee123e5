mod args;
mod check;
mod goaccess;


pub use args::*;
pub use check::*;
pub use goaccess::*;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the resolved options and exit
    Check {
        /// Print errors without diagnostic formatting
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print the goaccess command that reads logferry output
    GoaccessFormat {
        /// Log file goaccess should read
        #[arg(default_value = "access.goaccess.log")]
        log: PathBuf,
    },
}
