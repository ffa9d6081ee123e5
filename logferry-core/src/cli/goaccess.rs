use crate::record::{ANALYZER_COLUMNS, ANALYZER_DATE_FORMAT, ANALYZER_TIME_FORMAT};
use std::path::Path;

/// The goaccess invocation matching the columns logferry writes.
pub fn goaccess_command(log: &Path) -> String {
    format!(
        "goaccess {} --log-format=\"{}\" --date-format={} --time-format={} -o report.html",
        log.display(),
        ANALYZER_COLUMNS.join(" "),
        ANALYZER_DATE_FORMAT,
        ANALYZER_TIME_FORMAT,
    )
}

pub fn print_goaccess_format(log: &Path) {
    println!("{}", goaccess_command(log));
}
