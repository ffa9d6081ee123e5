use crate::record::{AccessRecord, MalformedRecordError};
use chrono::{Local, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// GoAccess `--log-format` tokens, in the order the columns are written.
pub const ANALYZER_COLUMNS: [&str; 12] = [
    "%d", "%t", "%v", "%h", "%m", "%U", "%H", "%s", "%b", "%T", "%R", "%u",
];

/// GoAccess `--date-format`, also used to render the date column.
pub const ANALYZER_DATE_FORMAT: &str = "%F";

/// GoAccess `--time-format`, also used to render the time column.
pub const ANALYZER_TIME_FORMAT: &str = "%H:%M:%S";

const UNKNOWN_REFERER: &str = "unknown";

/// Zone used when splitting the record timestamp into date and time columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    #[default]
    Local,
    Utc,
}

/// One rendered output line, without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerLine(String);

impl AnalyzerLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalyzerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns decoded records into analyzer lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer {
    zone: TimeZoneChoice,
}

impl Transformer {
    pub fn new(zone: TimeZoneChoice) -> Self {
        Self { zone }
    }

    /// Decode and render in one step.
    pub fn convert(&self, value: &Value) -> Result<AnalyzerLine, MalformedRecordError> {
        let record = AccessRecord::from_value(value)?;
        Ok(self.render(&record))
    }

    pub fn render(&self, record: &AccessRecord) -> AnalyzerLine {
        match self.zone {
            TimeZoneChoice::Local => render_in(record, &Local),
            TimeZoneChoice::Utc => render_in(record, &Utc),
        }
    }
}

fn render_in<Tz>(record: &AccessRecord, tz: &Tz) -> AnalyzerLine
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let at = record.timestamp.with_timezone(tz);

    let referer = record.referer.as_deref().unwrap_or(UNKNOWN_REFERER);
    let user_agent = record.user_agent.as_deref().unwrap_or("");

    AnalyzerLine(format!(
        "{} {} {} {} {} {} {} {} {} {} {} \"{}\"",
        at.format(ANALYZER_DATE_FORMAT),
        at.format(ANALYZER_TIME_FORMAT),
        record.virtual_host,
        record.client_addr,
        record.method,
        record.uri,
        record.proto,
        record.status,
        record.size,
        record.duration,
        referer,
        user_agent,
    ))
}
