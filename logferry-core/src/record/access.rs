use crate::record::MalformedRecordError;
use crate::record::address::strip_port;
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

const TS: &str = "ts";
const REQUEST: &str = "request";
const REMOTE_ADDR: &str = "request.remote_addr";
const HOST: &str = "request.host";
const METHOD: &str = "request.method";
const URI: &str = "request.uri";
const PROTO: &str = "request.proto";
const HEADERS: &str = "request.headers";
const REFERER: &str = "request.headers.Referer";
const USER_AGENT: &str = "request.headers.User-Agent";
const STATUS: &str = "status";
const SIZE: &str = "size";
const DURATION: &str = "duration";

/// Typed view of one access log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRecord {
    pub timestamp: DateTime<Utc>,
    pub virtual_host: String,
    /// Client address with port and IPv6 brackets stripped.
    pub client_addr: String,
    pub method: String,
    pub uri: String,
    pub proto: String,
    pub status: u16,
    pub size: u64,
    /// Kept as the source encoded it; no unit conversion.
    pub duration: Number,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

impl AccessRecord {
    pub fn from_value(value: &Value) -> Result<Self, MalformedRecordError> {
        let root = value.as_object().ok_or(MalformedRecordError::NotAnObject)?;

        let ts = required(root, "ts", TS)?
            .as_f64()
            .ok_or_else(|| MalformedRecordError::invalid(TS, "a number of epoch seconds"))?;
        let timestamp = timestamp_from_epoch(ts)
            .ok_or_else(|| MalformedRecordError::invalid(TS, "a representable instant"))?;

        let request = required(root, "request", REQUEST)?
            .as_object()
            .ok_or_else(|| MalformedRecordError::invalid(REQUEST, "an object"))?;

        let remote_addr = string(request, "remote_addr", REMOTE_ADDR)?;
        let client_addr = strip_port(remote_addr)?.to_string();

        let status = required(root, "status", STATUS)?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
            .ok_or_else(|| MalformedRecordError::invalid(STATUS, "an HTTP status code"))?;

        let size = required(root, "size", SIZE)?
            .as_u64()
            .ok_or_else(|| MalformedRecordError::invalid(SIZE, "a non-negative integer"))?;

        let duration = match required(root, "duration", DURATION)? {
            Value::Number(n) => n.clone(),
            _ => return Err(MalformedRecordError::invalid(DURATION, "a number")),
        };

        let (referer, user_agent) = match request.get("headers") {
            None | Some(Value::Null) => (None, None),
            Some(Value::Object(headers)) => (
                first_header(headers, "Referer", REFERER)?,
                first_header(headers, "User-Agent", USER_AGENT)?,
            ),
            Some(_) => return Err(MalformedRecordError::invalid(HEADERS, "an object")),
        };

        Ok(Self {
            timestamp,
            virtual_host: string(request, "host", HOST)?.to_string(),
            client_addr,
            method: string(request, "method", METHOD)?.to_string(),
            uri: string(request, "uri", URI)?.to_string(),
            proto: string(request, "proto", PROTO)?.to_string(),
            status,
            size,
            duration,
            referer,
            user_agent,
        })
    }
}

/// Epoch seconds to an instant, truncating toward the earlier second.
pub(crate) fn timestamp_from_epoch(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }

    let secs = ts.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }

    let nanos = (((ts - secs) * 1e9) as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos)
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<&'a Value, MalformedRecordError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(MalformedRecordError::missing(field)),
        Some(v) => Ok(v),
    }
}

fn string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<&'a str, MalformedRecordError> {
    required(obj, key, field)?
        .as_str()
        .ok_or_else(|| MalformedRecordError::invalid(field, "a string"))
}

/// First value of a header list. Caddy logs canonical header names, but
/// other producers may not.
fn first_header(
    headers: &Map<String, Value>,
    name: &str,
    field: &'static str,
) -> Result<Option<String>, MalformedRecordError> {
    let value = headers.get(name).or_else(|| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    });

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Array(values)) => match values.first() {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(MalformedRecordError::invalid(field, "a list of strings")),
        },
        Some(_) => Err(MalformedRecordError::invalid(field, "a list of strings")),
    }
}
