use serde_json::{Value, json};

/// A Caddy access log entry as emitted by `log { format json }`.
///
/// `n` varies the URI, client port, and timestamp so that entries are
/// distinguishable in output.
pub fn caddy_record(n: u64) -> Value {
    json!({
        "level": "info",
        "ts": 1700000000.0 + n as f64,
        "logger": "http.log.access.log0",
        "msg": "handled request",
        "request": {
            "remote_ip": "203.0.113.5",
            "remote_addr": format!("203.0.113.5:{}", 41000 + n),
            "proto": "HTTP/2.0",
            "method": "GET",
            "host": "example.com",
            "uri": format!("/page/{n}"),
            "headers": {
                "Referer": ["https://example.com/"],
                "User-Agent": ["Mozilla/5.0 (X11; Linux x86_64)"]
            }
        },
        "bytes_read": 0,
        "user_id": "",
        "duration": 0.000512,
        "size": 1024,
        "status": 200,
        "resp_headers": {
            "Content-Type": ["text/html; charset=utf-8"]
        }
    })
}

/// One JSON document per line for each `n` in `range`.
pub fn caddy_records(range: std::ops::Range<u64>) -> String {
    range.map(|n| format!("{}\n", caddy_record(n))).collect()
}
