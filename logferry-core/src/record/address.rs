use crate::record::MalformedRecordError;
use std::net::IpAddr;

/// Strip the `:port` suffix (and IPv6 brackets) from a remote address.
///
/// `203.0.113.5:41000` becomes `203.0.113.5`, `[2001:db8::1]:41000` becomes
/// `2001:db8::1`. A value that is already a bare IP address is returned as is,
/// so stripping twice gives the same result as stripping once.
pub fn strip_port(addr: &str) -> Result<&str, MalformedRecordError> {
    if addr.parse::<IpAddr>().is_ok() {
        return Ok(addr);
    }

    if let Some(inner) = addr.strip_prefix('[').and_then(|a| a.strip_suffix(']')) {
        return Ok(inner);
    }

    let Some((host, _port)) = addr.rsplit_once(':') else {
        return Err(invalid(addr, "no port separator"));
    };

    let host = match host.strip_prefix('[') {
        Some(rest) => rest
            .strip_suffix(']')
            .ok_or_else(|| invalid(addr, "unbalanced brackets"))?,
        None => host,
    };

    if host.is_empty() {
        return Err(invalid(addr, "empty host"));
    }

    Ok(host)
}

fn invalid(addr: &str, reason: &'static str) -> MalformedRecordError {
    MalformedRecordError::InvalidAddress {
        addr: addr.to_string(),
        reason,
    }
}
