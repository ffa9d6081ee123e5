use crate::record::{MalformedRecordError, strip_port};
use pretty_assertions::assert_eq;

#[test]
fn strips_port_from_ipv4() {
    assert_eq!(strip_port("203.0.113.5:41000").unwrap(), "203.0.113.5");
}

#[test]
fn strips_port_and_brackets_from_ipv6() {
    assert_eq!(strip_port("[2001:db8::1]:41000").unwrap(), "2001:db8::1");
}

#[test]
fn strips_port_from_hostname() {
    assert_eq!(strip_port("localhost:8080").unwrap(), "localhost");
}

#[test]
fn bare_addresses_pass_through() {
    assert_eq!(strip_port("203.0.113.5").unwrap(), "203.0.113.5");
    assert_eq!(strip_port("2001:db8::1").unwrap(), "2001:db8::1");
    assert_eq!(strip_port("[::1]").unwrap(), "::1");
}

#[test]
fn stripping_is_idempotent() {
    for addr in ["203.0.113.5:41000", "[2001:db8::1]:41000", "[::1]:9"] {
        let once = strip_port(addr).unwrap();
        let twice = strip_port(once).unwrap();
        assert_eq!(once, twice, "address {addr}");
    }
}

#[test]
fn rejects_address_without_port_separator() {
    let err = strip_port("localhost").unwrap_err();
    assert!(matches!(
        err,
        MalformedRecordError::InvalidAddress { ref addr, .. } if addr == "localhost"
    ));
}

#[test]
fn rejects_unbalanced_brackets() {
    let err = strip_port("[2001:db8::1:41000").unwrap_err();
    assert!(matches!(err, MalformedRecordError::InvalidAddress { .. }));
}

#[test]
fn rejects_empty_host() {
    assert!(strip_port(":41000").is_err());
}
