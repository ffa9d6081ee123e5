use crate::conf::SinkTarget;
use crate::source::{Boundary, CloseReason};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

pub(crate) fn batch_written(count: u64, target: Option<&SinkTarget>) {
    if count == 0 {
        return;
    }
    match target {
        Some(target) => info!(count, output = %target, "{count} log entries written to {target}"),
        None => info!(count, "{count} log entries written"),
    }
}

pub(crate) fn total_written(total: u64, rejected: u64, target: Option<&SinkTarget>) {
    match target {
        Some(target) => info!(
            total,
            rejected,
            output = %target,
            "TOTAL: {total} log entries written to {target}"
        ),
        None => info!(total, rejected, "TOTAL: {total} log entries written"),
    }
}

pub(crate) fn connected(peer: SocketAddr) {
    info!(%peer, "producer @ {peer} connected");
}

pub(crate) fn boundary(boundary: &Boundary) {
    match boundary {
        Boundary::PollCycle { next_check } => sleeping(*next_check),
        Boundary::ConnectionClosed { peer, reason } => {
            let reason = match reason {
                CloseReason::Eof => "closed",
                CloseReason::Reset => "reset",
                CloseReason::IdleTimeout => "idle timeout",
            };
            info!(%peer, reason, "producer @ {peer} disconnected");
        }
    }
}

fn sleeping(next_check: Duration) {
    let seconds = next_check.as_secs_f64();
    info!(
        seconds,
        "sleeping for {seconds} seconds before checking for additional log entries"
    );
}
