use crate::conf::{Framing, SocketSourceConfig};
use crate::record::{MalformedRecordError, RawRecord};
use crate::source::framing::{CHUNK_SIZE, Frame, RecordDecoder};
use crate::source::{Boundary, CloseReason, RecordSource, SourceError, SourceEvent};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;

/// Initial read buffer for newline framing; it grows as records need.
const LINE_BUFFER_SIZE: usize = 8 * 1024;

struct Connection {
    peer: SocketAddr,
    frames: FramedRead<TcpStream, RecordDecoder>,
}

/// Accepts one producer connection at a time and yields the records it sends.
///
/// The listener is bound once. A connection is only accepted after the
/// previous one has been dropped, so a second producer waits in the listen
/// backlog until the first disconnects.
pub struct SocketStreamSource {
    listener: TcpListener,
    local_addr: SocketAddr,
    framing: Framing,
    max_record_size: usize,
    idle_timeout: Option<Duration>,
    connection: Option<Connection>,
}

impl SocketStreamSource {
    pub async fn bind(config: &SocketSourceConfig) -> Result<Self, SourceError> {
        let bind_err = |source| SourceError::Bind {
            address: config.address.clone(),
            source,
        };

        let listener = TcpListener::bind(&config.address).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        tracing::info!(
            address = %local_addr,
            framing = ?config.framing,
            "TCP/IP network socket server created"
        );

        Ok(Self {
            listener,
            local_addr,
            framing: config.framing,
            max_record_size: config.max_record_size,
            idle_timeout: config.idle_timeout,
            connection: None,
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    #[cfg(test)]
    pub(crate) fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    async fn accept(&mut self, cancel: &CancellationToken) -> Result<SourceEvent, SourceError> {
        tracing::info!(address = %self.local_addr, "producer not connected: waiting for connection");

        let (stream, peer) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(SourceEvent::Cancelled),
            accepted = self.listener.accept() => {
                accepted.map_err(|source| SourceError::Accept { source })?
            }
        };

        let capacity = match self.framing {
            Framing::Chunk => CHUNK_SIZE,
            Framing::Newline => LINE_BUFFER_SIZE,
        };
        let decoder = RecordDecoder::new(self.framing, self.max_record_size);

        self.connection = Some(Connection {
            peer,
            frames: FramedRead::with_capacity(stream, decoder, capacity),
        });

        Ok(SourceEvent::Connected { peer })
    }

    fn close(&mut self, peer: SocketAddr, reason: CloseReason) -> SourceEvent {
        self.connection = None;
        SourceEvent::Boundary(Boundary::ConnectionClosed { peer, reason })
    }
}

#[async_trait]
impl RecordSource for SocketStreamSource {
    fn describe(&self) -> String {
        format!("socket {}", self.local_addr)
    }

    async fn next_event(&mut self, cancel: &CancellationToken) -> Result<SourceEvent, SourceError> {
        loop {
            let idle_timeout = self.idle_timeout;
            let Some(conn) = self.connection.as_mut() else {
                return self.accept(cancel).await;
            };
            let peer = conn.peer;

            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(SourceEvent::Cancelled),
                received = next_frame(&mut conn.frames, idle_timeout) => received,
            };

            return Ok(match received {
                Some(Some(Ok(Frame::Record(bytes)))) => {
                    let record = RawRecord::new(bytes);
                    match (record.trimmed().is_empty(), self.framing) {
                        (true, Framing::Newline) => continue,
                        // A receive is a record in chunk framing, even a blank one.
                        (true, Framing::Chunk) => SourceEvent::Rejected(MalformedRecordError::Empty),
                        (false, _) => SourceEvent::Record(record),
                    }
                }
                Some(Some(Ok(Frame::Oversized { size }))) => {
                    SourceEvent::Rejected(MalformedRecordError::TooLarge {
                        size,
                        limit: self.max_record_size,
                    })
                }
                Some(Some(Err(e))) if is_connection_reset(&e) => {
                    tracing::warn!(%peer, error = %e, "connection reset by producer");
                    self.close(peer, CloseReason::Reset)
                }
                Some(Some(Err(e))) => {
                    self.connection = None;
                    return Err(SourceError::Receive { peer, source: e });
                }
                Some(None) => self.close(peer, CloseReason::Eof),
                None => {
                    tracing::warn!(%peer, timeout = ?idle_timeout, "producer idle, closing connection");
                    self.close(peer, CloseReason::IdleTimeout)
                }
            });
        }
    }
}

/// Next frame from the connection; `None` when the idle timeout fired first.
async fn next_frame(
    frames: &mut FramedRead<TcpStream, RecordDecoder>,
    idle_timeout: Option<Duration>,
) -> Option<Option<io::Result<Frame>>> {
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, frames.next()).await.ok(),
        None => Some(frames.next().await),
    }
}

pub(crate) fn is_connection_reset(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe
    )
}
