use crate::conf::{Framing, SocketSourceConfig};
use crate::record::MalformedRecordError;
use crate::source::{
    Boundary, CloseReason, RecordSource, SocketStreamSource, SourceError, SourceEvent,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

//-----------------------------------------------------------------------------
// Helpers
//-----------------------------------------------------------------------------

async fn bind(framing: Framing) -> SocketStreamSource {
    let mut config = SocketSourceConfig::new("127.0.0.1:0");
    config.framing = framing;
    config.max_record_size = 64;
    SocketStreamSource::bind(&config).await.unwrap()
}

async fn next(source: &mut SocketStreamSource, cancel: &CancellationToken) -> SourceEvent {
    tokio::time::timeout(Duration::from_secs(5), source.next_event(cancel))
        .await
        .expect("source stalled")
        .unwrap()
}

fn text(event: &SourceEvent) -> String {
    match event {
        SourceEvent::Record(r) => String::from_utf8(r.trimmed().to_vec()).unwrap(),
        other => panic!("expected record, got {other:?}"),
    }
}

//-----------------------------------------------------------------------------
// Tests
//-----------------------------------------------------------------------------

#[tokio::test]
async fn yields_records_then_closes_on_eof() {
    // Arrange
    let mut source = bind(Framing::Newline).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut client = TcpStream::connect(addr).await.unwrap();
    let client_addr = client.local_addr().unwrap();
    client.write_all(b"{\"n\":1}\n{\"n\":2}\n").await.unwrap();
    client.shutdown().await.unwrap();

    // Act + Assert
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { peer } if peer == client_addr
    ));
    assert_eq!(text(&next(&mut source, &cancel).await), "{\"n\":1}");
    assert_eq!(text(&next(&mut source, &cancel).await), "{\"n\":2}");
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Boundary(Boundary::ConnectionClosed {
            reason: CloseReason::Eof,
            ..
        })
    ));
    assert!(!source.is_connected());
}

#[tokio::test]
async fn record_split_across_writes_is_reassembled() {
    let mut source = bind(Framing::Newline).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut client = TcpStream::connect(addr).await.unwrap();
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));

    client.write_all(b"{\"n\":").await.unwrap();
    client.flush().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.write_all(b"1}\n").await.unwrap();

    assert_eq!(text(&next(&mut source, &cancel).await), "{\"n\":1}");
}

#[tokio::test]
async fn second_producer_is_accepted_after_first_disconnects() {
    // Arrange
    let mut source = bind(Framing::Newline).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut first = TcpStream::connect(addr).await.unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();
    let first_addr = first.local_addr().unwrap();
    let second_addr = second.local_addr().unwrap();
    second.write_all(b"{\"from\":\"second\"}\n").await.unwrap();
    first.write_all(b"{\"from\":\"first\"}\n").await.unwrap();

    // Act + Assert: the first connection is served to completion
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { peer } if peer == first_addr
    ));
    assert_eq!(text(&next(&mut source, &cancel).await), "{\"from\":\"first\"}");
    first.shutdown().await.unwrap();
    drop(first);
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Boundary(Boundary::ConnectionClosed { peer, .. }) if peer == first_addr
    ));

    // Only now does the queued producer get through
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { peer } if peer == second_addr
    ));
    assert_eq!(text(&next(&mut source, &cancel).await), "{\"from\":\"second\"}");
}

#[tokio::test]
async fn oversized_record_is_rejected_and_stream_continues() {
    let mut source = bind(Framing::Newline).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut client = TcpStream::connect(addr).await.unwrap();
    let big = format!("{{\"pad\":\"{}\"}}\n", "x".repeat(100));
    client.write_all(big.as_bytes()).await.unwrap();
    client.write_all(b"{\"n\":1}\n").await.unwrap();

    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Rejected(MalformedRecordError::TooLarge { limit: 64, .. })
    ));
    assert_eq!(text(&next(&mut source, &cancel).await), "{\"n\":1}");
}

#[tokio::test]
async fn blank_lines_from_producer_are_skipped() {
    let mut source = bind(Framing::Newline).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut client = TcpStream::connect(addr).await.unwrap();
    client.write_all(b"\n\r\n{\"n\":1}\n").await.unwrap();

    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));
    assert_eq!(text(&next(&mut source, &cancel).await), "{\"n\":1}");
}

#[tokio::test]
async fn chunk_framing_yields_whole_receive() {
    let mut source = bind(Framing::Chunk).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut client = TcpStream::connect(addr).await.unwrap();
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));
    client.write_all(b"  {\"n\":1}  ").await.unwrap();

    assert_eq!(text(&next(&mut source, &cancel).await), "{\"n\":1}");
}

#[tokio::test]
async fn blank_receive_in_chunk_framing_is_rejected() {
    let mut source = bind(Framing::Chunk).await;
    let addr = source.local_addr();
    let cancel = CancellationToken::new();

    let mut client = TcpStream::connect(addr).await.unwrap();
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));
    client.write_all(b" \r\n ").await.unwrap();

    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Rejected(MalformedRecordError::Empty)
    ));
}

#[tokio::test]
async fn idle_connection_is_closed_after_timeout() {
    // Arrange
    let mut config = SocketSourceConfig::new("127.0.0.1:0");
    config.idle_timeout = Some(Duration::from_millis(30));
    let mut source = SocketStreamSource::bind(&config).await.unwrap();
    let cancel = CancellationToken::new();
    let _client = TcpStream::connect(source.local_addr()).await.unwrap();

    // Act
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));
    let event = next(&mut source, &cancel).await;

    // Assert
    assert!(matches!(
        event,
        SourceEvent::Boundary(Boundary::ConnectionClosed {
            reason: CloseReason::IdleTimeout,
            ..
        })
    ));
}

#[tokio::test]
async fn cancellation_interrupts_accept() {
    let mut source = bind(Framing::Newline).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let event = next(&mut source, &cancel).await;

    assert!(matches!(event, SourceEvent::Cancelled));
}

#[tokio::test]
async fn cancellation_interrupts_receive() {
    let mut source = bind(Framing::Newline).await;
    let cancel = CancellationToken::new();
    let _client = TcpStream::connect(source.local_addr()).await.unwrap();
    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Connected { .. }
    ));

    cancel.cancel();

    assert!(matches!(
        next(&mut source, &cancel).await,
        SourceEvent::Cancelled
    ));
}

#[tokio::test]
async fn binding_a_taken_address_fails() {
    let taken = bind(Framing::Newline).await;
    let config = SocketSourceConfig::new(taken.local_addr().to_string());

    let err = SocketStreamSource::bind(&config).await.err().unwrap();

    assert!(matches!(err, SourceError::Bind { .. }));
}
