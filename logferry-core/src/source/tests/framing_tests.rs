use crate::conf::Framing;
use crate::source::{CHUNK_SIZE, Frame, RecordDecoder};
use bytes::{Bytes, BytesMut};
use pretty_assertions::assert_eq;
use tokio_util::codec::Decoder;

fn record(s: &str) -> Frame {
    Frame::Record(Bytes::copy_from_slice(s.as_bytes()))
}

#[test]
fn splits_two_records_from_one_read() {
    let mut decoder = RecordDecoder::new(Framing::Newline, 1024);
    let mut buf = BytesMut::from("{\"a\":1}\n{\"b\":2}\n");

    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(record("{\"a\":1}\n")));
    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(record("{\"b\":2}\n")));
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
}

#[test]
fn reassembles_record_split_across_reads() {
    // Arrange
    let mut decoder = RecordDecoder::new(Framing::Newline, 1024);
    let mut buf = BytesMut::from("{\"a\":");

    // Act + Assert
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
    buf.extend_from_slice(b"1}\n{\"b\"");
    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(record("{\"a\":1}\n")));
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
    buf.extend_from_slice(b":2}\n");
    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(record("{\"b\":2}\n")));
}

#[test]
fn eof_yields_unterminated_tail() {
    let mut decoder = RecordDecoder::new(Framing::Newline, 1024);
    let mut buf = BytesMut::from("{\"a\":1}");

    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
    assert_eq!(decoder.decode_eof(&mut buf).unwrap(), Some(record("{\"a\":1}")));
    assert_eq!(decoder.decode_eof(&mut buf).unwrap(), None);
}

#[test]
fn oversized_complete_line_is_dropped() {
    let mut decoder = RecordDecoder::new(Framing::Newline, 8);
    let mut buf = BytesMut::from("0123456789abc\n{\"a\":1}\n");

    assert_eq!(
        decoder.decode(&mut buf).unwrap(),
        Some(Frame::Oversized { size: 13 })
    );
    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(record("{\"a\":1}\n")));
}

#[test]
fn oversized_partial_line_is_discarded_until_newline() {
    // Arrange
    let mut decoder = RecordDecoder::new(Framing::Newline, 8);
    let mut buf = BytesMut::from("0123456789");

    // Act: over the limit with no newline yet
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
    assert!(buf.is_empty());

    buf.extend_from_slice(b"abcdef");
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
    assert!(buf.is_empty());

    buf.extend_from_slice(b"gh\n{}\n");

    // Assert
    assert_eq!(
        decoder.decode(&mut buf).unwrap(),
        Some(Frame::Oversized { size: 18 })
    );
    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(record("{}\n")));
}

#[test]
fn oversized_tail_at_eof_is_reported() {
    let mut decoder = RecordDecoder::new(Framing::Newline, 4);
    let mut buf = BytesMut::from("0123456");

    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
    buf.extend_from_slice(b"78");
    assert_eq!(
        decoder.decode_eof(&mut buf).unwrap(),
        Some(Frame::Oversized { size: 9 })
    );
}

#[test]
fn chunk_framing_treats_each_read_as_a_record() {
    let mut decoder = RecordDecoder::new(Framing::Chunk, 1024);
    let mut buf = BytesMut::from("{\"a\":1}\n{\"b\":2}\n");

    assert_eq!(
        decoder.decode(&mut buf).unwrap(),
        Some(record("{\"a\":1}\n{\"b\":2}\n"))
    );
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
}

#[test]
fn chunk_framing_caps_record_at_chunk_size() {
    let mut decoder = RecordDecoder::new(Framing::Chunk, 1024);
    let mut buf = BytesMut::from(vec![b'x'; CHUNK_SIZE + 10].as_slice());

    let Some(Frame::Record(first)) = decoder.decode(&mut buf).unwrap() else {
        panic!("expected record");
    };
    assert_eq!(first.len(), CHUNK_SIZE);
    assert_eq!(buf.len(), 10);
}
