use crate::conf::Framing;
use bytes::{Buf, Bytes, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

/// Receive size in chunk framing; one receive of up to this many bytes is one record.
pub const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Record(Bytes),
    /// A newline-framed record longer than the limit; its bytes were dropped.
    Oversized { size: usize },
}

/// Cuts a producer's byte stream into records.
///
/// Newline framing keeps a growable buffer, so a record split over several
/// reads is reassembled and several records in one read are split apart.
/// Once a record passes `max_record_size` the rest of it is discarded up to
/// the next newline instead of being buffered.
#[derive(Debug)]
pub struct RecordDecoder {
    framing: Framing,
    max_record_size: usize,
    /// Where to resume the newline search in the buffer.
    next_index: usize,
    /// Bytes dropped so far from an oversized record.
    discarding: Option<usize>,
}

impl RecordDecoder {
    pub fn new(framing: Framing, max_record_size: usize) -> Self {
        Self {
            framing,
            max_record_size,
            next_index: 0,
            discarding: None,
        }
    }

    fn decode_chunk(&mut self, src: &mut BytesMut) -> Option<Frame> {
        if src.is_empty() {
            return None;
        }
        let n = src.len().min(CHUNK_SIZE);
        Some(Frame::Record(src.split_to(n).freeze()))
    }

    fn decode_line(&mut self, src: &mut BytesMut) -> Option<Frame> {
        let start = self.next_index.min(src.len());

        match src[start..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = start + offset;
                self.next_index = 0;

                if let Some(dropped) = self.discarding.take() {
                    src.advance(end + 1);
                    return Some(Frame::Oversized {
                        size: dropped + end,
                    });
                }

                if end > self.max_record_size {
                    src.advance(end + 1);
                    return Some(Frame::Oversized { size: end });
                }

                Some(Frame::Record(src.split_to(end + 1).freeze()))
            }
            None => {
                if let Some(dropped) = self.discarding.as_mut() {
                    *dropped += src.len();
                    src.clear();
                    self.next_index = 0;
                } else if src.len() > self.max_record_size {
                    self.discarding = Some(src.len());
                    src.clear();
                    self.next_index = 0;
                } else {
                    self.next_index = src.len();
                }
                None
            }
        }
    }
}

impl Decoder for RecordDecoder {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, io::Error> {
        Ok(match self.framing {
            Framing::Chunk => self.decode_chunk(src),
            Framing::Newline => self.decode_line(src),
        })
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, io::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        self.next_index = 0;

        // The producer went away mid-record; whatever is left is the last record.
        if let Some(dropped) = self.discarding.take() {
            let size = dropped + src.len();
            src.clear();
            return Ok(Some(Frame::Oversized { size }));
        }

        if src.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Frame::Record(src.split().freeze())))
        }
    }
}
