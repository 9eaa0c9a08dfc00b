//! Bounded reassembly of chunked messages
//!
//! Writes larger than a single MTU arrive as a numbered run of envelopes.
//! The buffer accepts them strictly in order, restarts whenever index 1
//! shows up, and fails fast on everything else: a gap, a repeat, a run that
//! changes its declared total mid-flight, or a message that would outgrow
//! the configured capacity all reset the buffer so the client can
//! retransmit from the top. At most one message is ever in flight.

use bytes::{Bytes, BytesMut};

use crate::error::{LinkError, Result};
use crate::protocol::ChunkEnvelope;

/// Outcome of feeding one envelope to the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Push {
    /// Chunk stored, more expected
    Accepted { index: u32 },
    /// Final chunk stored, message handed back
    Complete { index: u32, message: Bytes },
}

/// Accumulates one in-flight message per connection
#[derive(Debug)]
pub struct ReassemblyBuffer {
    capacity: usize,
    buf: BytesMut,
    expected_total: u32,
    received: u32,
}

impl ReassemblyBuffer {
    pub fn new(capacity: usize) -> Self {
        ReassemblyBuffer {
            capacity,
            buf: BytesMut::with_capacity(capacity),
            expected_total: 0,
            received: 0,
        }
    }

    /// Feed one envelope. Errors have already reset the buffer when they
    /// return, so the caller only needs to report them.
    pub fn push(&mut self, chunk: &ChunkEnvelope) -> Result<Push> {
        if chunk.index == 1 {
            // A leading chunk always starts a new message, even when one
            // is already in flight.
            self.buf.clear();
            self.expected_total = chunk.total;
            self.received = 0;
        }

        if chunk.index != self.received + 1 || chunk.total != self.expected_total {
            let expected = self.received + 1;
            let expected_total = self.expected_total;
            self.reset();
            return Err(LinkError::Sequence {
                index: chunk.index,
                total: chunk.total,
                expected,
                expected_total,
            });
        }

        // The message may grow to at most capacity - 2 bytes; one byte of
        // headroom stays in reserve.
        let data = chunk.data.as_bytes();
        let required = self.buf.len() + data.len() + 1;
        if required >= self.capacity {
            self.reset();
            return Err(LinkError::Capacity {
                required,
                capacity: self.capacity,
            });
        }

        self.buf.extend_from_slice(data);
        self.received = chunk.index;

        if self.received == self.expected_total {
            let message = self.buf.split().freeze();
            self.reset();
            Ok(Push::Complete {
                index: chunk.index,
                message,
            })
        } else {
            Ok(Push::Accepted { index: chunk.index })
        }
    }

    /// True while a message is partially buffered
    pub fn in_progress(&self) -> bool {
        self.received != 0
    }

    /// Bytes buffered so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.expected_total = 0;
        self.received = 0;
    }
}
