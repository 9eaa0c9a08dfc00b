//! Chunk envelopes and frame classification
//!
//! Messages that do not fit a single MTU-bounded write arrive as a series
//! of chunk envelopes:
//!
//! ```text
//! {"k":<1-based index>,"t":<total chunks>,"d":"<fragment>"}
//! ```
//!
//! A write is a chunk envelope only when it parses as a JSON object carrying
//! all three fields with exactly these types (integer `k` and `t`, string
//! `d`). Any other well-formed JSON is a complete message in its own right;
//! bytes that do not parse at all are noise.

use serde::Serialize;
use serde_json::Value;

use crate::error::{LinkError, Result};

/// One fragment of a multi-part inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkEnvelope {
    /// 1-based chunk index
    #[serde(rename = "k")]
    pub index: u32,

    /// Declared total chunk count
    #[serde(rename = "t")]
    pub total: u32,

    /// Fragment payload
    #[serde(rename = "d")]
    pub data: String,
}

impl ChunkEnvelope {
    /// Recognize a chunk envelope in an already-parsed write.
    ///
    /// Missing fields, a non-object, or a mistyped field (float or negative
    /// index, non-string payload) all mean "not an envelope"; the write
    /// then stands as a complete message instead.
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let index = obj.get("k")?.as_u64().and_then(|v| u32::try_from(v).ok())?;
        let total = obj.get("t")?.as_u64().and_then(|v| u32::try_from(v).ok())?;
        let data = obj.get("d")?.as_str()?;
        Some(Self {
            index,
            total,
            data: data.to_string(),
        })
    }
}

/// Classification of one inbound write
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A fragment for the reassembly buffer
    Chunk(ChunkEnvelope),

    /// A complete message, parsed but not yet interpreted
    Message(Value),
}

/// Classify one raw write.
///
/// Returns `LinkError::Protocol` for writes that do not parse as JSON; the
/// channel drops those without a wire response, since it cannot tell a
/// malformed write from radio noise.
pub fn classify(data: &[u8]) -> Result<Frame> {
    let value: Value = serde_json::from_slice(data)
        .map_err(|e| LinkError::Protocol(format!("unparsable write: {}", e)))?;

    match ChunkEnvelope::from_value(&value) {
        Some(envelope) => Ok(Frame::Chunk(envelope)),
        None => Ok(Frame::Message(value)),
    }
}

/// Split a message into the envelopes a client would write, in order.
///
/// Each fragment holds at most `fragment_size` bytes and never splits a
/// UTF-8 sequence, so every `d` field is valid JSON string content. An
/// empty message yields no envelopes.
pub fn split_message(message: &str, fragment_size: usize) -> Result<Vec<ChunkEnvelope>> {
    if fragment_size == 0 {
        return Err(LinkError::Protocol("fragment size must be nonzero".to_string()));
    }

    let mut fragments = Vec::new();
    let mut rest = message;
    while !rest.is_empty() {
        let cut = floor_char_boundary(rest, fragment_size);
        if cut == 0 {
            return Err(LinkError::Protocol(format!(
                "fragment size {} cannot hold a full character",
                fragment_size
            )));
        }
        let (head, tail) = rest.split_at(cut);
        fragments.push(head);
        rest = tail;
    }

    let total = fragments.len() as u32;
    Ok(fragments
        .into_iter()
        .enumerate()
        .map(|(i, fragment)| ChunkEnvelope {
            index: i as u32 + 1,
            total,
            data: fragment.to_string(),
        })
        .collect())
}

/// Largest index `<= at` that lands on a char boundary of `s`
fn floor_char_boundary(s: &str, at: usize) -> usize {
    if at >= s.len() {
        return s.len();
    }
    let mut index = at;
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
