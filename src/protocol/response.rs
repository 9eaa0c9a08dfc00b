//! Reply definitions
//!
//! The fixed outbound JSON forms pushed to the client as notifies. Every
//! reply fits a single notify; only bulk payloads (none of these) need the
//! chunked send path.

use serde_json::json;

use crate::error::LinkError;

/// A reply to send to the client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    /// Chunk `k` accepted into the reassembly buffer
    Ack(u32),

    /// Command completed
    Ok,

    /// Ping answer
    Pong,

    /// A chunk broke the expected sequence; reassembly was reset
    ChunkSequence,

    /// The message cannot fit the reassembly buffer; reassembly was reset
    Overflow,

    /// Current leg positions
    Position { fr: f32, fl: f32, br: f32, bl: f32 },
}

impl Reply {
    /// Wire encoding of this reply
    pub fn to_json(&self) -> String {
        match self {
            Reply::Ack(index) => json!({ "ack": index }).to_string(),
            Reply::Ok => json!({ "ok": 1 }).to_string(),
            Reply::Pong => json!({ "p": 1 }).to_string(),
            Reply::ChunkSequence => json!({ "err": "chunk_seq" }).to_string(),
            Reply::Overflow => json!({ "err": "overflow" }).to_string(),
            // Positions go out as whole degrees.
            Reply::Position { fr, fl, br, bl } => {
                format!("{{\"pos\":[{:.0},{:.0},{:.0},{:.0}]}}", fr, fl, br, bl)
            }
        }
    }

    /// The wire error reply for a reassembly failure, where the protocol
    /// defines one
    pub fn for_error(error: &LinkError) -> Option<Reply> {
        match error {
            LinkError::Sequence { .. } => Some(Reply::ChunkSequence),
            LinkError::Capacity { .. } => Some(Reply::Overflow),
            _ => None,
        }
    }
}
