//! Protocol Module
//!
//! Defines the JSON wire protocol between the client and the robot. Every
//! write and every notify carries one UTF-8 JSON text.
//!
//! ### Inbound (client → robot, one text per write)
//! ```text
//! chunk:     {"k":<uint>,"t":<uint>,"d":"<fragment>"}
//! move:      {"s":[fr,fl,br,bl,speed,(delay_ms)]}
//! sequence:  {"m":[[fr,fl,br,bl,speed,(delay_ms)], ...]}
//! ping:      {"p":<any>}
//! stance:    {"r":<any>}
//! keyed:     {"cmd":"servos",...}  |  {"cmd":"servo",...}
//! ```
//!
//! ### Outbound (robot → client, one text per notify)
//! ```text
//! ack:         {"ack":<k>}
//! ok:          {"ok":1}
//! ping reply:  {"p":1}
//! chunk error: {"err":"chunk_seq"}
//! overflow:    {"err":"overflow"}
//! telemetry:   {"pos":[fr,fl,br,bl]}
//! ```
//!
//! Inbound fragmenting is explicit (indexed envelopes, per-chunk acks)
//! because a client's own buffering may concatenate or reorder its writes.
//! Outbound fragmenting is bare byte slices in order: notifies ride the
//! connection's in-order delivery, so envelopes would buy nothing.

mod command;
mod envelope;
mod response;

pub use command::{Command, MoveAll, MoveSingle};
pub use envelope::{classify, split_message, ChunkEnvelope, Frame};
pub use response::Reply;
