//! Error types for puplink
//!
//! Provides a unified error type for all channel operations.
//!
//! Per-message failures (bad JSON, chunk sequence violations, buffer
//! overflow) are resolved inside the channel: the reassembly state resets
//! and, where the wire protocol defines one, a structured error notify goes
//! out. Only transport failures surface to the owning application.

use thiserror::Error;

/// Result type alias using LinkError
pub type Result<T> = std::result::Result<T, LinkError>;

/// Unified error type for puplink operations
#[derive(Debug, Error)]
pub enum LinkError {
    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Reassembly Errors
    // -------------------------------------------------------------------------
    #[error("chunk out of sequence: got chunk {index} of {total}, expected chunk {expected} of {expected_total}")]
    Sequence {
        index: u32,
        total: u32,
        expected: u32,
        expected_total: u32,
    },

    #[error("reassembly overflow: {required} bytes required, capacity {capacity}")]
    Capacity { required: usize, capacity: usize },

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("transport error: {0}")]
    Transport(String),
}
