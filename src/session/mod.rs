//! Per-connection session state
//!
//! One `Session` exists per bound client and dies with it. It owns the
//! reassembly buffer, so a disconnect mid-message can never leak stale
//! fragments into the next client's first command.

mod dispatch;
mod reassembly;

pub use dispatch::dispatch;
pub use reassembly::{Push, ReassemblyBuffer};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::handler::RobotHandlers;
use crate::protocol::{ChunkEnvelope, Command, Reply};
use crate::transport::ConnectionHandle;

/// State carried for the lifetime of one connection
#[derive(Debug)]
pub struct Session {
    handle: ConnectionHandle,
    reassembly: ReassemblyBuffer,
    commands: u64,
}

impl Session {
    pub fn new(handle: ConnectionHandle, reassembly_capacity: usize) -> Self {
        Session {
            handle,
            reassembly: ReassemblyBuffer::new(reassembly_capacity),
            commands: 0,
        }
    }

    pub fn handle(&self) -> ConnectionHandle {
        self.handle
    }

    /// Commands dispatched over this connection so far
    pub fn commands(&self) -> u64 {
        self.commands
    }

    /// True while a chunked message is partially buffered
    pub fn in_progress(&self) -> bool {
        self.reassembly.in_progress()
    }

    /// Bytes of the in-flight message buffered so far
    pub fn buffered(&self) -> usize {
        self.reassembly.len()
    }

    /// Feed one chunk envelope into reassembly
    pub fn push(&mut self, chunk: &ChunkEnvelope) -> Result<Push> {
        let outcome = self.reassembly.push(chunk)?;
        debug!(
            conn = self.handle.0,
            index = chunk.index,
            total = chunk.total,
            buffered = self.reassembly.len(),
            "chunk accepted"
        );
        Ok(outcome)
    }

    /// Parse and dispatch a reassembled message
    pub fn execute<H: RobotHandlers>(
        &mut self,
        handlers: &mut H,
        payload: &[u8],
    ) -> Option<Reply> {
        match serde_json::from_slice::<Value>(payload) {
            Ok(value) => self.execute_value(handlers, &value),
            Err(err) => {
                warn!(
                    conn = self.handle.0,
                    %err,
                    "reassembled message is not valid JSON"
                );
                None
            }
        }
    }

    /// Dispatch an already-parsed message
    pub fn execute_value<H: RobotHandlers>(
        &mut self,
        handlers: &mut H,
        value: &Value,
    ) -> Option<Reply> {
        let command = Command::from_value(value);
        if command == Command::Unknown {
            warn!(conn = self.handle.0, payload = %value, "unrecognized command");
            return None;
        }
        self.commands += 1;
        dispatch(handlers, command)
    }
}
