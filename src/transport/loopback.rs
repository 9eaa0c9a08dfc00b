//! In-memory transport for tests, benches, and off-hardware development

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::Transport;
use crate::error::{LinkError, Result};

/// Transport that hands every notify to an in-process receiver
pub struct LoopbackTransport {
    notifies: Sender<Vec<u8>>,
    resumes: Arc<AtomicUsize>,
}

/// Observer half of a loopback pair
pub struct LoopbackMonitor {
    notifies: Receiver<Vec<u8>>,
    resumes: Arc<AtomicUsize>,
}

impl LoopbackTransport {
    /// Create a transport plus the monitor that sees its traffic
    pub fn new() -> (LoopbackTransport, LoopbackMonitor) {
        let (tx, rx) = unbounded();
        let resumes = Arc::new(AtomicUsize::new(0));
        (
            LoopbackTransport {
                notifies: tx,
                resumes: Arc::clone(&resumes),
            },
            LoopbackMonitor {
                notifies: rx,
                resumes,
            },
        )
    }
}

impl Transport for LoopbackTransport {
    fn notify(&mut self, payload: &[u8]) -> Result<()> {
        self.notifies
            .send(payload.to_vec())
            .map_err(|_| LinkError::Transport("loopback receiver dropped".to_string()))
    }

    fn resume_advertising(&mut self) -> Result<()> {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl LoopbackMonitor {
    /// Next queued notify as UTF-8 text, if any
    pub fn try_next(&self) -> Option<String> {
        self.notifies
            .try_recv()
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Everything queued so far, as UTF-8 text
    pub fn drain(&self) -> Vec<String> {
        self.notifies
            .try_iter()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .collect()
    }

    /// How many times the channel re-entered discoverable mode
    pub fn resume_count(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }
}
