//! Outbound responder
//!
//! Replies, acks, and telemetry all leave through here. The transport and
//! the live connection handle sit behind one lock, so "check connected,
//! then notify" is a single atomic step even when telemetry originates on
//! another thread: a sensor loop racing a disconnect sees a clean `false`,
//! never a notify to a dead handle.
//!
//! Sends are fire-and-forget. A failed notify is logged and reported as
//! `false`, never queued or retried; clients carry their own timeout and
//! retry policy.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::protocol::Reply;
use crate::transport::{ConnectionHandle, Transport};

/// Connection handle and transport, guarded as one unit
pub(crate) struct Outbound<T> {
    pub(crate) transport: T,
    pub(crate) handle: Option<ConnectionHandle>,
}

impl<T: Transport> Outbound<T> {
    /// Deliver one payload if a client is connected
    pub(crate) fn notify(&mut self, payload: &[u8]) -> bool {
        if self.handle.is_none() {
            debug!("notify dropped, no client connected");
            return false;
        }
        match self.transport.notify(payload) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "notify failed");
                false
            }
        }
    }
}

/// Cloneable handle for pushing notifies to the connected client.
///
/// Obtained from `CommandChannel::notifier`; clones may live on other
/// threads, e.g. a telemetry loop calling `send_state`.
pub struct Notifier<T> {
    shared: Arc<Mutex<Outbound<T>>>,
    max_chunk_size: usize,
}

impl<T: Transport> Notifier<T> {
    pub(crate) fn new(shared: Arc<Mutex<Outbound<T>>>, max_chunk_size: usize) -> Self {
        Notifier {
            shared,
            max_chunk_size,
        }
    }

    /// Send one notify of at most `max_chunk_size` bytes.
    ///
    /// Returns false when the payload is oversized, no client is connected,
    /// or the transport refuses delivery.
    pub fn send(&self, text: &str) -> bool {
        if text.len() > self.max_chunk_size {
            warn!(
                len = text.len(),
                max = self.max_chunk_size,
                "payload exceeds one notify"
            );
            return false;
        }
        self.shared.lock().notify(text.as_bytes())
    }

    /// Send an arbitrarily long payload as ordered plain fragments of at
    /// most `max_chunk_size` bytes each.
    ///
    /// Outbound fragments carry no envelope, index, or ack; the client
    /// reconstructs by concatenating notifies in arrival order. The lock is
    /// held across the whole run so a disconnect cannot interleave.
    pub fn send_chunked(&self, text: &str) -> bool {
        let mut outbound = self.shared.lock();
        if outbound.handle.is_none() {
            debug!("chunked send dropped, no client connected");
            return false;
        }
        for fragment in text.as_bytes().chunks(self.max_chunk_size) {
            if !outbound.notify(fragment) {
                return false;
            }
        }
        true
    }

    /// Format leg-position telemetry and send it as one notify
    pub fn send_state(&self, fr: f32, fl: f32, br: f32, bl: f32) -> bool {
        self.send(&Reply::Position { fr, fl, br, bl }.to_json())
    }

    /// True while a client is connected
    pub fn is_connected(&self) -> bool {
        self.shared.lock().handle.is_some()
    }
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Notifier {
            shared: Arc::clone(&self.shared),
            max_chunk_size: self.max_chunk_size,
        }
    }
}
