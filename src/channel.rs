//! Command channel
//!
//! `CommandChannel` is the root object: it owns the robot handlers, the
//! per-connection session, and the shared outbound state. The transport
//! binding drives it from its delivery context through three entry points,
//! `handle_connect`, `handle_write`, and `handle_disconnect`.
//!
//! Processing is single-threaded and cooperative. Each write runs to
//! completion, including any blocking move delays, before the next one is
//! accepted; that serializes all channel state without locks and doubles as
//! admission control for a device with one actuator path. The only state
//! shared with other threads is the outbound side, reachable through
//! cloneable [`Notifier`] handles.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::error::Result;
use crate::handler::RobotHandlers;
use crate::notifier::{Notifier, Outbound};
use crate::protocol::{classify, ChunkEnvelope, Frame, Reply};
use crate::session::{Push, Session};
use crate::transport::{ConnectionHandle, Transport};

/// Inbound command pipeline plus connection lifecycle over one transport
pub struct CommandChannel<H, T> {
    config: Config,
    handlers: H,
    outbound: Arc<Mutex<Outbound<T>>>,
    notifier: Notifier<T>,
    session: Option<Session>,
}

impl<H: RobotHandlers, T: Transport> CommandChannel<H, T> {
    /// Stand up the channel over a transport and start advertising.
    ///
    /// Fails only when the transport cannot enter discoverable mode; every
    /// later transport hiccup downgrades to a logged dropped notify.
    pub fn open(config: Config, handlers: H, mut transport: T) -> Result<Self> {
        transport.resume_advertising()?;
        info!(device = %config.device_name, "channel open, advertising");

        let outbound = Arc::new(Mutex::new(Outbound {
            transport,
            handle: None,
        }));
        let notifier = Notifier::new(Arc::clone(&outbound), config.max_chunk_size);

        Ok(CommandChannel {
            config,
            handlers,
            outbound,
            notifier,
            session: None,
        })
    }

    /// A client bound the characteristic
    pub fn handle_connect(&mut self, handle: ConnectionHandle) {
        if let Some(old) = self.session.take() {
            warn!(conn = old.handle().0, "replacing live connection");
        }
        info!(conn = handle.0, "client connected");
        self.outbound.lock().handle = Some(handle);
        self.session = Some(Session::new(handle, self.config.reassembly_capacity));
        self.handlers.on_connection_change(true);
    }

    /// The client went away.
    ///
    /// Clears the handle, discards the session together with any partial
    /// reassembly, tells the application, and goes discoverable again.
    pub fn handle_disconnect(&mut self) {
        self.outbound.lock().handle = None;
        let Some(session) = self.session.take() else {
            warn!("disconnect with no live connection");
            return;
        };
        if session.in_progress() {
            warn!(
                conn = session.handle().0,
                buffered = session.buffered(),
                "dropping partial message on disconnect"
            );
        }
        info!(
            conn = session.handle().0,
            commands = session.commands(),
            "client disconnected"
        );
        self.handlers.on_connection_change(false);
        if let Err(err) = self.outbound.lock().transport.resume_advertising() {
            warn!(%err, "could not resume advertising");
        }
    }

    /// One raw write from the connected client
    pub fn handle_write(&mut self, data: &[u8]) {
        trace!(len = data.len(), "write");
        if self.session.is_none() {
            warn!("dropping write with no live connection");
            return;
        }

        match classify(data) {
            Ok(Frame::Chunk(chunk)) => self.handle_chunk(&chunk),
            Ok(Frame::Message(value)) => {
                let reply = self
                    .session
                    .as_mut()
                    .and_then(|session| session.execute_value(&mut self.handlers, &value));
                if let Some(reply) = reply {
                    self.notify_reply(reply);
                }
            }
            Err(err) => warn!(%err, "dropping write"),
        }
    }

    /// Feed a chunk through reassembly. The ack goes out the moment the
    /// chunk is accepted; a completing message dispatches after its ack,
    /// so the wire order is ack first, command reply second.
    fn handle_chunk(&mut self, chunk: &ChunkEnvelope) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.push(chunk) {
            Ok(Push::Accepted { index }) => {
                self.notify_reply(Reply::Ack(index));
            }
            Ok(Push::Complete { index, message }) => {
                self.notify_reply(Reply::Ack(index));
                let reply = self
                    .session
                    .as_mut()
                    .and_then(|session| session.execute(&mut self.handlers, &message));
                if let Some(reply) = reply {
                    self.notify_reply(reply);
                }
            }
            Err(err) => {
                warn!(%err, "reassembly failed");
                if let Some(reply) = Reply::for_error(&err) {
                    self.notify_reply(reply);
                }
            }
        }
    }

    fn notify_reply(&self, reply: Reply) {
        let payload = reply.to_json();
        debug!(payload = %payload, "notify");
        self.notifier.send(&payload);
    }

    /// Cloneable outbound handle for other threads
    pub fn notifier(&self) -> Notifier<T> {
        self.notifier.clone()
    }

    /// Send one notify; see [`Notifier::send`]
    pub fn send(&self, text: &str) -> bool {
        self.notifier.send(text)
    }

    /// Send a long payload as plain ordered fragments; see
    /// [`Notifier::send_chunked`]
    pub fn send_chunked(&self, text: &str) -> bool {
        self.notifier.send_chunked(text)
    }

    /// Send leg-position telemetry; see [`Notifier::send_state`]
    pub fn send_state(&self, fr: f32, fl: f32, br: f32, bl: f32) -> bool {
        self.notifier.send_state(fr, fl, br, bl)
    }

    /// True while a client is connected
    pub fn is_connected(&self) -> bool {
        self.notifier.is_connected()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The registered handlers, e.g. to inspect a mock robot in tests
    pub fn handlers(&self) -> &H {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut H {
        &mut self.handlers
    }
}
