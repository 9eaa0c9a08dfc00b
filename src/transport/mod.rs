//! Transport seam
//!
//! The channel is radio-agnostic: the BLE (or any other) stack implements
//! `Transport` and drives the channel's `handle_*` entry points from its
//! delivery context. The constants here are what a binding advertises so a
//! generic client (web browser, phone) can discover the robot and bind the
//! command characteristic without application-level pairing.

mod loopback;

pub use loopback::{LoopbackMonitor, LoopbackTransport};

use crate::error::Result;

/// Service UUID the radio binding advertises
pub const SERVICE_UUID: &str = "0d9be2a0-4757-43d9-83df-704ae274b8df";

/// Command characteristic UUID (write + notify + read)
pub const CHARACTERISTIC_UUID: &str = "8116d8c0-d45d-4fdf-998e-33ab8c471d59";

/// `SERVICE_UUID` in the little-endian byte order radio stacks register
pub const SERVICE_UUID_BYTES: [u8; 16] = [
    0xdf, 0xb8, 0x74, 0xe2, 0x4a, 0x70, 0xdf, 0x83, //
    0xd9, 0x43, 0x57, 0x47, 0xa0, 0xe2, 0x9b, 0x0d,
];

/// `CHARACTERISTIC_UUID` in little-endian byte order
pub const CHARACTERISTIC_UUID_BYTES: [u8; 16] = [
    0x59, 0x1d, 0x47, 0x8c, 0xab, 0x33, 0x8e, 0x99, //
    0xdf, 0x4f, 0x5d, 0xd4, 0xc0, 0xd8, 0x16, 0x81,
];

/// Opaque identifier of one live connection, assigned by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionHandle(pub u16);

/// What the channel needs from the radio stack
pub trait Transport {
    /// Push one payload to the connected client.
    ///
    /// Failure means the radio could not deliver right now; the channel
    /// treats that as a dropped notify, never as a retry trigger.
    fn notify(&mut self, payload: &[u8]) -> Result<()>;

    /// Re-enter discoverable mode so the next client can bind
    fn resume_advertising(&mut self) -> Result<()>;
}
