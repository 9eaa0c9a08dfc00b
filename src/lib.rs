//! # puplink
//!
//! BLE command channel for a quadruped robot, with:
//! - Chunked message reassembly with per-chunk acks
//! - Compact positional and keyed JSON command grammars
//! - Synchronous dispatch with protocol-paced move delays
//! - Fire-and-forget outbound notifies and telemetry
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Transport Binding                         │
//! │              (BLE stack / loopback / console)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ writes, connect/disconnect
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    CommandChannel                            │
//! │              (Frame Decoder + Lifecycle)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Reassembly  │          │   Parser    │
//!   │  (bounded)  │─────────▶│  (Command)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Dispatch   │
//!                           │ (handlers)  │
//!                           └──────┬──────┘
//!                                  │ acks, replies, telemetry
//!                                  ▼
//!                           ┌─────────────┐
//!                           │  Notifier   │
//!                           │  (shared)   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod channel;
pub mod handler;
pub mod notifier;
pub mod protocol;
pub mod session;
pub mod transport;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LinkError, Result};
pub use config::Config;
pub use channel::CommandChannel;
pub use handler::RobotHandlers;
pub use notifier::Notifier;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of puplink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
