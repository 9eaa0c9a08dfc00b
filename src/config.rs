//! Configuration for puplink
//!
//! Centralized configuration with sensible defaults. The defaults match the
//! MicroPupper controller: 120-byte notifies (safe under the smallest
//! negotiated MTU the web client sees) and a 2 KiB reassembly buffer.

/// Main configuration for one command channel instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------
    /// Device name placed in the advertising payload
    pub device_name: String,

    // -------------------------------------------------------------------------
    // Outbound Sizing
    // -------------------------------------------------------------------------
    /// Max payload bytes per notify; larger replies must go out via
    /// `send_chunked`
    pub max_chunk_size: usize,

    // -------------------------------------------------------------------------
    // Inbound Sizing
    // -------------------------------------------------------------------------
    /// Capacity of the chunk reassembly buffer (one in-flight message)
    pub reassembly_capacity: usize,
}

/// Advertised device name of the stock MicroPupper firmware
pub const DEFAULT_DEVICE_NAME: &str = "MicroPupper";

/// Default outbound fragment bound (bytes)
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 120;

/// Default reassembly buffer capacity (bytes)
pub const DEFAULT_REASSEMBLY_CAPACITY: usize = 2048;

impl Default for Config {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            reassembly_capacity: DEFAULT_REASSEMBLY_CAPACITY,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the advertised device name
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.config.device_name = name.into();
        self
    }

    /// Set the max payload bytes per outbound notify
    pub fn max_chunk_size(mut self, bytes: usize) -> Self {
        self.config.max_chunk_size = bytes;
        self
    }

    /// Set the reassembly buffer capacity (in bytes)
    pub fn reassembly_capacity(mut self, bytes: usize) -> Self {
        self.config.reassembly_capacity = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
