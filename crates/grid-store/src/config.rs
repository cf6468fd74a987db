//! Configuration for the Zarr grid store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for [`ZarrGridStore`](crate::ZarrGridStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZarrStoreConfig {
    /// Rows per chunk; each chunk spans the full grid width.
    pub chunk_rows: usize,

    /// Compression codec for chunk data.
    pub compression: ZarrCompression,

    /// Compression level (1-9).
    pub compression_level: u8,

    /// Enable byte shuffle filter for better compression.
    pub shuffle: bool,
}

impl Default for ZarrStoreConfig {
    fn default() -> Self {
        Self {
            chunk_rows: 256,
            compression: ZarrCompression::BloscZstd,
            compression_level: 1,
            shuffle: true,
        }
    }
}

impl ZarrStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `GRID_CHUNK_ROWS`, `GRID_COMPRESSION`, `GRID_COMPRESSION_LEVEL`
    /// and `GRID_SHUFFLE`; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_CHUNK_ROWS") {
            if let Ok(rows) = val.parse() {
                config.chunk_rows = rows;
            }
        }

        if let Ok(val) = std::env::var("GRID_COMPRESSION") {
            match val.parse() {
                Ok(compression) => config.compression = compression,
                Err(e) => warn!(error = %e, "ignoring GRID_COMPRESSION"),
            }
        }

        if let Ok(val) = std::env::var("GRID_COMPRESSION_LEVEL") {
            if let Ok(level) = val.parse() {
                config.compression_level = level;
            }
        }

        if let Ok(val) = std::env::var("GRID_SHUFFLE") {
            config.shuffle = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_rows == 0 {
            return Err("chunk_rows must be > 0".to_string());
        }

        if self.compression_level == 0 || self.compression_level > 9 {
            return Err("compression_level must be 1-9".to_string());
        }

        Ok(())
    }
}

/// Compression codec for chunk data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZarrCompression {
    /// No compression.
    None,
    /// Blosc with LZ4.
    BloscLz4,
    /// Blosc with Zstd (recommended).
    #[default]
    BloscZstd,
}

impl ZarrCompression {
    /// Get the codec name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BloscLz4 => "blosc_lz4",
            Self::BloscZstd => "blosc_zstd",
        }
    }
}

impl FromStr for ZarrCompression {
    type Err = String;

    /// Parse a codec name (case-insensitive); `lz4` and `zstd` mean the
    /// Blosc variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "lz4" | "blosc_lz4" => Ok(Self::BloscLz4),
            "zstd" | "blosc_zstd" => Ok(Self::BloscZstd),
            other => Err(format!("unknown compression codec: {}", other)),
        }
    }
}

impl std::fmt::Display for ZarrCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
