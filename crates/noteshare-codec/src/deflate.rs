//! Best-effort zlib-framed deflate
//!
//! Compression is optional and invisible to callers: when it is switched off
//! or fails, the input comes back untouched. The wire format has no flag saying
//! whether a payload was compressed, so decompression is always attempted and
//! any failure (the usual case for raw input) also returns the input untouched.
//!
//! Raw JSON payloads start with `{` (0x7b), which can never be a valid zlib
//! header byte, so they always take the fall-through path.

use anyhow::{bail, Context, Result};
use flate2::{write::ZlibEncoder, Compression, Decompress, FlushDecompress, Status};
use noteshare_core::config::CompressionConfig;
use std::io::Write;

/// Inflating stops (and falls back) past this many output bytes.
pub const MAX_INFLATED_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct Deflate {
    enabled: bool,
    level: Compression,
}

impl Default for Deflate {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Deflate {
    /// Levels above 9 are clamped to 9.
    pub fn new(level: u32) -> Self {
        Self {
            enabled: true,
            level: Compression::new(level.min(9)),
        }
    }

    /// A compressor that never compresses. Decompression still works.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            level: Compression::none(),
        }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        if config.enabled {
            Self::new(config.level)
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Deflate `data`, or return it unchanged if that is not possible.
    pub fn compress(&self, data: &[u8]) -> Vec<u8> {
        if !self.enabled {
            return data.to_vec();
        }
        match deflate(data, self.level) {
            Ok(compressed) => compressed,
            Err(e) => {
                tracing::warn!(error = %e, "compression failed, sending payload uncompressed");
                data.to_vec()
            }
        }
    }

    /// Inflate `data`, or return it unchanged if it is not a deflate stream.
    pub fn decompress(&self, data: &[u8]) -> Vec<u8> {
        match inflate(data) {
            Ok(plain) => plain,
            Err(e) => {
                tracing::debug!(error = %e, "payload not inflated, passing through");
                data.to_vec()
            }
        }
    }
}

fn deflate(data: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), level);
    enc.write_all(data).context("deflate write")?;
    enc.finish().context("deflate finish")
}

/// Strict inflate: the stream must be complete and followed by nothing.
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).clamp(64, MAX_INFLATED_SIZE));

    loop {
        if out.len() == out.capacity() {
            if out.len() >= MAX_INFLATED_SIZE {
                bail!("inflated payload exceeds {MAX_INFLATED_SIZE} bytes");
            }
            out.reserve_exact(out.len().min(MAX_INFLATED_SIZE - out.len()));
        }

        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .context("corrupt deflate stream")?;

        match status {
            Status::StreamEnd => {
                if (inflater.total_in() as usize) < data.len() {
                    bail!("trailing bytes after deflate stream");
                }
                return Ok(out);
            }
            Status::Ok | Status::BufError => {
                let progressed =
                    inflater.total_in() as usize != consumed || inflater.total_out() != produced;
                if !progressed && out.len() < out.capacity() {
                    bail!("truncated deflate stream");
                }
            }
        }
    }
}
