//! Codecs for oversized cache payloads.
//!
//! Every codec writes a self-identifying frame, so a blob is decoded by
//! its magic bytes rather than by the codec currently configured for
//! writing. Entries survive a change of `CacheConfig::compression`.

use crate::types::CompressionType;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use sheetbridge_core::{Error, Result};
use std::fmt::Display;
use std::io::{Read, Write};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];
const LZ4_FRAME_MAGIC: [u8; 4] = [0x04, 0x22, 0x4d, 0x18];

const ZSTD_LEVEL: i32 = 3;

impl CompressionType {
    /// Codec that produced `blob`, judged by its frame header.
    pub fn detect(blob: &[u8]) -> Option<Self> {
        if blob.starts_with(&GZIP_MAGIC) {
            Some(CompressionType::Gzip)
        } else if blob.starts_with(&ZSTD_MAGIC) {
            Some(CompressionType::Zstd)
        } else if blob.starts_with(&LZ4_FRAME_MAGIC) {
            Some(CompressionType::Lz4)
        } else {
            None
        }
    }
}

/// Compress `data` into a single frame of `codec`.
pub fn compress(data: &[u8], codec: CompressionType) -> Result<Vec<u8>> {
    let failed = |e: &dyn Display| Error::Compression(format!("{:?} encode failed: {}", codec, e));

    match codec {
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).map_err(|e| failed(&e))?;
            encoder.finish().map_err(|e| failed(&e))
        }
        CompressionType::Zstd => zstd::stream::encode_all(data, ZSTD_LEVEL).map_err(|e| failed(&e)),
        CompressionType::Lz4 => {
            let mut encoder = FrameEncoder::new(Vec::new());
            encoder.write_all(data).map_err(|e| failed(&e))?;
            encoder.finish().map_err(|e| failed(&e))
        }
    }
}

/// Decompress a frame written by any supported codec.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>> {
    let codec = CompressionType::detect(blob)
        .ok_or_else(|| Error::Compression("Unrecognized compressed frame".to_string()))?;

    // Gzip reads only the first member; `compress` never writes more.
    let mut output = Vec::new();
    let read = match codec {
        CompressionType::Gzip => GzDecoder::new(blob).read_to_end(&mut output),
        CompressionType::Zstd => {
            zstd::stream::read::Decoder::new(blob).and_then(|mut d| d.read_to_end(&mut output))
        }
        CompressionType::Lz4 => FrameDecoder::new(blob).read_to_end(&mut output),
    };
    read.map_err(|e| Error::Compression(format!("{:?} decode failed: {}", codec, e)))?;
    Ok(output)
}
