//! Checksums over encoded cache payloads.

use crate::types::DigestAlgorithm;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use md5::Md5;
use sha2::{Digest, Sha256};

/// Base64 of the digest of `data`.
pub fn checksum(data: &[u8], algorithm: DigestAlgorithm) -> String {
    match algorithm {
        DigestAlgorithm::Md5 => STANDARD.encode(Md5::digest(data)),
        DigestAlgorithm::Sha256 => STANDARD.encode(Sha256::digest(data)),
    }
}
