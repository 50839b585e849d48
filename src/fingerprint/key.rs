//! Canonical key generation.

use sha2::{Digest, Sha256};

use crate::types::AssetType;

/// SHA-256 hex digest over the `\n`-joined (normalized_prompt, duration,
/// asset_type) triple.
///
/// Newline delimiting keeps the encoding unambiguous: no normalized prompt
/// can contain `\n`, so distinct triples can never collide by field
/// concatenation alone.
pub fn canonical_key(normalized_prompt: &str, duration: u32, asset_type: AssetType) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized_prompt.as_bytes());
    hasher.update(b"\n");
    hasher.update(duration.to_string().as_bytes());
    hasher.update(b"\n");
    hasher.update(asset_type.as_str().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
