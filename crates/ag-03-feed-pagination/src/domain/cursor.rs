//! # Cursor Codec
//!
//! A cursor is URL-safe base64 (no padding) of
//! `{"v":1,"key":{"created_at":..,"id":..,"score":..},"fp":".."}`.
//!
//! `fp` binds the cursor to the filter set and order it was minted for:
//! the first 16 bytes of SHA-256 over their canonical JSON, hex encoded.

use ag_02_feed_store::{FeedFilters, FeedOrder, SortKey};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::InvalidCursor;

pub const CURSOR_VERSION: u8 = 1;

const FINGERPRINT_BYTES: usize = 16;

/// Identity of a (filters, order) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterFingerprint(String);

impl FilterFingerprint {
    pub fn compute(filters: &FeedFilters, order: FeedOrder) -> Self {
        // Plain data; serialization cannot fail.
        let canonical = serde_json::to_vec(&(filters, order)).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        Self(hex::encode(&digest[..FINGERPRINT_BYTES]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct CursorRef<'a> {
    v: u8,
    key: &'a SortKey,
    fp: &'a FilterFingerprint,
}

#[derive(Deserialize)]
struct CursorDoc {
    v: u8,
    key: SortKey,
    fp: FilterFingerprint,
}

pub fn encode_cursor(key: &SortKey, fingerprint: &FilterFingerprint) -> String {
    let doc = CursorRef {
        v: CURSOR_VERSION,
        key,
        fp: fingerprint,
    };
    // Plain data; serialization cannot fail.
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(&doc).unwrap_or_default())
}

pub fn decode_cursor(cursor: &str) -> Result<(SortKey, FilterFingerprint), InvalidCursor> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.trim())
        .map_err(|e| InvalidCursor::Malformed(format!("not base64: {e}")))?;
    let doc: CursorDoc = serde_json::from_slice(&bytes)
        .map_err(|e| InvalidCursor::Malformed(format!("bad payload: {e}")))?;
    if doc.v != CURSOR_VERSION {
        return Err(InvalidCursor::Malformed(format!("unsupported version {}", doc.v)));
    }
    Ok((doc.key, doc.fp))
}
