//! ObjectId: the 12-byte identifier assigned to documents inserted without `_id`
//!
//! Layout follows the database's format:
//! - 4 bytes: seconds since the Unix epoch (big endian)
//! - 5 bytes: random value, fixed for the process
//! - 3 bytes: counter, seeded randomly and incremented per id

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| rand::thread_rng().gen());

static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x00FF_FFFF)));

/// 12-byte document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a new, process-unique ObjectId
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst) & 0x00FF_FFFF;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        ObjectId(bytes)
    }

    /// Create an ObjectId from raw bytes
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId(bytes)
    }

    /// Get the raw bytes
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parse a 24 character hex string
    ///
    /// # Errors
    /// Returns `InvalidDocument` if the string is not 24 hex digits.
    pub fn parse_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| {
            Error::InvalidDocument(format!(
                "'{}' is not a valid ObjectId, it must be a 24-character hex string: {}",
                s, e
            ))
        })?;
        Ok(ObjectId(bytes))
    }

    /// Creation time encoded in the first four bytes
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(secs), 0)
            .single()
            .unwrap_or_default()
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_roundtrip() {
        let id = ObjectId::parse_str("5f1d7f2e9c1b2a3d4e5f6a7b").unwrap();
        assert_eq!(id.to_hex(), "5f1d7f2e9c1b2a3d4e5f6a7b");
        assert_eq!("5f1d7f2e9c1b2a3d4e5f6a7b".parse::<ObjectId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ObjectId::parse_str("abc").is_err());
        assert!(ObjectId::parse_str("zz1d7f2e9c1b2a3d4e5f6a7b").is_err());
        assert!(ObjectId::parse_str("5f1d7f2e9c1b2a3d4e5f6a7b00").is_err());
    }

    #[test]
    fn test_parse_rejects_sign_prefixed_bytes() {
        assert!(ObjectId::parse_str("+f1d7f2e9c1b2a3d4e5f6a7b").is_err());
        assert!(ObjectId::parse_str("5f1d7f2e9c1b2a3d4e5f6a+b").is_err());
    }

    #[test]
    fn test_display_matches_hex() {
        let id = ObjectId::from_bytes([0xab; 12]);
        assert_eq!(id.to_string(), "abababababababababababab");
        assert_eq!(format!("{}", id), id.to_hex());
    }

    #[test]
    fn test_timestamp_prefix() {
        let id = ObjectId::parse_str("000000010000000000000000").unwrap();
        assert_eq!(id.timestamp().timestamp(), 1);
    }
}
