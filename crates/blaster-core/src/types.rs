use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BlasterError;

/// Amount in base units of an asset (or wei for the native currency).
pub type Balance = u128;

/// Unix timestamp (seconds, UTC) of the ledger clock.
pub type Timestamp = u64;

/// Rate in units of 1/10000.
pub type BasisPoints = u16;

// ── Address ──────────────────────────────────────────────────────────────────

/// 20-byte account or contract address.
///
/// Serializes as a `0x`-prefixed lowercase hex string in every format so that
/// JSON params files and bincode snapshots share one representation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address: never a valid beneficiary, sender or recipient.
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(b: [u8; 20]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Deterministic address: BLAKE3(domain ‖ parts…) truncated to 20 bytes.
    pub fn derive(domain: &[u8], parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        for part in parts {
            hasher.update(part);
        }
        let hash = hasher.finalize();
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash.as_bytes()[..20]);
        Self(arr)
    }

    /// Handy for tests and dev tooling: a stable address for a label.
    pub fn from_label(label: &str) -> Self {
        Self::derive(b"blaster/label", &[label.as_bytes()])
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, BlasterError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)
            .map_err(|e| BlasterError::InvalidAddress(format!("{s}: {e}")))?;
        if bytes.len() != 20 {
            return Err(BlasterError::InvalidAddress(format!(
                "{s}: expected 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}…)", &self.to_hex()[..10])
    }
}

impl FromStr for Address {
    type Err = BlasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ── LockKey ──────────────────────────────────────────────────────────────────

/// Identifier of a vault lock. Assigned monotonically starting at 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug)]
#[serde(transparent)]
pub struct LockKey(pub u64);

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LK:{}", self.0)
    }
}

// ── LockType ─────────────────────────────────────────────────────────────────

/// Classification tag carried by a lock record. Informational only: both
/// kinds unlock with the same linear schedule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum LockType {
    /// Founder allocation of the launched asset.
    Allocation,
    /// Pool-share tokens received from the AMM.
    Liquidity,
}

impl LockType {
    /// Wire code used by the `TokensLocked` event (1 = liquidity, 0 = allocation).
    pub fn code(&self) -> u8 {
        match self {
            LockType::Allocation => 0,
            LockType::Liquidity => 1,
        }
    }
}

// ── TransferKind ─────────────────────────────────────────────────────────────

/// How a transfer of a taxed asset was classified.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum TransferKind {
    /// Construction mode: no burn, no tax, no limits.
    Exempt,
    /// From a pool-like counterparty to a regular holder.
    Buy,
    /// From a regular holder to a pool-like counterparty.
    Sell,
    /// Anything else.
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_roundtrip_accepts_missing_prefix() {
        let a = Address::from_label("alice");
        let hex = a.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(Address::from_hex(&hex).unwrap(), a);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), a);
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!(Address::from_hex("0x1234").is_err());
    }

    #[test]
    fn address_serializes_as_hex_string() {
        let a = Address::from_label("bob");
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", a.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn lock_type_codes() {
        assert_eq!(LockType::Liquidity.code(), 1);
        assert_eq!(LockType::Allocation.code(), 0);
    }
}
