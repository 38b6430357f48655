//! Byte buffers that serialize as lowercase hex.
//!
//! `HexBytes` wraps a `Vec<u8>` (PUSH immediates, log payloads) and `HexArray<N>` a fixed array
//! (selectors, topics). Both deref to slices and print as contiguous hex in `Debug`.

use crate::decoder::normalize_hex_string;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Variable-length byte buffer rendered as lowercase hex.
///
/// ```
/// use bytescope_core::HexBytes;
///
/// let bytes = HexBytes(vec![0xde, 0xad, 0xbe, 0xef]);
/// assert_eq!(format!("{bytes:?}"), "deadbeef");
/// assert_eq!(bytes.to_string(), "0xdeadbeef");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    /// Unwraps the inner vector.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for HexBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<HexBytes> for Vec<u8> {
    fn from(bytes: HexBytes) -> Self {
        bytes.0
    }
}

impl AsRef<[u8]> for HexBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for HexBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Serialize for HexBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HexBytesVisitor;

        impl Visitor<'_> for HexBytesVisitor {
            type Value = HexBytes;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a hex string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let normalized = normalize_hex_string(v).map_err(E::custom)?;
                let bytes = hex::decode(&normalized).map_err(E::custom)?;
                Ok(HexBytes(bytes))
            }
        }

        deserializer.deserialize_str(HexBytesVisitor)
    }
}

impl PartialEq<Vec<u8>> for HexBytes {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.0 == other
    }
}

impl PartialEq<[u8]> for HexBytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.as_slice() == other
    }
}

/// Fixed-size byte array rendered as lowercase hex.
///
/// ```
/// use bytescope_core::HexArray;
///
/// let selector = HexArray::<4>([0xa9, 0x05, 0x9c, 0xbb]);
/// assert_eq!(format!("{selector:?}"), "a9059cbb");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexArray<const N: usize>(pub [u8; N]);

impl<const N: usize> HexArray<N> {
    /// Unwraps the inner array.
    pub const fn into_inner(self) -> [u8; N] {
        self.0
    }

    /// Copies `bytes` right-aligned into a zeroed array, keeping the trailing `N` bytes when
    /// `bytes` is longer. This is how a short stack value widens to a full word.
    pub fn left_padded(bytes: &[u8]) -> Self {
        let mut out = [0u8; N];
        let take = bytes.len().min(N);
        out[N - take..].copy_from_slice(&bytes[bytes.len() - take..]);
        Self(out)
    }
}

impl<const N: usize> Default for HexArray<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<[u8; N]> for HexArray<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> From<HexArray<N>> for [u8; N] {
    fn from(array: HexArray<N>) -> Self {
        array.0
    }
}

impl<const N: usize> AsRef<[u8]> for HexArray<N> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl<const N: usize> Deref for HexArray<N> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl<const N: usize> fmt::Debug for HexArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Display for HexArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> Serialize for HexArray<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de, const N: usize> Deserialize<'de> for HexArray<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HexArrayVisitor<const N: usize>;

        impl<const N: usize> Visitor<'_> for HexArrayVisitor<N> {
            type Value = HexArray<N>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "a hex string with {N} bytes")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let normalized = normalize_hex_string(v).map_err(E::custom)?;
                let bytes = hex::decode(&normalized).map_err(E::custom)?;
                if bytes.len() != N {
                    return Err(E::custom(format!("expected {N} bytes, got {}", bytes.len())));
                }
                let mut array = [0u8; N];
                array.copy_from_slice(&bytes);
                Ok(HexArray(array))
            }
        }

        deserializer.deserialize_str(HexArrayVisitor::<N>)
    }
}

impl<const N: usize> PartialEq<[u8; N]> for HexArray<N> {
    fn eq(&self, other: &[u8; N]) -> bool {
        &self.0 == other
    }
}
