/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

//! The commit identifier type.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const ID_BYTES: usize = 20;

/// A commit identifier: a 20-byte content hash, written as 40 hex digits.
///
/// The canonical text form is lowercase. Parsing accepts both cases but
/// rejects anything that is not exactly 40 hex digits.
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CommitId([u8; ID_BYTES]);

#[derive(Debug, Error)]
#[error("expect {0} bytes but got {1}")]
pub struct LengthMismatchError(usize, usize);

#[derive(Debug, Error)]
#[error("{0:?} is not a {1}-digit hex string")]
pub struct HexError(String, usize);

impl CommitId {
    pub const fn len() -> usize {
        ID_BYTES
    }

    pub const fn hex_len() -> usize {
        ID_BYTES * 2
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, LengthMismatchError> {
        if bytes.len() != Self::len() {
            return Err(LengthMismatchError(Self::len(), bytes.len()));
        }
        let mut fixed_bytes = [0u8; ID_BYTES];
        fixed_bytes.copy_from_slice(bytes);
        Ok(Self(fixed_bytes))
    }

    pub const fn from_byte_array(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn into_byte_array(self) -> [u8; ID_BYTES] {
        self.0
    }

    /// Convert a 40-digit hex string to a binary id.
    pub fn from_hex(hex: &[u8]) -> Result<Self, HexError> {
        if hex.len() != Self::hex_len() {
            return Err(hex_error(hex));
        }
        let mut bytes = [0u8; ID_BYTES];
        for (i, chunk) in hex.chunks_exact(2).enumerate() {
            let high = hexify(chunk[0]).ok_or_else(|| hex_error(hex))?;
            let low = hexify(chunk[1]).ok_or_else(|| hex_error(hex))?;
            bytes[i] = (high << 4) | low;
        }
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        to_hex(self.0.as_ref())
    }
}

#[inline]
fn hexify(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn hex_error(hex: &[u8]) -> HexError {
    HexError(
        String::from_utf8_lossy(hex).into_owned(),
        CommitId::hex_len(),
    )
}

impl fmt::Display for CommitId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CommitId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "CommitId({:?})", self.to_hex())
    }
}

impl AsRef<[u8]> for CommitId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ID_BYTES]> for CommitId {
    fn from(bytes: [u8; ID_BYTES]) -> Self {
        Self::from_byte_array(bytes)
    }
}

impl From<CommitId> for [u8; ID_BYTES] {
    fn from(id: CommitId) -> Self {
        id.into_byte_array()
    }
}

impl FromStr for CommitId {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, HexError> {
        Self::from_hex(s.as_bytes())
    }
}

#[cfg(any(test, feature = "for-tests"))]
impl quickcheck::Arbitrary for CommitId {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        use quickcheck::Arbitrary;

        let mut bytes = [0u8; ID_BYTES];
        for b in bytes.iter_mut() {
            *b = u8::arbitrary(g);
        }
        Self::from_byte_array(bytes)
    }
}

pub fn to_hex(slice: &[u8]) -> String {
    const HEX_CHARS: &[u8] = b"0123456789abcdef";
    let mut v = String::with_capacity(slice.len() * 2);
    for &byte in slice {
        v.push(HEX_CHARS[(byte >> 4) as usize] as char);
        v.push(HEX_CHARS[(byte & 0xf) as usize] as char);
    }
    v
}
