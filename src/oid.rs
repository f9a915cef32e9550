//! LFS Object ID (OID) - SHA256 content hash.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};

use crate::{Error, Result};

/// LFS Object ID - a SHA256 hash of the file content.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    bytes: [u8; 32],
}

impl Oid {
    /// Parse an OID from a 64 character lowercase hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != 64 {
            return Err(Error::InvalidOid(format!(
                "expected 64 hex chars, got {}",
                hex.len()
            )));
        }
        if !is_lower_hex(hex) {
            return Err(Error::InvalidOid(format!("not lowercase hex: {}", hex)));
        }

        let bytes = hex::decode(hex).map_err(|e| Error::InvalidOid(e.to_string()))?;

        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Oid { bytes: arr })
    }

    /// Compute the OID (SHA256 hash) of content.
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Oid::from_digest(hasher)
    }

    fn from_digest(hasher: Sha256) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Oid { bytes }
    }

    /// Get the OID as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

pub(crate) fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.to_hex())
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Oid::from_hex(s)
    }
}

/// A writer that hashes and counts everything passed through it.
///
/// Used to check a download against its pointer without buffering the
/// whole object in memory.
pub struct OidWriter<W> {
    inner: W,
    hasher: Sha256,
    written: u64,
}

impl<W: Write> OidWriter<W> {
    pub fn new(inner: W) -> Self {
        OidWriter {
            inner,
            hasher: Sha256::new(),
            written: 0,
        }
    }

    /// Flush the inner writer and return the OID and byte count seen.
    pub fn finish(mut self) -> io::Result<(Oid, u64)> {
        self.inner.flush()?;
        Ok((Oid::from_digest(self.hasher), self.written))
    }
}

impl<W: Write> Write for OidWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
