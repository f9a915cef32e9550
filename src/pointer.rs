//! LFS pointer file parsing.
//!
//! LFS pointer files are small text files that replace large files in the Git repository.
//! Only the `oid` and `size` keys are read; the `version` line and any other
//! content is ignored.

use std::fs;
use std::path::Path;

use crate::oid::is_lower_hex;
use crate::{Error, Oid, Result};

const OID_KEY: &str = "oid sha256:";
const SIZE_KEY: &str = "size ";
const OID_HEX_LEN: usize = 64;

/// An LFS pointer representing a file stored in LFS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    /// The SHA256 hash of the file content.
    oid: Oid,
    /// The size of the file in bytes.
    size: u64,
}

impl Pointer {
    /// Create a new pointer with the given OID and size.
    pub fn new(oid: Oid, size: u64) -> Self {
        Pointer { oid, size }
    }

    /// Parse a pointer from its text representation.
    ///
    /// The first `oid sha256:<64 lowercase hex>` occurrence anywhere in the
    /// text supplies the OID. The first `size <digits>` occurrence supplies
    /// the size, which defaults to 0 when absent.
    pub fn parse(text: &str) -> Result<Self> {
        let oid = find_oid(text)
            .ok_or_else(|| Error::InvalidPointer("Not an LFS pointer (missing oid)".into()))?;
        let oid = Oid::from_hex(oid)?;

        let size = match find_size(text) {
            Some(digits) => digits
                .parse()
                .map_err(|_| Error::InvalidPointer(format!("invalid size: {}", digits)))?,
            None => 0,
        };

        Ok(Pointer { oid, size })
    }

    /// Read and parse a pointer file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ReadPointer {
            path: path.to_path_buf(),
            source,
        })?;
        Pointer::parse(&text)
    }

    /// Get the OID of this pointer.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Get the size of the file.
    pub fn size(&self) -> u64 {
        self.size
    }
}

fn find_oid(text: &str) -> Option<&str> {
    text.match_indices(OID_KEY).find_map(|(pos, _)| {
        let start = pos + OID_KEY.len();
        let candidate = text.get(start..start + OID_HEX_LEN)?;
        is_lower_hex(candidate).then_some(candidate)
    })
}

fn find_size(text: &str) -> Option<&str> {
    text.match_indices(SIZE_KEY).find_map(|(pos, _)| {
        let rest = &text[pos + SIZE_KEY.len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}
