//! LFS Batch API types.
//!
//! The Batch API is used to request download URLs for LFS objects.
//! See: https://github.com/git-lfs/git-lfs/blob/main/docs/api/batch.md

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Pointer, Result};

/// Media type used for batch request and response bodies.
pub const LFS_MEDIA_TYPE: &str = "application/vnd.git-lfs+json";

/// Operation type for batch requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Download objects from the server.
    Download,
}

/// A batch request to the LFS server.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest {
    /// The operation to perform.
    pub operation: Operation,
    /// The transfer adapters the client supports.
    pub transfers: Vec<String>,
    /// The objects to operate on.
    pub objects: Vec<BatchRequestObject>,
}

/// An object in a batch request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRequestObject {
    /// The SHA256 OID of the object.
    pub oid: String,
    /// The size of the object in bytes.
    pub size: u64,
}

/// A batch response from the LFS server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// The transfer adapter to use (usually "basic").
    #[serde(default = "default_transfer")]
    pub transfer: String,
    /// The objects with their actions.
    #[serde(default)]
    pub objects: Vec<BatchObject>,
}

fn default_transfer() -> String {
    "basic".to_string()
}

/// An object in a batch response.
///
/// Servers are not consistent about echoing `oid` and `size`, so both are
/// optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchObject {
    /// The SHA256 OID of the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,
    /// The size of the object in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Whether the object was authenticated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    /// Actions available for this object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<HashMap<String, Action>>,
    /// Error information if the object failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchError>,
}

/// An action (download URL) for an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The URL for the action.
    pub href: String,
    /// HTTP headers to include in the request.
    #[serde(default)]
    pub header: HashMap<String, String>,
    /// Seconds until the action expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Absolute expiration time (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Error information for a batch object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// HTTP status code.
    pub code: u16,
    /// Error message.
    pub message: String,
}

impl BatchRequest {
    /// Create a download request for a single pointer over the basic transfer.
    pub fn download(pointer: &Pointer) -> Self {
        BatchRequest {
            operation: Operation::Download,
            transfers: vec!["basic".to_string()],
            objects: vec![BatchRequestObject {
                oid: pointer.oid().to_hex(),
                size: pointer.size(),
            }],
        }
    }
}

impl BatchObject {
    /// Get the download action if available.
    pub fn download_action(&self) -> Option<&Action> {
        self.actions.as_ref()?.get("download")
    }
}

impl BatchResponse {
    /// Pick the download action for the single requested object.
    ///
    /// An object-level error takes precedence; otherwise a missing object or
    /// missing download action means the object is unavailable.
    pub fn download_action(&self) -> Result<&Action> {
        let obj = self.objects.first().ok_or(Error::NoDownloadAction)?;

        if let Some(err) = &obj.error {
            return Err(Error::ObjectError {
                code: err.code,
                message: err.message.clone(),
            });
        }

        obj.download_action().ok_or(Error::NoDownloadAction)
    }
}
