//! The end-to-end fetch: pointer, batch negotiation, streamed retrieval.

use std::path::PathBuf;

use log::{info, warn};

use crate::client::{HttpClient, LfsClient};
use crate::config::FetchConfig;
use crate::{Oid, Pointer, Result};

/// What a successful fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// OID named by the pointer file.
    pub oid: Oid,
    /// Size declared by the pointer file.
    pub size: u64,
    /// Bytes actually written to `out_path`.
    pub bytes_written: u64,
    pub out_path: PathBuf,
}

/// Run one fetch described by `config` through `client`.
///
/// Steps run strictly in order and the first failure is returned. A failure
/// while streaming leaves whatever was written at the output path.
pub fn fetch<C: HttpClient>(config: &FetchConfig, client: &LfsClient<C>) -> Result<FetchOutcome> {
    let pointer = Pointer::from_file(&config.pointer_path)?;

    info!(
        "Requesting LFS object oid={} size={} for {}...",
        pointer.oid(),
        pointer.size(),
        config.repo
    );
    let batch = client.request_download(&pointer)?;

    let action = match batch.download_action() {
        Ok(action) => action,
        Err(err) => {
            if let Ok(json) = serde_json::to_string_pretty(&batch) {
                warn!("Batch response did not include a download action: {}", json);
            }
            return Err(err);
        }
    };

    info!("Downloading object from: {}", action.href);
    let verify = config.verify.then_some(&pointer);
    let bytes_written = client.download_to(action, &config.out_path, verify)?;
    info!("Saved to {}", config.out_path.display());

    Ok(FetchOutcome {
        oid: pointer.oid().clone(),
        size: pointer.size(),
        bytes_written,
        out_path: config.out_path.clone(),
    })
}
