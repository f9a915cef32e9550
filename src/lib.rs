//! # lfs-fetch
//!
//! Fetch a single Git LFS object by resolving a pointer file through the
//! LFS batch API.
//!
//! This crate provides:
//! - LFS pointer file parsing
//! - A batch API client for download negotiation
//! - Streaming retrieval of the object to disk, with opt-in sha256 verification
//! - The static model catalog shipped with the LFS objects
//!
//! ## Example
//!
//! ```no_run
//! use lfs_fetch::{fetch, FetchArgs, FetchConfig, LfsClient};
//!
//! # fn run(args: FetchArgs) -> lfs_fetch::Result<()> {
//! let config = FetchConfig::try_from(args)?;
//! let client = LfsClient::from_config(&config)?;
//! let outcome = fetch(&config, &client)?;
//! println!("wrote {} bytes", outcome.bytes_written);
//! # Ok(())
//! # }
//! ```

mod error;
mod oid;
mod pointer;
mod batch;
mod client;
mod config;
mod fetch;
pub mod catalog;

pub use error::{Error, Result};
pub use oid::{Oid, OidWriter};
pub use pointer::Pointer;
pub use batch::{Action, BatchError, BatchObject, BatchRequest, BatchRequestObject, BatchResponse, Operation};
pub use client::{HttpClient, HttpResponse, LfsClient, UreqClient};
pub use config::{FetchArgs, FetchConfig, RepoId, DEFAULT_OUT_PATH, DEFAULT_POINTER_PATH, DEFAULT_SERVER};
pub use fetch::{fetch, FetchOutcome};
