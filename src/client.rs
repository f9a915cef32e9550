//! LFS HTTP client for batch negotiation and object retrieval.
//!
//! The network itself sits behind [`HttpClient`] so the transport is chosen
//! once, at build time, by the type parameter of [`LfsClient`]. The default is
//! [`UreqClient`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use url::Url;

use crate::batch::{Action, BatchRequest, BatchResponse, LFS_MEDIA_TYPE};
use crate::config::{FetchConfig, RepoId};
use crate::oid::OidWriter;
use crate::{Error, Pointer, Result};

const USER_AGENT: &str = concat!("lfs-fetch/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects followed when retrieving an object.
const MAX_REDIRECTS: u32 = 5;

/// A response whose status has not been checked yet.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase sent with the status line.
    pub reason: String,
    /// The response body, read lazily.
    pub body: Box<dyn Read + Send>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the body as text for an error message.
    ///
    /// Read failures yield an empty string so they never mask the status
    /// error being reported.
    pub fn text_lossy(mut self) -> String {
        let mut buf = Vec::new();
        match self.body.read_to_end(&mut buf) {
            Ok(_) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => String::new(),
        }
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Minimal blocking HTTP capability used by [`LfsClient`].
///
/// Implementations return non-2xx responses as `Ok`; only transport failures
/// are errors.
pub trait HttpClient {
    /// Send a POST with the given headers and body.
    fn post(&self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> Result<HttpResponse>;

    /// Send a GET with the given headers, following redirects.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl Default for UreqClient {
    fn default() -> Self {
        UreqClient {
            agent: ureq::AgentBuilder::new().redirects(MAX_REDIRECTS).build(),
        }
    }
}

impl UreqClient {
    fn send(request: ureq::Request, body: Option<&[u8]>) -> Result<HttpResponse> {
        let result = match body {
            Some(bytes) => request.send_bytes(bytes),
            None => request.call(),
        };

        // ureq reports non-2xx as errors; hand those back as plain responses
        let response = match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => return Err(transport.into()),
        };

        Ok(HttpResponse {
            status: response.status(),
            reason: response.status_text().to_string(),
            body: Box::new(response.into_reader()),
        })
    }
}

impl HttpClient for UreqClient {
    fn post(&self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> Result<HttpResponse> {
        let request = headers
            .iter()
            .fold(self.agent.post(url), |req, (key, value)| req.set(key, value));
        Self::send(request, Some(body))
    }

    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let request = headers
            .iter()
            .fold(self.agent.get(url), |req, (key, value)| req.set(key, value));
        Self::send(request, None)
    }
}

/// LFS client for one repository.
pub struct LfsClient<C = UreqClient> {
    /// The LFS API endpoint URL, ending in `/info/lfs/`.
    lfs_url: Url,
    /// Token sent as `Authorization: token <token>` on batch requests.
    token: String,
    /// Transport used for every request.
    http: C,
}

impl LfsClient<UreqClient> {
    /// Create a client for `repo` hosted on `server`.
    pub fn new(server: &Url, repo: &RepoId, token: &str) -> Result<Self> {
        Ok(LfsClient {
            lfs_url: derive_lfs_url(server, repo)?,
            token: token.to_string(),
            http: UreqClient::default(),
        })
    }

    /// Create a client from a resolved configuration.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        LfsClient::new(&config.server, &config.repo, &config.token)
    }
}

impl<C: HttpClient> LfsClient<C> {
    /// Replace the transport.
    pub fn with_http<H: HttpClient>(self, http: H) -> LfsClient<H> {
        LfsClient {
            lfs_url: self.lfs_url,
            token: self.token,
            http,
        }
    }

    /// Get the transport.
    pub fn http(&self) -> &C {
        &self.http
    }

    /// Send a batch request to the LFS server.
    pub fn batch(&self, request: &BatchRequest) -> Result<BatchResponse> {
        let url = self.lfs_url.join("objects/batch")?;
        let body = serde_json::to_vec(request)?;
        let auth = format!("token {}", self.token);

        debug!("POST {}", url);
        let response = self.http.post(
            url.as_str(),
            &[
                ("Accept", LFS_MEDIA_TYPE),
                ("Content-Type", LFS_MEDIA_TYPE),
                ("Authorization", auth.as_str()),
                ("User-Agent", USER_AGENT),
            ],
            &body,
        )?;

        if !response.is_success() {
            let (status, reason) = (response.status, response.reason.clone());
            return Err(Error::BatchFailed {
                status,
                reason,
                body: response.text_lossy(),
            });
        }

        let batch_response: BatchResponse = serde_json::from_reader(response.body)?;
        Ok(batch_response)
    }

    /// Request a download action for the object named by `pointer`.
    pub fn request_download(&self, pointer: &Pointer) -> Result<BatchResponse> {
        self.batch(&BatchRequest::download(pointer))
    }

    /// Stream the object behind `action` into `dest`.
    ///
    /// The destination is created (or truncated) only once the server has
    /// answered with a 2xx status. When `verify` is given, the streamed bytes
    /// are checked against its size and OID after the copy completes; the
    /// file is left in place either way.
    ///
    /// Returns the number of bytes written.
    pub fn download_to(
        &self,
        action: &Action,
        dest: &Path,
        verify: Option<&Pointer>,
    ) -> Result<u64> {
        let headers = header_pairs(&action.header);

        debug!("GET {} ({} extra headers)", action.href, headers.len());
        let mut response = self.http.get(&action.href, &headers)?;

        if !response.is_success() {
            let (status, reason) = (response.status, response.reason.clone());
            return Err(Error::DownloadFailed {
                status,
                reason,
                body: response.text_lossy(),
            });
        }

        let file = File::create(dest)?;

        let Some(expected) = verify else {
            let mut writer = BufWriter::new(file);
            let written = io::copy(&mut response.body, &mut writer)?;
            writer.flush()?;
            return Ok(written);
        };

        let mut writer = OidWriter::new(BufWriter::new(file));
        io::copy(&mut response.body, &mut writer)?;
        let (oid, written) = writer.finish()?;

        if written != expected.size() {
            return Err(Error::VerificationFailed {
                expected: format!("{} bytes", expected.size()),
                actual: format!("{} bytes", written),
            });
        }
        if &oid != expected.oid() {
            return Err(Error::VerificationFailed {
                expected: format!("oid {}", expected.oid()),
                actual: format!("oid {}", oid),
            });
        }

        Ok(written)
    }
}

fn header_pairs(header: &HashMap<String, String>) -> Vec<(&str, &str)> {
    header
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

/// Derive the LFS endpoint URL for a repository on a server.
fn derive_lfs_url(server: &Url, repo: &RepoId) -> Result<Url> {
    if server.cannot_be_a_base() {
        return Err(Error::InvalidUrl(server.to_string()));
    }

    let mut url = server.clone();

    // Keep .git if present, add it if not - GitHub requires it in the LFS path
    let name = if repo.name.ends_with(".git") {
        repo.name.clone()
    } else {
        format!("{}.git", repo.name)
    };
    let base = server.path().trim_end_matches('/');
    // Trailing slash needed for correct URL joining
    url.set_path(&format!("{}/{}/{}/info/lfs/", base, repo.owner, name));
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
