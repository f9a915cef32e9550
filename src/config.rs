//! Invocation configuration.
//!
//! Flags and environment fallbacks are declared once in [`FetchArgs`] and
//! validated into a [`FetchConfig`] before any file or network access.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use url::Url;

use crate::{Error, Result};

/// Server used when neither `--server` nor `GITHUB_SERVER_URL` is set.
pub const DEFAULT_SERVER: &str = "https://github.com";
/// Pointer file read when `--pointer` is not given.
pub const DEFAULT_POINTER_PATH: &str = "models/model.bin";
/// Output file written when `--out` is not given.
pub const DEFAULT_OUT_PATH: &str = "downloaded-model.bin";

/// Raw command line arguments, with environment fallbacks applied by clap.
#[derive(Args, Clone)]
pub struct FetchArgs {
    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPO")]
    pub repo: Option<String>,

    /// Token sent to the LFS batch endpoint
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the LFS pointer file
    #[arg(long, default_value = DEFAULT_POINTER_PATH)]
    pub pointer: PathBuf,

    /// Where to write the downloaded object
    #[arg(long, default_value = DEFAULT_OUT_PATH)]
    pub out: PathBuf,

    /// Base URL of the Git host
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Check the downloaded size and sha256 against the pointer
    #[arg(long)]
    pub verify: bool,
}

impl fmt::Debug for FetchArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchArgs")
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("pointer", &self.pointer)
            .field("out", &self.out)
            .field("server", &self.server)
            .field("verify", &self.verify)
            .finish()
    }
}

/// A repository identifier in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoId {
    type Err = Error;

    /// Only the first two `/`-separated segments are used; both must be
    /// non-empty.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => Ok(RepoId {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(Error::InvalidRepo(s.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validated configuration for one invocation.
#[derive(Clone)]
pub struct FetchConfig {
    pub repo: RepoId,
    pub token: String,
    pub pointer_path: PathBuf,
    pub out_path: PathBuf,
    pub server: Url,
    pub verify: bool,
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .field("pointer_path", &self.pointer_path)
            .field("out_path", &self.out_path)
            .field("server", &self.server.as_str())
            .field("verify", &self.verify)
            .finish()
    }
}

impl FetchConfig {
    /// Validate `args`, looking up variables through `env`.
    ///
    /// clap only consults the environment when a flag is absent, so an empty
    /// `--repo ""` or `--token ""` falls back to `GITHUB_REPO` or
    /// `GITHUB_TOKEN` here.
    pub fn resolve<F>(args: FetchArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>, var: &str| {
            value
                .filter(|v| !v.is_empty())
                .or_else(|| env(var).filter(|v| !v.is_empty()))
        };

        let repo: RepoId = non_empty(args.repo, "GITHUB_REPO")
            .ok_or(Error::MissingRepo)?
            .parse()?;

        let token = non_empty(args.token, "GITHUB_TOKEN").ok_or(Error::MissingToken)?;

        let server = Url::parse(&args.server)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", args.server, e)))?;

        Ok(FetchConfig {
            repo,
            token,
            pointer_path: args.pointer,
            out_path: args.out,
            server,
            verify: args.verify,
        })
    }
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = Error;

    fn try_from(args: FetchArgs) -> Result<Self> {
        FetchConfig::resolve(args, |var| std::env::var(var).ok())
    }
}
