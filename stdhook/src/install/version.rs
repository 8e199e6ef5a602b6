//! Version resolution.
//!
//! Precedence: explicit `--version` tag, then `--edge`, then the latest
//! published release, then `edge` as a fallback. Lookups are best-effort; no
//! outcome here stops an install.

use serde::Deserialize;
use std::time::Duration;
use stdhook_common::ErrorCode;
use stdhook_common::types::{EDGE_TAG, UNKNOWN_COMMIT};
use stdhook_common::{InstallerConfig, VersionRecord};
use thiserror::Error;
use tracing::{debug, warn};

/// Release lookup failures.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network lookups disabled (STDHOOK_OFFLINE)")]
    Offline,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// True when nothing answered at all; a second request would only wait
    /// out another timeout.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Offline => true,
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Source of release metadata.
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// Tag of the latest stable release.
    async fn latest_tag(&self) -> Result<String, LookupError>;

    /// Commit id a tag or branch points at.
    async fn commit_for(&self, reference: &str) -> Result<String, LookupError>;
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: Option<String>,
}

/// GitHub REST API release source.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    client: reqwest::Client,
    api: String,
    repo: String,
}

impl GitHubReleases {
    pub fn new(api: &str, repo: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stdhook/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api: api.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn from_config(config: &InstallerConfig) -> Result<Self, LookupError> {
        Self::new(
            &config.release_api.value,
            &config.repo.value,
            config.network_timeout(),
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, LookupError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

impl ReleaseSource for GitHubReleases {
    async fn latest_tag(&self) -> Result<String, LookupError> {
        let url = format!("{}/repos/{}/releases/latest", self.api, self.repo);
        let release: LatestRelease = self.get_json(&url).await?;
        release
            .tag_name
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LookupError::Malformed("missing tag_name".to_string()))
    }

    async fn commit_for(&self, reference: &str) -> Result<String, LookupError> {
        let url = format!("{}/repos/{}/commits/{}", self.api, self.repo, reference);
        let commit: CommitInfo = self.get_json(&url).await?;
        commit
            .sha
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LookupError::Malformed("missing sha".to_string()))
    }
}

/// Release source used when network lookups are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl ReleaseSource for OfflineSource {
    async fn latest_tag(&self) -> Result<String, LookupError> {
        Err(LookupError::Offline)
    }

    async fn commit_for(&self, _reference: &str) -> Result<String, LookupError> {
        Err(LookupError::Offline)
    }
}

/// What the user asked for on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRequest {
    pub override_tag: Option<String>,
    pub edge: bool,
}

/// Which rule produced the resolved tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    Override,
    Edge,
    LatestRelease,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: VersionRecord,
    pub origin: VersionOrigin,
    /// User-facing warnings (unstable channel, fallback).
    pub warnings: Vec<String>,
}

/// Resolve the version to install and look up its commit id.
pub async fn resolve_version<S: ReleaseSource>(
    request: &VersionRequest,
    source: &S,
    repo: &str,
    default_branch: &str,
) -> Resolution {
    let mut warnings = Vec::new();
    let mut unreachable = false;

    // Used verbatim; only an empty or all-whitespace tag is rejected.
    let override_tag = request
        .override_tag
        .as_deref()
        .filter(|t| !t.trim().is_empty());

    let (tag, origin) = if let Some(tag) = override_tag {
        (tag.to_string(), VersionOrigin::Override)
    } else if request.edge {
        warnings.push(format!(
            "Installing the edge channel ({default_branch}); it may be unstable"
        ));
        (EDGE_TAG.to_string(), VersionOrigin::Edge)
    } else {
        match source.latest_tag().await {
            Ok(tag) => (tag, VersionOrigin::LatestRelease),
            Err(e) => {
                let code = lookup_code(&e, false);
                debug!("[{}] release lookup failed: {}", code.code_string(), e);
                unreachable = e.is_unreachable();
                warnings.push(format!(
                    "No stable release found ({e}); installing edge from {default_branch}"
                ));
                (EDGE_TAG.to_string(), VersionOrigin::Fallback)
            }
        }
    };

    let reference = if tag == EDGE_TAG {
        default_branch.to_string()
    } else {
        tag.clone()
    };

    let commit_id = if unreachable {
        UNKNOWN_COMMIT.to_string()
    } else {
        match source.commit_for(&reference).await {
            Ok(sha) => sha,
            Err(e) => {
                debug!(
                    "[{}] commit lookup for {} failed: {}",
                    lookup_code(&e, true).code_string(),
                    reference,
                    e
                );
                UNKNOWN_COMMIT.to_string()
            }
        }
    };

    for warning in &warnings {
        warn!("{}", warning);
    }

    Resolution {
        record: VersionRecord {
            requested_override: override_tag.map(str::to_string),
            use_edge: request.edge,
            resolved_tag: tag,
            commit_id,
            source_url: format!("https://github.com/{repo}/tree/{reference}"),
        },
        origin,
        warnings,
    }
}

fn lookup_code(error: &LookupError, commit: bool) -> ErrorCode {
    match error {
        _ if commit => ErrorCode::CommitLookupFailed,
        LookupError::Malformed(_) => ErrorCode::ReleaseMalformed,
        _ => ErrorCode::ReleaseLookupFailed,
    }
}
