//! GitHub implementation of [`RepoHost`]
//!
//! Default-branch lookups go through the REST API. Snapshots come from
//! codeload when anonymous (no API quota used) and from the API tarball
//! endpoint when a token is configured, so private repositories work.

use crate::config::{GithubConfig, NetworkConfig};
use crate::error::{LensError, LensResult};
use crate::remote::RepoHost;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct RepoMetadata {
    default_branch: String,
}

/// GitHub over HTTPS
pub struct GithubHost {
    client: Client,
    github: GithubConfig,
    network: NetworkConfig,
}

impl GithubHost {
    pub fn new(github: GithubConfig, network: NetworkConfig) -> LensResult<Self> {
        let client = Client::builder()
            .user_agent(github.user_agent.clone())
            .connect_timeout(network.connect_timeout())
            .build()
            .map_err(|e| LensError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            github,
            network,
        })
    }

    fn token(&self) -> Option<&str> {
        self.github.token.as_deref().filter(|t| !t.is_empty())
    }

    fn api_url(&self, segments: &[&str]) -> LensResult<Url> {
        join_segments(&self.github.api_url, segments)
    }

    /// Where the snapshot of `branch` is fetched from
    fn archive_url(&self, owner: &str, repo: &str, branch: &str) -> LensResult<Url> {
        let branch_segments = branch.split('/');
        if self.token().is_some() {
            let mut segments = vec!["repos", owner, repo, "tarball"];
            segments.extend(branch_segments);
            self.api_url(&segments)
        } else {
            let mut segments = vec![owner, repo, "tar.gz", "refs", "heads"];
            segments.extend(branch_segments);
            join_segments(&self.github.archive_url, &segments)
        }
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url).header("X-GitHub-Api-Version", API_VERSION);
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn stream_to_file(&self, response: Response, dest: &Path) -> LensResult<u64> {
        let io_err = |e| LensError::io(format!("writing {}", dest.display()), e);
        let stall = self.network.stall_timeout();

        let mut file = tokio::fs::File::create(dest).await.map_err(io_err)?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        loop {
            let next = tokio::time::timeout(stall, stream.next())
                .await
                .map_err(|_| {
                    LensError::UpstreamUnavailable(format!(
                        "download stalled for {}s",
                        stall.as_secs()
                    ))
                })?;
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(transport_error)?;
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(io_err)?;
        Ok(written)
    }
}

#[async_trait]
impl RepoHost for GithubHost {
    async fn default_branch(&self, owner: &str, repo: &str) -> LensResult<String> {
        let url = self.api_url(&["repos", owner, repo])?;
        debug!("GET {}", url);

        let response = self
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .timeout(self.network.request_timeout())
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, &format!("{}/{}", owner, repo))?;

        let metadata: RepoMetadata = response.json().await.map_err(transport_error)?;
        Ok(metadata.default_branch)
    }

    async fn download_archive(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        dest: &Path,
    ) -> LensResult<u64> {
        let url = self.archive_url(owner, repo, branch)?;
        let limit = self.network.download_timeout();
        debug!("Downloading {}", url);

        let download = async {
            let response = self.get(url).send().await.map_err(transport_error)?;
            let response = check_status(response, &format!("{}/{}@{}", owner, repo, branch))?;
            self.stream_to_file(response, dest).await
        };

        let written = tokio::time::timeout(limit, download).await.map_err(|_| {
            LensError::UpstreamUnavailable(format!(
                "download did not finish within {}s",
                limit.as_secs()
            ))
        })??;

        debug!("Downloaded {} bytes for {}/{}@{}", written, owner, repo, branch);
        Ok(written)
    }

    fn host_name(&self) -> &'static str {
        "GitHub"
    }
}

fn join_segments(base: &str, segments: &[&str]) -> LensResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| LensError::Internal(format!("invalid base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| LensError::Internal(format!("base URL {} cannot take a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn check_status(response: Response, subject: &str) -> LensResult<Response> {
    match status_error(response.status(), response.headers(), subject) {
        Some(err) => Err(err),
        None => Ok(response),
    }
}

/// Map a non-success response to an error; `None` for success
fn status_error(status: StatusCode, headers: &HeaderMap, subject: &str) -> Option<LensError> {
    if status.is_success() {
        return None;
    }

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let exhausted = header("x-ratelimit-remaining") == Some("0");

    let err = match status {
        StatusCode::NOT_FOUND => LensError::NotFound(subject.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LensError::RateLimited {
            reset_at: header("x-ratelimit-reset").and_then(|v| v.parse().ok()),
        },
        StatusCode::FORBIDDEN if exhausted => LensError::RateLimited {
            reset_at: header("x-ratelimit-reset").and_then(|v| v.parse().ok()),
        },
        status => LensError::UpstreamUnavailable(format!("{} returned HTTP {}", subject, status)),
    };
    Some(err)
}

fn transport_error(err: reqwest::Error) -> LensError {
    if err.is_timeout() {
        LensError::UpstreamUnavailable("request timed out".to_string())
    } else {
        LensError::UpstreamUnavailable(err.to_string())
    }
}
