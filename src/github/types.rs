use crate::errors::{CpprError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// A parsed pull request URL, e.g. `https://github.com/owner/repo/pull/42`.
#[derive(Debug, Clone, PartialEq)]
pub struct PullUrl {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || CpprError::InvalidPullUrl(input.to_string());

        let url = Url::parse(input).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?.to_string();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, repo, kind, number, ..] if *kind == "pull" || *kind == "pulls" => {
                let number = number.parse().map_err(|_| invalid())?;
                Ok(PullUrl {
                    host,
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    number,
                })
            }
            _ => Err(invalid()),
        }
    }

    /// REST path of the pull request itself.
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}/pulls/{}", self.owner, self.repo, self.number)
    }

    /// Clone/fetch URL of the repository the pull request lives in.
    pub fn repo_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.repo)
    }
}

impl std::fmt::Display for PullUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "https://{}/{}/{}/pull/{}",
            self.host, self.owner, self.repo, self.number
        )
    }
}

/// One entry of the `pulls/{id}/commits` listing. Only the sha is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
}

/// The subset of a pull request object the tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PullInfo {
    pub head: PullRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// Request body for `POST /repos/{fork}/pulls`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePull {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPull {
    pub number: u64,
    pub html_url: String,
}
