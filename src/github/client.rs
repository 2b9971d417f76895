use crate::config::Config;
use crate::errors::{CpprError, Result};
use crate::github::types::{CommitInfo, CreatePull, CreatedPull, PullInfo, PullUrl};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;

const NUM_TRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// The GitHub REST operations the tool needs.
pub trait GitHubApi {
    /// Commit shas of a pull request, oldest first.
    fn commits_for_pull(&self, pull: &PullUrl) -> Result<Vec<String>>;
    /// Name of the branch the pull request was opened from.
    fn pull_head_ref(&self, pull: &PullUrl) -> Result<String>;
    fn verify_pull(&self, pull: &PullUrl) -> Result<bool>;
    fn verify_branch(&self, fork: &str, branch: &str) -> Result<bool>;
    fn verify_fork(&self, fork: &str) -> Result<bool>;
    fn create_pull(&self, fork: &str, request: &CreatePull) -> Result<CreatedPull>;
}

pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url(),
            token: config.token.clone(),
            client: Client::new(),
        }
    }

    /// Client against an explicit API base URL (GitHub Enterprise).
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut url = base_url.into();
        if url.ends_with('/') {
            url.pop();
        }
        Self {
            base_url: url,
            token,
            client: Client::new(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("cppr"));
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// GET with linear retry: up to 3 tries, 1 second apart, then the
    /// last failure is returned.
    fn get_with_retry(&self, endpoint: &str) -> Result<reqwest::blocking::Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut tries = 0;
        loop {
            tries += 1;
            let error = match self.client.get(&url).headers(self.headers()).send() {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => api_error(response),
                Err(e) => CpprError::Http(e),
            };
            if tries == NUM_TRIES {
                return Err(error);
            }
            log::debug!("GET {} failed ({}), retrying", endpoint, error);
            std::thread::sleep(RETRY_DELAY);
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.get_with_retry(endpoint)?.json().map_err(Into::into)
    }

    /// Existence probe: any HTTP status failure after the retries means
    /// "does not exist"; transport errors still propagate.
    fn exists(&self, endpoint: &str) -> Result<bool> {
        match self.get_with_retry(endpoint) {
            Ok(_) => Ok(true),
            Err(CpprError::Api { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn api_error(response: reqwest::blocking::Response) -> CpprError {
    let status = response.status().as_u16();
    let message = response.text().unwrap_or_default();
    CpprError::Api { status, message }
}

impl GitHubApi for GitHubClient {
    fn commits_for_pull(&self, pull: &PullUrl) -> Result<Vec<String>> {
        let endpoint = format!("{}/commits", pull.api_path());
        let commits: Vec<CommitInfo> = self.get_json(&endpoint)?;
        Ok(commits.into_iter().map(|commit| commit.sha).collect())
    }

    fn pull_head_ref(&self, pull: &PullUrl) -> Result<String> {
        let info: PullInfo = self.get_json(&pull.api_path())?;
        Ok(info.head.ref_name)
    }

    fn verify_pull(&self, pull: &PullUrl) -> Result<bool> {
        self.exists(&pull.api_path())
    }

    fn verify_branch(&self, fork: &str, branch: &str) -> Result<bool> {
        self.exists(&format!("/repos/{}/branches/{}", fork, branch))
    }

    fn verify_fork(&self, fork: &str) -> Result<bool> {
        self.exists(&format!("/repos/{}", fork))
    }

    fn create_pull(&self, fork: &str, request: &CreatePull) -> Result<CreatedPull> {
        log::info!(
            "Opening pull request on {}: {} → {}",
            fork,
            request.head,
            request.base
        );
        let url = format!("{}/repos/{}/pulls", self.base_url, fork);
        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(request)
            .send()?;

        if !response.status().is_success() {
            return Err(api_error(response));
        }
        response.json().map_err(Into::into)
    }
}

pub struct MockGitHubApi {
    pub commits: Vec<String>,
    pub head_ref: String,
    pub pulls: Vec<String>,
    pub branches: Vec<(String, String)>,
    pub forks: Vec<String>,
    pub failing_create_bases: Vec<String>,
    pub created: std::sync::Mutex<Vec<(String, CreatePull)>>,
}

impl MockGitHubApi {
    pub fn new() -> Self {
        Self {
            commits: Vec::new(),
            head_ref: "topic".to_string(),
            pulls: Vec::new(),
            branches: Vec::new(),
            forks: Vec::new(),
            failing_create_bases: Vec::new(),
            created: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_fork(mut self, fork: &str) -> Self {
        self.forks.push(fork.to_string());
        self
    }

    pub fn with_branch(mut self, fork: &str, branch: &str) -> Self {
        self.branches.push((fork.to_string(), branch.to_string()));
        self
    }

    pub fn with_pull(mut self, url: &str, head_ref: &str, commits: Vec<&str>) -> Self {
        self.pulls.push(url.to_string());
        self.head_ref = head_ref.to_string();
        self.commits = commits.into_iter().map(String::from).collect();
        self
    }

    pub fn failing_create_on(mut self, base: &str) -> Self {
        self.failing_create_bases.push(base.to_string());
        self
    }

    pub fn get_created_pulls(&self) -> Vec<(String, CreatePull)> {
        self.created.lock().unwrap().clone()
    }
}

impl GitHubApi for MockGitHubApi {
    fn commits_for_pull(&self, _pull: &PullUrl) -> Result<Vec<String>> {
        Ok(self.commits.clone())
    }

    fn pull_head_ref(&self, _pull: &PullUrl) -> Result<String> {
        Ok(self.head_ref.clone())
    }

    fn verify_pull(&self, pull: &PullUrl) -> Result<bool> {
        Ok(self.pulls.contains(&pull.to_string()))
    }

    fn verify_branch(&self, fork: &str, branch: &str) -> Result<bool> {
        Ok(self
            .branches
            .contains(&(fork.to_string(), branch.to_string())))
    }

    fn verify_fork(&self, fork: &str) -> Result<bool> {
        Ok(self.forks.contains(&fork.to_string()))
    }

    fn create_pull(&self, fork: &str, request: &CreatePull) -> Result<CreatedPull> {
        if self.failing_create_bases.contains(&request.base) {
            return Err(CpprError::Api {
                status: 422,
                message: format!("Validation Failed for base {}", request.base),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push((fork.to_string(), request.clone()));
        Ok(CreatedPull {
            number: created.len() as u64,
            html_url: format!("https://github.com/{}/pull/{}", fork, created.len()),
        })
    }
}
