use thiserror::Error;

#[derive(Error, Debug)]
pub enum CpprError {
    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("Could not find the \"git\" executable in your path")]
    GitNotFound,

    #[error("GitHub API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not a pull request URL: {0}")]
    InvalidPullUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote '{0}' has no usable push URL")]
    RemoteUrl(String),

    #[error("Pull request operation failed: {0}")]
    PullRequest(String),

    #[error("{0}")]
    Verification(String),
}

impl CpprError {
    /// Process exit code for this error.
    ///
    /// API failures exit 2 and unparseable pull request URLs exit 3, so
    /// calling scripts can tell them apart from general failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            CpprError::Api { .. } | CpprError::Http(_) => 2,
            CpprError::InvalidPullUrl(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CpprError>;
