use crate::{
    config::Config,
    errors::{CpprError, Result},
    github::{GitHubApi, GitHubClient, PullUrl},
};
use clap::Args;

fn api() -> GitHubClient {
    GitHubClient::new(&Config::from_env())
}

/// Exit 0 if the URL references an existing pull request.
#[derive(Debug, Args)]
pub struct VerifyPull {
    /// Pull request URL
    pub url: String,
}

impl VerifyPull {
    pub fn execute(&self) -> Result<()> {
        let pull = PullUrl::parse(&self.url)?;
        if api().verify_pull(&pull)? {
            Ok(())
        } else {
            Err(CpprError::Verification(format!(
                "{} is not a valid pull request",
                pull
            )))
        }
    }
}

/// Exit 0 if the branch exists on the given fork.
#[derive(Debug, Args)]
pub struct VerifyBranch {
    /// Branch name
    pub branch: String,

    /// Fork to look the branch up on, as owner/repo
    #[arg(long)]
    pub fork: String,
}

impl VerifyBranch {
    pub fn execute(&self) -> Result<()> {
        if api().verify_branch(&self.fork, &self.branch)? {
            Ok(())
        } else {
            Err(CpprError::Verification(format!(
                "branch {} does not exist on {}",
                self.branch, self.fork
            )))
        }
    }
}

/// Exit 0 if the fork (repository) exists.
#[derive(Debug, Args)]
pub struct VerifyFork {
    /// Fork as owner/repo
    pub fork: String,
}

impl VerifyFork {
    pub fn execute(&self) -> Result<()> {
        if api().verify_fork(&self.fork)? {
            Ok(())
        } else {
            Err(CpprError::Verification(format!(
                "fork {} does not exist",
                self.fork
            )))
        }
    }
}
