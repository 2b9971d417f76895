use crate::{
    config::Config,
    errors::Result,
    github::{GitHubApi, GitHubClient, PullUrl},
};
use clap::Args;

/// Print the commit shas of a pull request, space separated.
///
/// Meant to be consumed by other scripts, so the output is minimal.
#[derive(Debug, Args)]
pub struct CommitsForPr {
    /// Pull request URL
    pub url: String,
}

impl CommitsForPr {
    pub fn execute(&self) -> Result<()> {
        let pull = PullUrl::parse(&self.url)?;
        let api = GitHubClient::new(&Config::from_env());
        let commits = api.commits_for_pull(&pull)?;
        println!("{}", commits.join(" "));
        Ok(())
    }
}
