use crate::{
    config::Config,
    core::{create_pull_requests, CreateOptions, Source},
    errors::{CpprError, Result},
    git::{GitCli, GitCliImpl},
    github::{GitHubClient, PullUrl},
};
use clap::Args;

/// Cherry-pick commits (or a pull request) onto each target branch and
/// open a pull request per target.
#[derive(Debug, Args)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["from_commits", "from_pull_request"]),
))]
pub struct Create {
    /// Topic branch prefix; the branches are named <PREFIX>-<TARGET>
    #[arg(
        short,
        long,
        conflicts_with = "from_pull_request",
        required_unless_present = "from_pull_request"
    )]
    pub prefix: Option<String>,

    /// Target base branch, may be given several times
    #[arg(short, long = "target", required = true)]
    pub targets: Vec<String>,

    /// Fork the pull requests are opened against, as owner/repo
    #[arg(short, long)]
    pub base_fork: String,

    /// Git remote the topic branches are pushed to
    #[arg(short = 'e', long)]
    pub head_remote: String,

    /// Commits to cherry-pick
    #[arg(short = 'c', long = "from-commits", num_args = 1..)]
    pub from_commits: Vec<String>,

    /// URL of an existing pull request to cherry-pick
    #[arg(short = 'f', long = "from-pull-request")]
    pub from_pull_request: Option<String>,
}

impl Create {
    pub fn execute(&self) -> Result<()> {
        let probe = GitCliImpl::new();
        if !probe.is_available() {
            log::error!("Install git first: https://git-scm.com/");
            return Err(CpprError::GitNotFound);
        }
        let toplevel = probe.toplevel()?;
        log::info!(
            "Running from repo top-level directory {}",
            toplevel.display()
        );
        let git = GitCliImpl::in_dir(toplevel);

        let source = self.source()?;
        let api = GitHubClient::new(&Config::from_env());
        let opts = CreateOptions {
            targets: self.targets.clone(),
            base_fork: self.base_fork.clone(),
            head_remote: self.head_remote.clone(),
            source,
        };
        create_pull_requests(&git, &api, &opts)
    }

    fn source(&self) -> Result<Source> {
        if let Some(url) = &self.from_pull_request {
            return Ok(Source::PullRequest(PullUrl::parse(url)?));
        }
        let prefix = self.prefix.clone().ok_or_else(|| {
            CpprError::Verification("--prefix is required with --from-commits".to_string())
        })?;
        if self.from_commits.is_empty() {
            return Err(CpprError::Verification(
                "missing commits, use --from-commits or --from-pull-request".to_string(),
            ));
        }
        Ok(Source::Commits {
            prefix,
            commits: self.from_commits.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: Create,
    }

    #[test]
    fn parsing_requires_a_commit_source() {
        let result = TestCli::try_parse_from([
            "cppr",
            "--prefix",
            "fix",
            "--target",
            "release-1",
            "--base-fork",
            "upstream/widget",
            "--head-remote",
            "origin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parsing_rejects_both_commit_sources() {
        let result = TestCli::try_parse_from([
            "cppr",
            "--prefix",
            "fix",
            "--target",
            "release-1",
            "--base-fork",
            "upstream/widget",
            "--head-remote",
            "origin",
            "--from-commits",
            "abc123",
            "--from-pull-request",
            "https://github.com/upstream/widget/pull/3",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parsing_accepts_a_commit_list() {
        let cli = TestCli::try_parse_from([
            "cppr",
            "--prefix",
            "fix",
            "--target",
            "release-1",
            "--target",
            "release-2",
            "--base-fork",
            "upstream/widget",
            "--head-remote",
            "origin",
            "--from-commits",
            "abc123",
            "def456",
        ])
        .unwrap();
        assert_eq!(cli.args.from_commits, vec!["abc123", "def456"]);
        assert_eq!(cli.args.targets, vec!["release-1", "release-2"]);
    }

    fn base_args() -> Create {
        Create {
            prefix: None,
            targets: vec!["release-1".to_string()],
            base_fork: "upstream/widget".to_string(),
            head_remote: "origin".to_string(),
            from_commits: vec![],
            from_pull_request: None,
        }
    }

    #[test]
    fn source_from_commits() {
        let mut args = base_args();
        args.prefix = Some("fix".to_string());
        args.from_commits = vec!["abc".to_string()];

        match args.source().unwrap() {
            Source::Commits { prefix, commits } => {
                assert_eq!(prefix, "fix");
                assert_eq!(commits, vec!["abc"]);
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn source_from_pull_request_url() {
        let mut args = base_args();
        args.from_pull_request = Some("https://github.com/upstream/widget/pull/3".to_string());

        match args.source().unwrap() {
            Source::PullRequest(pull) => assert_eq!(pull.number, 3),
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn source_requires_commits_or_pull() {
        let mut args = base_args();
        args.prefix = Some("fix".to_string());
        assert!(args.source().is_err());
    }

    #[test]
    fn bad_pull_url_is_an_invalid_url_error() {
        let mut args = base_args();
        args.from_pull_request = Some("https://github.com/upstream/widget".to_string());
        assert!(matches!(
            args.source().unwrap_err(),
            CpprError::InvalidPullUrl(_)
        ));
    }
}
