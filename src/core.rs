use crate::errors::{CpprError, Result};
use crate::git::{fork_owner_from_push_url, GitCli};
use crate::github::{CreatePull, GitHubApi, PullUrl};

/// Where the commits to cherry-pick come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Explicit commit list; the topic branches are named `{prefix}-{target}`.
    Commits {
        prefix: String,
        commits: Vec<String>,
    },
    /// An existing pull request; its head branch name becomes the prefix
    /// and its commit list comes from the API.
    PullRequest(PullUrl),
}

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub targets: Vec<String>,
    pub base_fork: String,
    pub head_remote: String,
    pub source: Source,
}

/// Cherry-pick the source commits onto every target branch, push each
/// topic branch to the head remote and open one pull request per target.
///
/// A failing target does not stop the remaining ones; the original
/// branch is checked out again before returning.
pub fn create_pull_requests<G: GitCli, A: GitHubApi>(
    git: &G,
    api: &A,
    opts: &CreateOptions,
) -> Result<()> {
    if !git.is_available() {
        return Err(CpprError::GitNotFound);
    }

    let push_url = git.push_url(&opts.head_remote)?;
    let head_fork = fork_owner_from_push_url(&push_url)
        .ok_or_else(|| CpprError::RemoteUrl(opts.head_remote.clone()))?;

    if !api.verify_fork(&opts.base_fork)? {
        return Err(CpprError::Verification(format!(
            "base fork {} does not exist",
            opts.base_fork
        )));
    }
    for target in &opts.targets {
        if !api.verify_branch(&opts.base_fork, target)? {
            return Err(CpprError::Verification(format!(
                "branch {} does not exist on {}",
                target, opts.base_fork
            )));
        }
    }

    let current_branch = git.current_branch()?;

    let (prefix, commits) = match &opts.source {
        Source::Commits { prefix, commits } => (prefix.clone(), commits.clone()),
        Source::PullRequest(pull) => {
            if !api.verify_pull(pull)? {
                return Err(CpprError::Verification(format!(
                    "{} is not a valid pull request",
                    pull
                )));
            }
            let commits = api.commits_for_pull(pull)?;
            let prefix = api.pull_head_ref(pull)?;
            log::info!("Checking out pull request {} into branch {}", pull, prefix);
            git.fetch_pull_head(&pull.repo_url(), pull.number, &prefix)?;
            git.push(&opts.head_remote, &prefix)?;
            (prefix, commits)
        }
    };

    if commits.is_empty() {
        return Err(CpprError::Verification(
            "no commits to cherry-pick".to_string(),
        ));
    }

    let mut failed = Vec::new();
    for target in &opts.targets {
        let topic = format!("{}-{}", prefix, target);
        log::info!(
            "Attempting to create pull request against {}:{}",
            opts.base_fork,
            target
        );
        match create_one(git, api, opts, &head_fork, &prefix, &commits, target, &topic) {
            Ok(created) => {
                log::info!("✅ opened #{} against {}", created.number, target);
                println!("{}", created.html_url);
            }
            Err(e) => {
                log::error!("❌ Pull request for target branch {} failed: {}", target, e);
                git.cherry_pick_abort();
                failed.push(target.clone());
            }
        }
    }

    log::info!(
        "Pull requests attempted, switching back to branch {}",
        current_branch
    );
    git.checkout(&current_branch)?;

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CpprError::PullRequest(format!(
            "failed targets: {}",
            failed.join(", ")
        )))
    }
}

#[allow(clippy::too_many_arguments)]
fn create_one<G: GitCli, A: GitHubApi>(
    git: &G,
    api: &A,
    opts: &CreateOptions,
    head_fork: &str,
    prefix: &str,
    commits: &[String],
    target: &str,
    topic: &str,
) -> Result<crate::github::CreatedPull> {
    git.create_branch(topic, target)?;
    git.cherry_pick(commits)?;
    git.push(&opts.head_remote, topic)?;

    let request = CreatePull {
        title: format!("cppr: {} - pull request from {}", prefix, commits.join(" ")),
        body: format!(
            "Cherry-pick of {} onto {}.",
            commits.join(", "),
            target
        ),
        head: format!("{}:{}", head_fork, topic),
        base: target.to_string(),
    };
    api.create_pull(&opts.base_fork, &request)
}
