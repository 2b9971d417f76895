use crate::errors::{CpprError, Result};
use regex::Regex;
use std::path::PathBuf;
use std::process::Command;

/// The git operations the cherry-pick flow needs.
///
/// Everything shells out to the `git` binary; the trait exists so the
/// orchestration can be tested against a mock.
pub trait GitCli {
    fn is_available(&self) -> bool;
    fn current_branch(&self) -> Result<String>;
    fn toplevel(&self) -> Result<PathBuf>;
    fn push_url(&self, remote: &str) -> Result<String>;
    fn checkout(&self, branch: &str) -> Result<()>;
    fn create_branch(&self, branch: &str, start_point: &str) -> Result<()>;
    fn cherry_pick(&self, commits: &[String]) -> Result<()>;
    fn cherry_pick_abort(&self);
    fn fetch_pull_head(&self, repo_url: &str, number: u64, branch: &str) -> Result<()>;
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

pub struct GitCliImpl {
    workdir: PathBuf,
}

impl GitCliImpl {
    pub fn new() -> Self {
        Self {
            workdir: PathBuf::from("."),
        }
    }

    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn run_command(&self, args: &[&str]) -> Result<std::process::Output> {
        log::debug!("running git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| CpprError::Git(format!("Failed to execute git command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CpprError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(output)
    }

    fn run_for_line(&self, args: &[&str]) -> Result<String> {
        let output = self.run_command(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitCli for GitCliImpl {
    fn is_available(&self) -> bool {
        match Command::new("git").arg("--version").output() {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    fn current_branch(&self) -> Result<String> {
        self.run_for_line(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn toplevel(&self) -> Result<PathBuf> {
        self.run_for_line(&["rev-parse", "--show-toplevel"])
            .map(PathBuf::from)
    }

    fn push_url(&self, remote: &str) -> Result<String> {
        self.run_for_line(&["remote", "get-url", "--push", remote])
            .map_err(|_| CpprError::RemoteUrl(remote.to_string()))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run_command(&["checkout", branch]).map(|_| ())
    }

    fn create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.run_command(&["checkout", "-b", branch, start_point])
            .map(|_| ())
    }

    fn cherry_pick(&self, commits: &[String]) -> Result<()> {
        let mut args = vec!["cherry-pick"];
        args.extend(commits.iter().map(String::as_str));
        self.run_command(&args).map(|_| ())
    }

    fn cherry_pick_abort(&self) {
        // Leaves the index clean after a conflicting pick; failure here
        // just means there was nothing to abort.
        let _ = self.run_command(&["cherry-pick", "--abort"]);
    }

    fn fetch_pull_head(&self, repo_url: &str, number: u64, branch: &str) -> Result<()> {
        let refspec = format!("pull/{}/head:{}", number, branch);
        self.run_command(&["fetch", repo_url, &refspec]).map(|_| ())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run_command(&["push", remote, branch]).map(|_| ())
    }
}

/// Extract the fork owner from a remote push URL.
///
/// Understands `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git`
/// and `https://host/owner/repo` forms, with an optional port after the
/// host.
pub fn fork_owner_from_push_url(url: &str) -> Option<String> {
    let re = Regex::new(
        r"^(?:[a-z][a-z+]*://)?(?:[^@/]+@)?[^:/]+(?::\d+)?[:/](?P<owner>[^:/]+)/(?P<repo>[^/]+?)(?:\.git)?/?$",
    )
    .ok()?;
    re.captures(url.trim())
        .map(|caps| caps["owner"].to_string())
}

#[derive(Default)]
pub struct MockGitCli {
    pub available: bool,
    pub branch: String,
    pub remotes: std::collections::HashMap<String, String>,
    pub failing_cherry_picks: Vec<String>,
    pub commands: std::sync::Mutex<Vec<String>>,
}

impl MockGitCli {
    pub fn new() -> Self {
        Self {
            available: true,
            branch: "main".to_string(),
            ..Default::default()
        }
    }

    pub fn with_remote(mut self, name: &str, push_url: &str) -> Self {
        self.remotes.insert(name.to_string(), push_url.to_string());
        self
    }

    pub fn failing_cherry_pick_on(mut self, branch: &str) -> Self {
        self.failing_cherry_picks.push(branch.to_string());
        self
    }

    pub fn recorded(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn record(&self, command: String) {
        self.commands.lock().unwrap().push(command);
    }
}

impl GitCli for MockGitCli {
    fn is_available(&self) -> bool {
        self.available
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn toplevel(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("."))
    }

    fn push_url(&self, remote: &str) -> Result<String> {
        self.remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| CpprError::RemoteUrl(remote.to_string()))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {}", branch));
        Ok(())
    }

    fn create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.record(format!("checkout -b {} {}", branch, start_point));
        Ok(())
    }

    fn cherry_pick(&self, commits: &[String]) -> Result<()> {
        let last_branch = self
            .recorded()
            .iter()
            .rev()
            .find_map(|c| c.strip_prefix("checkout -b ").map(|rest| {
                rest.split_whitespace().next().unwrap_or("").to_string()
            }))
            .unwrap_or_default();
        self.record(format!("cherry-pick {}", commits.join(" ")));
        if self.failing_cherry_picks.contains(&last_branch) {
            return Err(CpprError::Git("cherry-pick conflict".to_string()));
        }
        Ok(())
    }

    fn cherry_pick_abort(&self) {
        self.record("cherry-pick --abort".to_string());
    }

    fn fetch_pull_head(&self, repo_url: &str, number: u64, branch: &str) -> Result<()> {
        self.record(format!("fetch {} pull/{}/head:{}", repo_url, number, branch));
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {} {}", remote, branch));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fork_owner_from_ssh_url() {
        assert_eq!(
            fork_owner_from_push_url("git@github.com:alice/widget.git"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn fork_owner_from_ssh_scheme_url() {
        assert_eq!(
            fork_owner_from_push_url("ssh://git@github.com/alice/widget.git"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn fork_owner_from_https_url() {
        assert_eq!(
            fork_owner_from_push_url("https://github.com/alice/widget"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn fork_owner_from_https_url_with_git_suffix() {
        assert_eq!(
            fork_owner_from_push_url("https://github.com/alice/widget.git"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn fork_owner_from_ssh_url_with_port() {
        assert_eq!(
            fork_owner_from_push_url("ssh://git@git.example.com:22/alice/widget.git"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn fork_owner_from_https_url_with_port() {
        assert_eq!(
            fork_owner_from_push_url("https://git.example.com:8080/alice/widget"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn fork_owner_from_scp_url_with_numeric_owner() {
        assert_eq!(
            fork_owner_from_push_url("git@github.com:4273/widget.git"),
            Some("4273".to_string())
        );
    }

    #[test]
    fn fork_owner_rejects_garbage() {
        assert_eq!(fork_owner_from_push_url("not a url"), None);
    }

    #[test]
    fn failed_git_command_reports_its_arguments() {
        let probe = GitCliImpl::new();
        if !probe.is_available() {
            return;
        }
        // An empty temp dir is not a repository, so any checkout fails.
        let dir = tempfile::tempdir().unwrap();
        let git = GitCliImpl::in_dir(dir.path());

        let err = git.create_branch("topic", "release-1").unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("checkout -b topic release-1"),
            "{}",
            message
        );
    }
}
