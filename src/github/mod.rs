pub mod client;
pub mod types;


pub use client::{GitHubApi, GitHubClient, MockGitHubApi};
pub use types::{CommitInfo, CreatePull, CreatedPull, PullInfo, PullRef, PullUrl};
