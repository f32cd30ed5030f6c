//! Data source for the generated images.
//! [GithubSource] is the seam between commands and the network; [client::GraphqlClient] is the
//! only real implementation and talks to the GitHub GraphQL API.

pub mod client;
pub mod entities;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use entities::{ContributionWeek, RepositoryLanguages};

/// Everything the commands need from GitHub. Each command performs exactly one of these calls.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GithubSource: Send + Sync {
    /// Languages of the authenticated user's own, non-fork repositories.
    async fn repository_languages(&self) -> Result<Vec<RepositoryLanguages>>;

    /// Contribution calendar of `login` for the whole of `year`.
    async fn contribution_weeks(&self, login: &str, year: i32) -> Result<Vec<ContributionWeek>>;
}
