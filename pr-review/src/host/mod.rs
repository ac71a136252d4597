//! §4.10 git host providers — enum-dispatch over GitHub/GitLab/Bitbucket,
//! following the shape the reference crate used for its GitLab client
//! (typed DTOs via `serde`, `reqwest::Client` with a bearer token header,
//! `error_for_status()?`, mapped errors on non-2xx).

pub mod bitbucket;
pub mod github;
pub mod gitlab;

use crate::errors::{PrReviewError, Result};
use crate::types::PrContext;

/// A parsed `https://github.com/<owner>/<repo>/pull/<n>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRef {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

/// §4.10 "Parse URL" — the only PR URL shape this system accepts.
pub fn parse_pr_url(url: &str) -> Result<PrRef> {
    let rest = url
        .strip_prefix("https://github.com/")
        .ok_or_else(|| PrReviewError::InvalidInput(format!("not a github PR url: {url}")))?;
    let parts: Vec<&str> = rest.split('/').collect();
    let [owner, repo, "pull", number] = parts.as_slice() else {
        return Err(PrReviewError::InvalidInput(format!("not a github PR url: {url}")));
    };
    let pr_number: u64 = number
        .parse()
        .map_err(|_| PrReviewError::InvalidInput(format!("invalid PR number in url: {url}")))?;
    Ok(PrRef { owner: owner.to_string(), repo: repo.to_string(), pr_number })
}

/// Runtime configuration for any host client.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub base_api: String,
    pub token: Option<String>,
}

/// Concrete host client (enum-dispatch, no `Box<dyn>`).
#[derive(Debug, Clone)]
pub enum HostClient {
    GitHub(github::GitHubClient),
    GitLab(gitlab::GitLabClient),
    Bitbucket(bitbucket::BitbucketClient),
}

impl HostClient {
    pub fn github(cfg: HostConfig) -> Result<Self> {
        Ok(Self::GitHub(github::GitHubClient::new(cfg)?))
    }

    pub async fn fetch_pr_context(&self, pr_ref: &PrRef) -> Result<PrContext> {
        match self {
            Self::GitHub(c) => c.fetch_pr_context(pr_ref).await,
            Self::GitLab(c) => c.fetch_pr_context(pr_ref).await,
            Self::Bitbucket(c) => c.fetch_pr_context(pr_ref).await,
        }
    }

    pub async fn post_comment(&self, pr_ref: &PrRef, markdown: &str) -> Result<()> {
        match self {
            Self::GitHub(c) => c.post_comment(pr_ref, markdown).await,
            Self::GitLab(c) => c.post_comment(pr_ref, markdown).await,
            Self::Bitbucket(c) => c.post_comment(pr_ref, markdown).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_pr_url() {
        let r = parse_pr_url("https://github.com/acme/widgets/pull/42").unwrap();
        assert_eq!(r, PrRef { owner: "acme".into(), repo: "widgets".into(), pr_number: 42 });
    }

    #[test]
    fn rejects_non_github_url() {
        assert!(parse_pr_url("https://gitlab.com/acme/widgets/-/merge_requests/3").is_err());
    }

    #[test]
    fn rejects_malformed_path() {
        assert!(parse_pr_url("https://github.com/acme/widgets/issues/3").is_err());
    }
}
