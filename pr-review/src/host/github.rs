//! GitHub provider, the fully-implemented host (§4.10 [SUPPLEMENT]).
//!
//! Against the real REST v3 endpoints: `GET /repos/{owner}/{repo}/pulls/{n}`,
//! `.../commits`, `.../files`, following the reference GitLab client's shape
//! almost line for line (typed response DTOs, bearer auth header,
//! `error_for_status()?`, mapped `PrReviewError` on non-2xx).

use crate::errors::{PrReviewError, Result};
use crate::host::{HostConfig, PrRef};
use crate::types::{PrContext, PrFile};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(cfg: HostConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("repokit-pr-review/0.1")
            .build()
            .map_err(|e| PrReviewError::Internal(e.to_string()))?;
        Ok(Self { http, base_api: cfg.base_api, token: cfg.token })
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => req.header("Authorization", format!("Bearer {t}")),
            None => req,
        }
    }

    pub async fn fetch_pr_context(&self, pr_ref: &PrRef) -> Result<PrContext> {
        let base = self.base_api.trim_end_matches('/');
        let PrRef { owner, repo, pr_number } = pr_ref;

        let pull_url = format!("{base}/repos/{owner}/{repo}/pulls/{pr_number}");
        debug!(url = %pull_url, "GET pull request");
        let pull: GhPull = self
            .authed(self.http.get(&pull_url))
            .send()
            .await?
            .error_for_status()
            .map_err(map_status)?
            .json()
            .await?;

        let files_url = format!("{base}/repos/{owner}/{repo}/pulls/{pr_number}/files");
        debug!(url = %files_url, "GET pull request files");
        let gh_files: Vec<GhFile> = self
            .authed(self.http.get(&files_url))
            .send()
            .await?
            .error_for_status()
            .map_err(map_status)?
            .json()
            .await?;

        let files: Vec<PrFile> = gh_files
            .iter()
            .map(|f| PrFile {
                filename: f.filename.clone(),
                additions: f.additions,
                deletions: f.deletions,
                status: f.status.clone(),
                patch: f.patch.clone(),
            })
            .collect();

        let diff = gh_files
            .iter()
            .filter_map(|f| f.patch.as_ref().map(|p| (f, p)))
            .map(|(f, p)| format!("diff --git a/{0} b/{0}\n{p}\n", f.filename))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(PrContext {
            owner: owner.clone(),
            repo: repo.clone(),
            pr_number: *pr_number,
            base_sha: pull.base.sha,
            head_sha: pull.head.sha,
            title: pull.title,
            author: pull.user.login,
            files,
            diff,
        })
    }

    pub async fn post_comment(&self, pr_ref: &PrRef, markdown: &str) -> Result<()> {
        let base = self.base_api.trim_end_matches('/');
        let PrRef { owner, repo, pr_number } = pr_ref;
        let url = format!("{base}/repos/{owner}/{repo}/issues/{pr_number}/comments");

        #[derive(serde::Serialize)]
        struct Body<'a> {
            body: &'a str,
        }

        debug!(url = %url, "POST issue comment");
        self.authed(self.http.post(&url))
            .json(&Body { body: markdown })
            .send()
            .await?
            .error_for_status()
            .map_err(map_status)?;
        Ok(())
    }
}

fn map_status(e: reqwest::Error) -> PrReviewError {
    match e.status() {
        Some(s) if s.as_u16() == 404 => PrReviewError::NotFound("pull request not found".into()),
        Some(s) if s.as_u16() == 401 || s.as_u16() == 403 => {
            PrReviewError::ProviderUnavailable("github authentication rejected".into())
        }
        _ => PrReviewError::ProviderUnavailable(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct GhUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhPull {
    title: String,
    user: GhUser,
    base: GhRef,
    head: GhRef,
}

#[derive(Debug, Deserialize)]
struct GhFile {
    filename: String,
    additions: u32,
    deletions: u32,
    status: String,
    patch: Option<String>,
}
