//! GitLab host stub — kept for symmetry and as a documented extension
//! point; the real client is an external-collaborator concern here since
//! GitHub is this system's primary, fully-implemented host (§4.10).

use crate::errors::{PrReviewError, Result};
use crate::host::PrRef;
use crate::types::PrContext;

#[derive(Debug, Clone)]
pub struct GitLabClient;

impl GitLabClient {
    pub async fn fetch_pr_context(&self, _pr_ref: &PrRef) -> Result<PrContext> {
        Err(PrReviewError::Unsupported("GitLab provider not implemented".into()))
    }

    pub async fn post_comment(&self, _pr_ref: &PrRef, _markdown: &str) -> Result<()> {
        Err(PrReviewError::Unsupported("GitLab provider not implemented".into()))
    }
}
