//! Bitbucket host stub — see `gitlab.rs` for the rationale.

use crate::errors::{PrReviewError, Result};
use crate::host::PrRef;
use crate::types::PrContext;

#[derive(Debug, Clone)]
pub struct BitbucketClient;

impl BitbucketClient {
    pub async fn fetch_pr_context(&self, _pr_ref: &PrRef) -> Result<PrContext> {
        Err(PrReviewError::Unsupported("Bitbucket provider not implemented".into()))
    }

    pub async fn post_comment(&self, _pr_ref: &PrRef, _markdown: &str) -> Result<()> {
        Err(PrReviewError::Unsupported("Bitbucket provider not implemented".into()))
    }
}
