//! Blocking git2 clone + ref checkout, run inside `spawn_blocking`.
//!
//! Credential chain: `GIT_HTTP_TOKEN` (+ `GIT_HTTP_USER`, default `oauth2`) for
//! HTTPS, then `SSH_KEY_PATH` (falling back to `./ssh_keys/bot_key` if
//! present) for SSH, then ssh-agent, then libgit2's own default credential
//! helper, then plain username if the server only asked for one.

use crate::errors::{Error, Result};
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};
use std::path::Path;
use tracing::{debug, info, warn};

fn remote_callbacks() -> RemoteCallbacks<'static> {
    let key_path_env = std::env::var("SSH_KEY_PATH").ok();
    let key_path_disk = Path::new("ssh_keys/bot_key").to_path_buf();
    let have_disk_key = key_path_disk.exists();

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url_str, username_from_url, allowed| {
        let user = username_from_url.unwrap_or("git");

        if url_str.starts_with("http") {
            if let Ok(token) = std::env::var("GIT_HTTP_TOKEN") {
                let http_user = std::env::var("GIT_HTTP_USER").unwrap_or_else(|_| "oauth2".into());
                return Cred::userpass_plaintext(&http_user, &token);
            }
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            if let Some(ref key) = key_path_env {
                let key_path = Path::new(key);
                if key_path.exists() {
                    let pass = std::env::var("SSH_KEY_PASSPHRASE").ok();
                    return Cred::ssh_key(user, None, key_path, pass.as_deref());
                }
            }
            if have_disk_key {
                let pass = std::env::var("SSH_KEY_PASSPHRASE").ok();
                return Cred::ssh_key(user, None, &key_path_disk, pass.as_deref());
            }
            if let Ok(cred) = Cred::ssh_key_from_agent(user) {
                return Ok(cred);
            }
        }

        if allowed.contains(CredentialType::DEFAULT) {
            if let Ok(cred) = Cred::default() {
                return Ok(cred);
            }
        }

        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(user);
        }

        Err(git2::Error::from_str("no usable credentials"))
    });
    callbacks
}

/// Clones `source` into `dest` (which must not yet exist) and checks out a
/// detached HEAD at the resolved ref.
///
/// `git_ref` is resolved in this order: an explicit ref (branch, tag, or
/// commit-ish) if given, else the remote's default branch at HEAD.
pub fn clone_and_checkout(source: &str, dest: &Path, git_ref: Option<&str>) -> Result<String> {
    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(remote_callbacks());
    fetch_opts.download_tags(git2::AutotagOption::All);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_opts);

    info!(source, dest = %dest.display(), "cloning repository");
    let repo = builder.clone(source, dest)?;

    let sha = match git_ref {
        Some(r) => checkout_ref(&repo, r)?,
        None => checkout_head(&repo)?,
    };
    debug!(sha, "checked out");
    Ok(sha)
}

fn checkout_ref(repo: &Repository, git_ref: &str) -> Result<String> {
    let obj = repo
        .revparse_single(git_ref)
        .map_err(|_| Error::RefUnresolvable(git_ref.to_string()))?;
    let commit = obj
        .peel_to_commit()
        .map_err(|_| Error::RefUnresolvable(git_ref.to_string()))?;

    repo.set_head_detached(commit.id())?;
    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout))?;
    Ok(commit.id().to_string())
}

fn checkout_head(repo: &Repository) -> Result<String> {
    let head = repo.head()?;
    let commit = head.peel_to_commit()?;
    warn!("no explicit ref given, using default branch HEAD {}", commit.id());
    Ok(commit.id().to_string())
}
