//! One function per subcommand. Each builds its collections, reconciles
//! them and returns a [`Report`]; printing is left to the caller.

mod cookbooks;
mod data_bags;
mod find;
mod roles;

pub use cookbooks::{diff_cookbook, diff_cookbooks};
pub use data_bags::{diff_databag, diff_databag_items, diff_databags};
pub use find::{find_files, FindSide};
pub use roles::diff_roles;

use crate::artifact::ArtifactKind;
use crate::collect::{list_local, list_remote};
use crate::local::{LocalError, LocalRepo};
use crate::reconciliation::{diff_identities, ReconcileError};
use crate::remote::{RemoteError, RemoteSource};
use crate::utils::NameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Please specify {0}!")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Local(#[from] LocalError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    InvalidName(#[from] NameError),
}

/// Unwrap a required positional argument
fn required<'a>(value: Option<&'a str>, what: &'static str) -> Result<&'a str, CommandError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CommandError::MissingArgument(what))
}

/// Orphans in both directions for a listing-only kind
async fn orphans(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    kind: &ArtifactKind,
) -> Result<(Vec<String>, Vec<String>), CommandError> {
    let local = list_local(repo, kind).await?;
    let remote = list_remote(remote, kind).await?;
    Ok((diff_identities(&local, &remote), diff_identities(&remote, &local)))
}
