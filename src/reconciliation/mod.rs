mod diff;
mod types;

pub use diff::{attribute_hashes, diff_by_content, diff_identities};
pub use types::{Artifact, Collection, HashHint, ReconciliationResult};

use crate::artifact::Origin;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Could not build {origin} {kind} collection: {reason}")]
    CollectionUnavailable {
        origin: Origin,
        kind: String,
        reason: String,
    },

    #[error("Duplicate identity {identity:?} in {origin} collection")]
    DuplicateIdentity { origin: Origin, identity: String },
}
