//! Set and content differences between two collections.

use super::types::{Collection, HashHint, ReconciliationResult};
use crate::artifact::Origin;
use crate::utils::ContentHash;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Identities present in `a` but absent from `b`, ascending.
pub fn diff_identities(a: &Collection, b: &Collection) -> Vec<String> {
    a.identities()
        .filter(|identity| !b.contains(identity))
        .map(str::to_string)
        .collect()
}

/// Classify two collections into local-only, remote-only and out-of-sync.
///
/// An identity present on both sides is out of sync only when both sides
/// carry a content hash and the hashes differ.
pub fn diff_by_content(local: &Collection, remote: &Collection) -> ReconciliationResult {
    let local_only = diff_identities(local, remote);
    let remote_only = diff_identities(remote, local);

    let mut out_of_sync = Vec::new();
    for (identity, local_hash) in local.iter() {
        if !remote.contains(identity) {
            continue;
        }

        match (local_hash, remote.hash_of(identity)) {
            (Some(l), Some(r)) if l != r => {
                debug!(identity, local = %l, remote = %r, "Content differs");
                out_of_sync.push(identity.to_string());
            }
            (Some(_), Some(_)) => {}
            _ => debug!(identity, "No comparable content hash, skipping content check"),
        }
    }

    ReconciliationResult {
        local_only,
        remote_only,
        out_of_sync,
    }
}

/// Attribute digests that are known on one side only.
///
/// Used when the remote exposes bare checksums without the path each one
/// belongs to. A remote digest missing locally can not be named; a local
/// digest missing remotely is reported once for each local identity holding it.
/// A name is never taken from the other side, since equal content under a
/// different name says nothing about which artifact drifted.
pub fn attribute_hashes(local: &Collection, remote_hashes: &BTreeSet<ContentHash>) -> Vec<HashHint> {
    let mut local_by_hash: BTreeMap<&ContentHash, Vec<&str>> = BTreeMap::new();
    for (identity, hash) in local.iter() {
        if let Some(hash) = hash {
            local_by_hash.entry(hash).or_default().push(identity);
        }
    }

    let mut hints: Vec<HashHint> = remote_hashes
        .iter()
        .filter(|hash| !local_by_hash.contains_key(hash))
        .map(|hash| HashHint {
            hash: hash.clone(),
            origin: Origin::Remote,
            name: None,
        })
        .collect();

    // Every local identity holding a missing digest gets its own hint
    for (hash, identities) in &local_by_hash {
        if remote_hashes.contains(*hash) {
            continue;
        }
        hints.extend(identities.iter().map(|identity| HashHint {
            hash: (*hash).clone(),
            origin: Origin::Local,
            name: Some(identity.to_string()),
        }));
    }

    hints.sort_by(|a, b| a.hash.cmp(&b.hash).then_with(|| a.name.cmp(&b.name)));

    for hint in &hints {
        warn!(
            hash = %hint.hash,
            origin = %hint.origin,
            name = hint.name.as_deref().unwrap_or("unresolved"),
            "Checksum present on one side only"
        );
    }

    hints
}
