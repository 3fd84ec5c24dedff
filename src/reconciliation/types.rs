use super::ReconcileError;
use crate::artifact::{ArtifactKind, Origin};
use crate::utils::{now_iso, ContentHash};
use std::collections::BTreeMap;

/// A named unit of configuration tracked for drift
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Unique within its collection
    pub identity: String,
    /// `None` when the origin only exposes the name (listings)
    pub content_hash: Option<ContentHash>,
}

impl Artifact {
    pub fn new(identity: impl Into<String>, content_hash: ContentHash) -> Self {
        Self {
            identity: identity.into(),
            content_hash: Some(content_hash),
        }
    }

    /// An artifact whose content is unknown or not comparable
    pub fn named(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            content_hash: None,
        }
    }
}

/// A snapshot of artifacts from one origin, keyed and ordered by identity.
///
/// Collections are immutable once built.
#[derive(Debug, Clone)]
pub struct Collection {
    origin: Origin,
    kind: ArtifactKind,
    captured_at: String,
    artifacts: BTreeMap<String, Option<ContentHash>>,
}

impl Collection {
    /// Build a collection, rejecting duplicate identities
    pub fn from_artifacts(
        origin: Origin,
        kind: ArtifactKind,
        artifacts: impl IntoIterator<Item = Artifact>,
    ) -> Result<Self, ReconcileError> {
        let mut map = BTreeMap::new();
        for artifact in artifacts {
            if map.contains_key(&artifact.identity) {
                return Err(ReconcileError::DuplicateIdentity {
                    origin,
                    identity: artifact.identity,
                });
            }
            map.insert(artifact.identity, artifact.content_hash);
        }

        Ok(Self {
            origin,
            kind,
            captured_at: now_iso(),
            artifacts: map,
        })
    }

    /// A collection with no artifacts
    pub fn empty(origin: Origin, kind: ArtifactKind) -> Self {
        Self {
            origin,
            kind,
            captured_at: now_iso(),
            artifacts: BTreeMap::new(),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    /// When the snapshot was taken (RFC 3339)
    pub fn captured_at(&self) -> &str {
        &self.captured_at
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.artifacts.contains_key(identity)
    }

    /// Content hash of an artifact; `None` if absent or not hashed
    pub fn hash_of(&self, identity: &str) -> Option<&ContentHash> {
        self.artifacts.get(identity).and_then(|h| h.as_ref())
    }

    /// Identities in ascending order
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// (identity, hash) pairs in ascending identity order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ContentHash>)> {
        self.artifacts
            .iter()
            .map(|(identity, hash)| (identity.as_str(), hash.as_ref()))
    }
}

/// The three-way classification of two collections.
///
/// All buckets are disjoint and sorted ascending. Identities that are in
/// sync appear in none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub local_only: Vec<String>,
    pub remote_only: Vec<String>,
    pub out_of_sync: Vec<String>,
}

impl ReconciliationResult {
    /// True when both sides hold the same identities with the same content
    pub fn is_in_sync(&self) -> bool {
        self.local_only.is_empty() && self.remote_only.is_empty() && self.out_of_sync.is_empty()
    }
}

/// A digest known on one side only, with the name it could be attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashHint {
    pub hash: ContentHash,
    /// Side the digest was seen on
    pub origin: Origin,
    /// Identity on the same side, when one is known
    pub name: Option<String>,
}
