//! Collection builders.
//!
//! Turn a snapshot of the local repo or the server into a [`Collection`]
//! for one [`ArtifactKind`]. Any failure is reported as
//! [`ReconcileError::CollectionUnavailable`] for the side that failed.

use crate::artifact::{ArtifactKind, LocalFileFormat, Origin};
use crate::local::{LocalError, LocalRepo};
use crate::reconciliation::{diff_by_content, Artifact, Collection, ReconcileError, ReconciliationResult};
use crate::remote::{normalize_role, CookbookManifest, RemoteError, RemoteSource};
use crate::utils::{compute_file_hash, compute_json_hash, ContentHash, DigestAlgorithm};
use std::collections::BTreeSet;
use std::fmt::Display;
use tracing::{debug, info, warn};

fn unavailable(origin: Origin, kind: &ArtifactKind, reason: impl Display) -> ReconcileError {
    ReconcileError::CollectionUnavailable {
        origin,
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}

fn local_unavailable(kind: &ArtifactKind) -> impl Fn(LocalError) -> ReconcileError + '_ {
    move |e| unavailable(Origin::Local, kind, e)
}

fn remote_unavailable(kind: &ArtifactKind) -> impl Fn(RemoteError) -> ReconcileError + '_ {
    move |e| unavailable(Origin::Remote, kind, e)
}

/// Build the local collection of `kind`
pub async fn list_local(repo: &LocalRepo, kind: &ArtifactKind) -> Result<Collection, ReconcileError> {
    let err = local_unavailable(kind);

    let artifacts: Vec<Artifact> = match kind {
        ArtifactKind::Cookbooks => repo
            .list_cookbooks()
            .await
            .map_err(&err)?
            .into_iter()
            .map(Artifact::named)
            .collect(),

        ArtifactKind::CookbookFiles { cookbook } => {
            let mut artifacts = Vec::new();
            for file in repo.cookbook_files(cookbook).await.map_err(&err)? {
                let hash = compute_file_hash(DigestAlgorithm::Md5, &file.full_path)
                    .await
                    .map_err(|e| err(LocalError::IoError(e)))?;
                artifacts.push(Artifact::new(file.path, hash));
            }
            artifacts
        }

        ArtifactKind::DataBags => repo
            .list_data_bags()
            .await
            .map_err(&err)?
            .into_iter()
            .map(Artifact::named)
            .collect(),

        ArtifactKind::DataBagItems { bag } => {
            let mut artifacts = Vec::new();
            for item in repo.list_data_bag_items(bag).await.map_err(&err)? {
                match item.format {
                    LocalFileFormat::Json => {
                        let value = repo.read_data_bag_item(bag, &item).await.map_err(&err)?;
                        artifacts.push(Artifact::new(item.stem, compute_json_hash(&value)));
                    }
                    LocalFileFormat::RubyDsl => {
                        warn!(bag = %bag, item = %item.stem, "Ruby data bag item, skipping content comparison");
                        artifacts.push(Artifact::named(item.stem));
                    }
                }
            }
            artifacts
        }

        ArtifactKind::Roles => {
            let mut artifacts = Vec::new();
            for role in repo.list_roles().await.map_err(&err)? {
                match role.format {
                    LocalFileFormat::Json => {
                        let value = normalize_role(repo.read_role(&role).await.map_err(&err)?);
                        artifacts.push(Artifact::new(role.stem, compute_json_hash(&value)));
                    }
                    LocalFileFormat::RubyDsl => {
                        warn!(role = %role.stem, "Ruby role, skipping content comparison");
                        artifacts.push(Artifact::named(role.stem));
                    }
                }
            }
            artifacts
        }
    };

    let collection = Collection::from_artifacts(Origin::Local, kind.clone(), artifacts)?;
    debug!(kind = %kind, count = collection.len(), at = collection.captured_at(), "Built local collection");
    Ok(collection)
}

/// Build the remote collection of `kind`
pub async fn list_remote(
    remote: &dyn RemoteSource,
    kind: &ArtifactKind,
) -> Result<Collection, ReconcileError> {
    let err = remote_unavailable(kind);

    let artifacts: Vec<Artifact> = match kind {
        ArtifactKind::Cookbooks => remote
            .list_cookbooks()
            .await
            .map_err(&err)?
            .into_iter()
            .map(Artifact::named)
            .collect(),

        ArtifactKind::CookbookFiles { cookbook } => {
            let manifest = remote.cookbook_manifest(cookbook).await.map_err(&err)?;
            return manifest_collection(&manifest);
        }

        ArtifactKind::DataBags => remote
            .list_data_bags()
            .await
            .map_err(&err)?
            .into_iter()
            .map(Artifact::named)
            .collect(),

        ArtifactKind::DataBagItems { bag } => {
            let mut artifacts = Vec::new();
            for item in remote.list_data_bag_items(bag).await.map_err(&err)? {
                let value = remote.data_bag_item(bag, &item).await.map_err(&err)?;
                artifacts.push(Artifact::new(item, compute_json_hash(&value)));
            }
            artifacts
        }

        ArtifactKind::Roles => {
            let mut artifacts = Vec::new();
            for name in remote.list_roles().await.map_err(&err)? {
                let value = normalize_role(remote.role(&name).await.map_err(&err)?);
                artifacts.push(Artifact::new(name, compute_json_hash(&value)));
            }
            artifacts
        }
    };

    let collection = Collection::from_artifacts(Origin::Remote, kind.clone(), artifacts)?;
    debug!(kind = %kind, count = collection.len(), at = collection.captured_at(), "Built remote collection");
    Ok(collection)
}

/// Remote collection of the files in a server cookbook manifest, keyed by path
pub fn manifest_collection(manifest: &CookbookManifest) -> Result<Collection, ReconcileError> {
    let kind = ArtifactKind::CookbookFiles {
        cookbook: manifest.name.clone(),
    };
    let artifacts =
        manifest_artifacts(manifest).map_err(|reason| unavailable(Origin::Remote, &kind, reason))?;
    let collection = Collection::from_artifacts(Origin::Remote, kind, artifacts)?;
    debug!(cookbook = %manifest.name, version = %manifest.version, count = collection.len(), "Built remote collection");
    Ok(collection)
}

/// File artifacts of a server manifest, keyed by path.
///
/// Records without a path are left out; use [`manifest_checksums`] for those.
fn manifest_artifacts(manifest: &CookbookManifest) -> Result<Vec<Artifact>, String> {
    manifest
        .records_with_path()
        .map(|(path, record)| {
            ContentHash::from_hex(DigestAlgorithm::Md5, &record.checksum)
                .map(|hash| Artifact::new(path, hash))
                .ok_or_else(|| format!("invalid checksum {:?} for {path}", record.checksum))
        })
        .collect()
}

/// Every checksum in a server manifest as MD5 digests; malformed ones are skipped
pub fn manifest_checksums(manifest: &CookbookManifest) -> BTreeSet<ContentHash> {
    manifest
        .all_checksums()
        .filter_map(|c| {
            let hash = ContentHash::from_hex(DigestAlgorithm::Md5, c);
            if hash.is_none() {
                warn!(cookbook = %manifest.name, checksum = c, "Skipping malformed checksum");
            }
            hash
        })
        .collect()
}

/// Build both collections of `kind` (local first) and classify them
pub async fn reconcile_kind(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    kind: &ArtifactKind,
) -> Result<ReconciliationResult, ReconcileError> {
    let local = list_local(repo, kind).await?;
    let remote = list_remote(remote, kind).await?;
    let result = diff_by_content(&local, &remote);

    info!(
        kind = %kind,
        local_only = result.local_only.len(),
        remote_only = result.remote_only.len(),
        out_of_sync = result.out_of_sync.len(),
        "Reconciled"
    );
    Ok(result)
}
