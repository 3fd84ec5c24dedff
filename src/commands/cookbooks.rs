use super::{orphans, required, CommandError};
use crate::artifact::{ArtifactKind, Origin};
use crate::collect::{list_local, manifest_checksums, manifest_collection};
use crate::local::LocalRepo;
use crate::reconciliation::{attribute_hashes, diff_by_content, ReconcileError};
use crate::remote::{RemoteError, RemoteSource};
use crate::report::{format_hash_hint, Report};
use crate::utils::validate_name;
use tracing::{info, warn};

/// Compare cookbook names
pub async fn diff_cookbooks(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
) -> Result<Report, CommandError> {
    let (local_only, remote_only) = orphans(repo, remote, &ArtifactKind::Cookbooks).await?;

    let mut report = Report::new();
    report
        .section("Local orphan cookbooks:", local_only)
        .section("Remote orphan cookbooks:", remote_only);
    Ok(report)
}

enum CookbookOutcome {
    Compared(Report),
    MissingOnRemote,
}

/// Compare the files of one cookbook, or of every local cookbook with `all`
pub async fn diff_cookbook(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    name: Option<&str>,
    all: bool,
) -> Result<Report, CommandError> {
    if !all {
        let name = required(name, "a cookbook")?;
        return match compare_cookbook(repo, remote, name).await? {
            CookbookOutcome::Compared(report) => Ok(report),
            CookbookOutcome::MissingOnRemote => Err(ReconcileError::CollectionUnavailable {
                origin: Origin::Remote,
                kind: ArtifactKind::CookbookFiles {
                    cookbook: name.to_string(),
                }
                .to_string(),
                reason: "cookbook not found on server".to_string(),
            }
            .into()),
        };
    }

    let names = list_local(repo, &ArtifactKind::Cookbooks).await?;
    let mut report = Report::new();
    let mut missing = Vec::new();

    for name in names.identities() {
        match compare_cookbook(repo, remote, name).await? {
            CookbookOutcome::Compared(cookbook_report) => {
                report.append(cookbook_report);
            }
            CookbookOutcome::MissingOnRemote => {
                warn!(cookbook = name, "Cookbook not found on server");
                missing.push(name.to_string());
            }
        }
    }

    report.section_if_any("Cookbooks missing on remote:", missing);
    Ok(report)
}

async fn compare_cookbook(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    name: &str,
) -> Result<CookbookOutcome, CommandError> {
    validate_name("cookbook", name)?;

    let kind = ArtifactKind::CookbookFiles {
        cookbook: name.to_string(),
    };
    let local = list_local(repo, &kind).await?;

    let manifest = match remote.cookbook_manifest(name).await {
        Ok(manifest) => manifest,
        Err(RemoteError::NotFound(_)) => return Ok(CookbookOutcome::MissingOnRemote),
        Err(e) => {
            return Err(ReconcileError::CollectionUnavailable {
                origin: Origin::Remote,
                kind: kind.to_string(),
                reason: e.to_string(),
            }
            .into())
        }
    };

    let mut report = Report::new();

    if manifest.is_hash_only() {
        // Without a path for every checksum the files can only be compared by digest
        info!(cookbook = name, version = %manifest.version, "Server manifest lacks file paths, comparing checksums");
        let hints = attribute_hashes(&local, &manifest_checksums(&manifest));
        report.section_if_any(
            format!("{name} unattributed checksums:"),
            hints.iter().map(format_hash_hint).collect(),
        );
        return Ok(CookbookOutcome::Compared(report));
    }

    let remote_files = manifest_collection(&manifest)?;
    let result = diff_by_content(&local, &remote_files);

    report
        .section_if_any(format!("{name} cookbook files out of sync:"), result.out_of_sync)
        .section_if_any(format!("{name} local only files:"), result.local_only)
        .section_if_any(format!("{name} remote only files:"), result.remote_only);
    Ok(CookbookOutcome::Compared(report))
}
