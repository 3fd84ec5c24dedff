use super::CommandError;
use crate::artifact::ArtifactKind;
use crate::collect::reconcile_kind;
use crate::local::LocalRepo;
use crate::remote::RemoteSource;
use crate::report::Report;

/// Compare role names and contents
pub async fn diff_roles(repo: &LocalRepo, remote: &dyn RemoteSource) -> Result<Report, CommandError> {
    let result = reconcile_kind(repo, remote, &ArtifactKind::Roles).await?;

    let mut report = Report::new();
    report
        .section("Local orphan roles:", result.local_only)
        .section("Remote orphan roles:", result.remote_only)
        .section("Roles out of sync:", result.out_of_sync);
    Ok(report)
}
