use super::{orphans, required, CommandError};
use crate::artifact::ArtifactKind;
use crate::collect::reconcile_kind;
use crate::local::LocalRepo;
use crate::remote::RemoteSource;
use crate::report::Report;
use crate::utils::validate_name;

/// Compare data bag names
pub async fn diff_databags(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
) -> Result<Report, CommandError> {
    let (local_only, remote_only) = orphans(repo, remote, &ArtifactKind::DataBags).await?;

    let mut report = Report::new();
    report
        .section("Local orphan databags:", local_only)
        .section("Remote orphan databags:", remote_only);
    Ok(report)
}

/// Compare the item ids of one data bag
pub async fn diff_databag_items(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    bag: Option<&str>,
) -> Result<Report, CommandError> {
    let bag = required(bag, "a data bag")?;
    validate_name("data bag", bag)?;

    let kind = ArtifactKind::DataBagItems {
        bag: bag.to_string(),
    };
    let (local_only, remote_only) = orphans(repo, remote, &kind).await?;

    let mut report = Report::new();
    report
        .section(format!("{bag} local orphan databag items:"), local_only)
        .section(format!("{bag} remote orphan databag items:"), remote_only);
    Ok(report)
}

/// Compare the item ids and contents of one data bag
pub async fn diff_databag(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    bag: Option<&str>,
) -> Result<Report, CommandError> {
    let bag = required(bag, "a data bag")?;
    validate_name("data bag", bag)?;

    let kind = ArtifactKind::DataBagItems {
        bag: bag.to_string(),
    };
    let result = reconcile_kind(repo, remote, &kind).await?;

    let mut report = Report::new();
    report
        .section(format!("{bag} local orphan databag items:"), result.local_only)
        .section(format!("{bag} remote orphan databag items:"), result.remote_only)
        .section(format!("{bag} databag items out of sync:"), result.out_of_sync);
    Ok(report)
}
