use super::{required, CommandError};
use crate::local::LocalRepo;
use crate::remote::RemoteSource;
use crate::report::Report;
use clap::ValueEnum;
use tracing::debug;

/// Which side `find` searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FindSide {
    Local,
    Remote,
}

/// List cookbook file paths containing `text`, grouped by cookbook.
///
/// Cookbooks without a match are left out of the report.
pub async fn find_files(
    repo: &LocalRepo,
    remote: &dyn RemoteSource,
    side: FindSide,
    text: Option<&str>,
) -> Result<Report, CommandError> {
    let text = required(text, "some text to search for")?;
    let mut report = Report::new();

    match side {
        FindSide::Local => {
            for cookbook in repo.list_cookbooks().await? {
                let matches = repo
                    .cookbook_files(&cookbook)
                    .await?
                    .into_iter()
                    .filter(|f| f.path.contains(text))
                    .map(|f| format!("* {}", f.path))
                    .collect();
                report.section_if_any(format!("{cookbook}:"), matches);
            }
        }
        FindSide::Remote => {
            for cookbook in remote.list_cookbooks().await? {
                let manifest = remote.cookbook_manifest(&cookbook).await?;
                let mut matches: Vec<String> = manifest
                    .records_with_path()
                    .filter(|(path, _)| path.contains(text))
                    .map(|(path, _)| format!("* {path}"))
                    .collect();
                matches.sort();
                report.section_if_any(format!("{cookbook}:"), matches);
            }
        }
    }

    debug!(?side, text, sections = report.sections().len(), "Search finished");
    Ok(report)
}
