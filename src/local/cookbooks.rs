use super::{list_subdirectories, LocalError, LocalRepo};
use crate::artifact::CookbookSegment;
use crate::utils::{to_slash_path, validate_name};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// A file that is part of a local cookbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookbookFile {
    /// Path relative to the cookbook root, `/`-separated
    pub path: String,
    pub segment: CookbookSegment,
    pub full_path: PathBuf,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

impl LocalRepo {
    /// Names of all cookbooks across the cookbook paths, sorted and deduplicated.
    ///
    /// Cookbook paths that do not exist are skipped; it is an error if none exist.
    pub async fn list_cookbooks(&self) -> Result<Vec<String>, LocalError> {
        let mut names = BTreeSet::new();
        let mut found_any = false;

        for path in &self.cookbook_paths {
            if !path.is_dir() {
                debug!(path = %path.display(), "Cookbook path does not exist, skipping");
                continue;
            }
            found_any = true;
            names.extend(list_subdirectories(path).await?);
        }

        if !found_any {
            let shown = self
                .cookbook_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(LocalError::DirectoryNotFound(shown));
        }

        Ok(names.into_iter().collect())
    }

    /// Locate a cookbook; the first cookbook path containing it wins
    pub fn find_cookbook(&self, name: &str) -> Result<PathBuf, LocalError> {
        validate_name("cookbook", name)?;

        self.cookbook_paths
            .iter()
            .map(|p| p.join(name))
            .find(|p| p.is_dir())
            .ok_or_else(|| LocalError::CookbookNotFound(name.to_string()))
    }

    /// The files of a cookbook that would be uploaded to the server, sorted by path
    pub async fn cookbook_files(&self, name: &str) -> Result<Vec<CookbookFile>, LocalError> {
        let root = self.find_cookbook(name)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };

            let Some(segment) = CookbookSegment::classify(relative) else {
                debug!(cookbook = name, path = %relative.display(), "Not part of any cookbook segment");
                continue;
            };

            files.push(CookbookFile {
                path: to_slash_path(relative),
                segment,
                full_path: entry.path().to_path_buf(),
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use std::path::Path;
    use tokio::fs;

    fn repo_with_cookbook_paths(paths: Vec<PathBuf>) -> LocalRepo {
        LocalRepo::new(&DriftConfig {
            cookbook_path: paths,
            ..Default::default()
        })
    }

    async fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_cookbooks_merges_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("cookbooks");
        let b = dir.path().join("site-cookbooks");
        fs::create_dir_all(a.join("nginx")).await.unwrap();
        fs::create_dir_all(a.join("apt")).await.unwrap();
        fs::create_dir_all(b.join("nginx")).await.unwrap();
        fs::create_dir_all(b.join("users")).await.unwrap();

        let repo = repo_with_cookbook_paths(vec![a, b, dir.path().join("missing")]);
        let names = repo.list_cookbooks().await.unwrap();
        assert_eq!(names, vec!["apt", "nginx", "users"]);
    }

    #[tokio::test]
    async fn test_list_cookbooks_no_paths_exist() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_with_cookbook_paths(vec![dir.path().join("missing")]);
        assert!(matches!(
            repo.list_cookbooks().await,
            Err(LocalError::DirectoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cookbook_files_only_includes_segments() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cookbooks/nginx");
        write(&root.join("metadata.rb"), "name 'nginx'").await;
        write(&root.join("recipes/default.rb"), "package 'nginx'").await;
        write(&root.join("templates/default/nginx.conf.erb"), "server {}").await;
        write(&root.join("spec/default_spec.rb"), "describe").await;
        write(&root.join(".kitchen.yml"), "driver: vagrant").await;
        write(&root.join("recipes/.swp"), "junk").await;

        let repo = repo_with_cookbook_paths(vec![dir.path().join("cookbooks")]);
        let files = repo.cookbook_files("nginx").await.unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "metadata.rb",
                "recipes/default.rb",
                "templates/default/nginx.conf.erb"
            ]
        );
        assert_eq!(files[0].segment, CookbookSegment::RootFiles);
        assert_eq!(files[2].segment, CookbookSegment::Templates);
    }

    #[tokio::test]
    async fn test_find_cookbook_first_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir_all(a.join("apt")).await.unwrap();
        fs::create_dir_all(b.join("apt")).await.unwrap();

        let repo = repo_with_cookbook_paths(vec![a.clone(), b]);
        assert_eq!(repo.find_cookbook("apt").unwrap(), a.join("apt"));
        assert!(matches!(
            repo.find_cookbook("nope"),
            Err(LocalError::CookbookNotFound(_))
        ));
        assert!(matches!(
            repo.find_cookbook("../a"),
            Err(LocalError::InvalidName(_))
        ));
    }
}
