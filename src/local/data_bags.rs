use super::{list_local_files, list_subdirectories, local_file_name, read_json, LocalError, LocalRepo};
use crate::artifact::LocalFile;
use crate::utils::validate_name;

/// Directory some repos keep next to their bags; never a bag itself
const NOT_A_BAG: &str = "databags";

impl LocalRepo {
    /// Names of the data bags (directories under the data bag path), sorted
    pub async fn list_data_bags(&self) -> Result<Vec<String>, LocalError> {
        let mut bags = list_subdirectories(&self.data_bag_path).await?;
        bags.retain(|bag| bag != NOT_A_BAG);
        Ok(bags)
    }

    /// Item files of one data bag, sorted by item id
    pub async fn list_data_bag_items(&self, bag: &str) -> Result<Vec<LocalFile>, LocalError> {
        validate_name("data bag", bag)?;
        list_local_files(&self.data_bag_path.join(bag)).await
    }

    /// Parse a JSON data bag item
    pub async fn read_data_bag_item(
        &self,
        bag: &str,
        item: &LocalFile,
    ) -> Result<serde_json::Value, LocalError> {
        validate_name("data bag", bag)?;
        read_json(&self.data_bag_path.join(bag).join(local_file_name(item))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::LocalFileFormat;
    use crate::config::DriftConfig;
    use tokio::fs;

    #[tokio::test]
    async fn test_data_bag_items_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let bag = dir.path().join("users");
        fs::create_dir_all(&bag).await.unwrap();
        fs::write(bag.join("alice.json"), r#"{"id": "alice", "shell": "/bin/zsh"}"#)
            .await
            .unwrap();
        fs::write(bag.join("bob.rb"), "id 'bob'").await.unwrap();
        fs::write(dir.path().join("README.md"), "docs").await.unwrap();

        let repo = LocalRepo::new(&DriftConfig {
            data_bag_path: dir.path().to_path_buf(),
            ..Default::default()
        });

        assert_eq!(repo.list_data_bags().await.unwrap(), vec!["users"]);

        let items = repo.list_data_bag_items("users").await.unwrap();
        let stems: Vec<_> = items.iter().map(|i| i.stem.as_str()).collect();
        assert_eq!(stems, vec!["alice", "bob"]);
        assert_eq!(items[1].format, LocalFileFormat::RubyDsl);

        let alice = repo.read_data_bag_item("users", &items[0]).await.unwrap();
        assert_eq!(alice["shell"], "/bin/zsh");
    }

    #[tokio::test]
    async fn test_list_data_bags_skips_databags_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("users")).await.unwrap();
        fs::create_dir_all(dir.path().join("databags")).await.unwrap();

        let repo = LocalRepo::new(&DriftConfig {
            data_bag_path: dir.path().to_path_buf(),
            ..Default::default()
        });
        assert_eq!(repo.list_data_bags().await.unwrap(), vec!["users"]);
    }

    #[tokio::test]
    async fn test_missing_bag_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepo::new(&DriftConfig {
            data_bag_path: dir.path().to_path_buf(),
            ..Default::default()
        });
        assert!(matches!(
            repo.list_data_bag_items("ghost").await,
            Err(LocalError::DirectoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_item_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let bag = dir.path().join("apps");
        fs::create_dir_all(&bag).await.unwrap();
        fs::write(bag.join("broken.json"), "{ not json").await.unwrap();

        let repo = LocalRepo::new(&DriftConfig {
            data_bag_path: dir.path().to_path_buf(),
            ..Default::default()
        });
        let items = repo.list_data_bag_items("apps").await.unwrap();
        let result = repo.read_data_bag_item("apps", &items[0]).await;
        assert!(matches!(result, Err(LocalError::ParseError { .. })));
    }
}
