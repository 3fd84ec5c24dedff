use super::{list_local_files, local_file_name, read_json, LocalError, LocalRepo};
use crate::artifact::LocalFile;

impl LocalRepo {
    /// Role files under the role path, sorted by role name
    pub async fn list_roles(&self) -> Result<Vec<LocalFile>, LocalError> {
        list_local_files(&self.role_path).await
    }

    /// Parse a JSON role file
    pub async fn read_role(&self, role: &LocalFile) -> Result<serde_json::Value, LocalError> {
        read_json(&self.role_path.join(local_file_name(role))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use tokio::fs;

    #[tokio::test]
    async fn test_list_and_read_roles() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("web.json"),
            r#"{"name": "web", "run_list": ["recipe[nginx]"]}"#,
        )
        .await
        .unwrap();
        fs::write(dir.path().join("base.rb"), "name 'base'").await.unwrap();

        let repo = LocalRepo::new(&DriftConfig {
            role_path: dir.path().to_path_buf(),
            ..Default::default()
        });

        let roles = repo.list_roles().await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.stem.as_str()).collect();
        assert_eq!(names, vec!["base", "web"]);

        let web = repo.read_role(&roles[1]).await.unwrap();
        assert_eq!(web["run_list"][0], "recipe[nginx]");
    }
}
