//! Read access to a local chef-repo.
//!
//! [`LocalRepo`] is built by the caller from a [`DriftConfig`] and passed by
//! reference to whatever needs it; nothing here is cached globally.

mod cookbooks;
mod data_bags;
mod roles;

pub use cookbooks::CookbookFile;

use crate::artifact::{LocalFile, LocalFileFormat};
use crate::config::DriftConfig;
use crate::utils::NameError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::warn;

#[derive(Error, Debug)]
pub enum LocalError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Cookbook {0} not found in any cookbook path")]
    CookbookNotFound(String),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error(transparent)]
    InvalidName(#[from] NameError),
}

/// The local chef-repo layout
#[derive(Debug, Clone)]
pub struct LocalRepo {
    cookbook_paths: Vec<PathBuf>,
    data_bag_path: PathBuf,
    role_path: PathBuf,
}

impl LocalRepo {
    /// Build a repo from configuration whose paths are already resolved
    pub fn new(config: &DriftConfig) -> Self {
        Self {
            cookbook_paths: config.cookbook_path.clone(),
            data_bag_path: config.data_bag_path.clone(),
            role_path: config.role_path.clone(),
        }
    }

    pub fn cookbook_paths(&self) -> &[PathBuf] {
        &self.cookbook_paths
    }

    pub fn data_bag_path(&self) -> &Path {
        &self.data_bag_path
    }

    pub fn role_path(&self) -> &Path {
        &self.role_path
    }
}

/// Read and parse a JSON document
async fn read_json(path: &Path) -> Result<serde_json::Value, LocalError> {
    let content = fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|source| LocalError::ParseError {
        path: path.display().to_string(),
        source,
    })
}

/// List the names of the visible subdirectories of `path`, sorted
async fn list_subdirectories(path: &Path) -> Result<Vec<String>, LocalError> {
    if !path.is_dir() {
        return Err(LocalError::DirectoryNotFound(path.display().to_string()));
    }

    let mut names = Vec::new();
    let mut entries = fs::read_dir(path).await?;

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }

        let name = match entry.file_name().to_str() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if name.starts_with('.') {
            continue;
        }

        names.push(name);
    }

    names.sort();
    Ok(names)
}

/// Classify the data bag item or role files in a directory.
///
/// When both `name.json` and `name.rb` exist, the JSON file wins.
async fn list_local_files(path: &Path) -> Result<Vec<LocalFile>, LocalError> {
    if !path.is_dir() {
        return Err(LocalError::DirectoryNotFound(path.display().to_string()));
    }

    let mut files: BTreeMap<String, LocalFile> = BTreeMap::new();
    let mut entries = fs::read_dir(path).await?;

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let Some(file) = entry.file_name().to_str().and_then(LocalFile::classify) else {
            continue;
        };

        let existing = files.get(&file.stem).map(|f| f.format);
        if existing.is_some() {
            warn!(name = %file.stem, dir = %path.display(), "Ignoring Ruby file shadowed by JSON file");
        }
        if existing != Some(LocalFileFormat::Json) {
            files.insert(file.stem.clone(), file);
        }
    }

    Ok(files.into_values().collect())
}

/// File name on disk for a classified local file
fn local_file_name(file: &LocalFile) -> String {
    match file.format {
        LocalFileFormat::Json => format!("{}.json", file.stem),
        LocalFileFormat::RubyDsl => format!("{}.rb", file.stem),
    }
}
