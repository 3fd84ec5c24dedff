//! Server response documents and their parsing.

use super::RemoteError;
use crate::artifact::CookbookSegment;
use crate::utils::is_valid_name;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// One file record of a server cookbook manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Path relative to the cookbook root; some servers omit it
    #[serde(default)]
    pub path: Option<String>,
    pub checksum: String,
}

/// The latest version of a cookbook as stored on the server
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookbookManifest {
    pub name: String,
    pub version: String,
    pub records: Vec<ManifestRecord>,
    /// Checksums listed without any file record
    pub bare_checksums: Vec<String>,
}

impl CookbookManifest {
    /// Records that carry a path
    pub fn records_with_path(&self) -> impl Iterator<Item = (&str, &ManifestRecord)> {
        self.records
            .iter()
            .filter_map(|r| r.path.as_deref().map(|p| (p, r)))
    }

    /// True when the manifest exposes checksums the records cannot place at a path
    pub fn is_hash_only(&self) -> bool {
        !self.bare_checksums.is_empty() || self.records.iter().any(|r| r.path.is_none())
    }

    /// Every checksum in the manifest, with or without a path
    pub fn all_checksums(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .map(|r| r.checksum.as_str())
            .chain(self.bare_checksums.iter().map(String::as_str))
    }
}

/// Names of an index document (`{"name": "url", ...}`), sorted.
///
/// Names that could not be used safely in a URL are dropped with a warning.
pub fn parse_name_index(url: &str, document: &Value) -> Result<Vec<String>, RemoteError> {
    let object = document
        .as_object()
        .ok_or_else(|| RemoteError::unexpected(url, "expected a JSON object"))?;

    let mut names: Vec<String> = object
        .keys()
        .filter(|name| {
            let valid = is_valid_name(name);
            if !valid {
                warn!(name = %name, url, "Skipping name returned by server");
            }
            valid
        })
        .cloned()
        .collect();

    names.sort();
    Ok(names)
}

/// URL of the newest version from a `cookbooks/{name}` document
pub fn parse_latest_version_url(
    url: &str,
    cookbook: &str,
    document: &Value,
) -> Result<Option<String>, RemoteError> {
    let entry = document
        .get(cookbook)
        .ok_or_else(|| RemoteError::unexpected(url, "cookbook missing from response"))?;

    Ok(entry
        .get("versions")
        .and_then(Value::as_array)
        .and_then(|versions| versions.first())
        .and_then(|v| v.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string))
}

/// Parse a cookbook version document.
///
/// Both the segmented layout (`recipes`, `templates`, ...) and the
/// `all_files` layout are accepted. A top-level `checksums` object adds
/// any checksum not already covered by a record.
pub fn parse_cookbook_manifest(
    url: &str,
    cookbook: &str,
    document: &Value,
) -> Result<CookbookManifest, RemoteError> {
    if !document.is_object() {
        return Err(RemoteError::unexpected(url, "expected a JSON object"));
    }

    let version = document
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let mut records = Vec::new();
    let segment_keys: Vec<&str> = match document.get("all_files") {
        Some(_) => vec!["all_files"],
        None => CookbookSegment::ALL.iter().map(|s| s.manifest_key()).collect(),
    };

    for key in segment_keys {
        let Some(segment) = document.get(key) else {
            continue;
        };
        let parsed: Vec<ManifestRecord> = serde_json::from_value(segment.clone())
            .map_err(|e| RemoteError::unexpected(url, &format!("bad {key} records: {e}")))?;
        records.extend(parsed);
    }

    let mut bare_checksums: Vec<String> = document
        .get("checksums")
        .and_then(Value::as_object)
        .map(|checksums| {
            checksums
                .keys()
                .filter(|c| !records.iter().any(|r| &r.checksum == *c))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    bare_checksums.sort();

    Ok(CookbookManifest {
        name: cookbook.to_string(),
        version,
        records,
        bare_checksums,
    })
}

/// Strip the `raw_data` wrapper some servers put around data bag items
pub fn unwrap_data_bag_item(document: Value) -> Value {
    match document {
        Value::Object(mut object) if object.get("raw_data").is_some_and(Value::is_object) => {
            object.remove("raw_data").unwrap_or_default()
        }
        other => other,
    }
}

/// Put a role document in the shape the server stores it in.
///
/// The server fills in empty defaults for fields a role file may omit and
/// adds the `json_class`/`chef_type` markers. Both sides are normalized
/// before hashing so only a change in meaning counts as drift.
pub fn normalize_role(document: Value) -> Value {
    let Value::Object(mut object) = document else {
        return document;
    };

    object.remove("json_class");
    object.remove("chef_type");

    let defaults = [
        ("description", Value::String(String::new())),
        ("run_list", Value::Array(Vec::new())),
        ("default_attributes", Value::Object(Map::new())),
        ("override_attributes", Value::Object(Map::new())),
        ("env_run_lists", Value::Object(Map::new())),
    ];
    for (key, value) in defaults {
        object.entry(key).or_insert(value);
    }

    Value::Object(object)
}
