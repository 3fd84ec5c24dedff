mod hash;
mod names;

pub use hash::{
    canonical_json, compute_file_hash, compute_hash, compute_json_hash, ContentHash,
    DigestAlgorithm,
};
pub use names::{is_valid_name, validate_name, NameError};

/// Name of the optional configuration file at the repository root
pub const CONFIG_FILE: &str = "knife-drift.json";

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Join path components with `/`, independent of the host separator
pub fn to_slash_path(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
