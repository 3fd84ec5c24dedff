pub mod artifact;
pub mod collect;
pub mod commands;
pub mod config;
pub mod local;
pub mod reconciliation;
pub mod remote;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use artifact::{ArtifactKind, CookbookSegment, LocalFile, LocalFileFormat, Origin};
pub use collect::{list_local, list_remote, reconcile_kind};
pub use commands::{
    diff_cookbook, diff_cookbooks, diff_databag, diff_databag_items, diff_databags, diff_roles,
    find_files, CommandError, FindSide,
};
pub use config::{load_config, ConfigError, DriftConfig};
pub use local::{LocalError, LocalRepo};
pub use reconciliation::{
    attribute_hashes, diff_by_content, diff_identities, Artifact, Collection, HashHint,
    ReconcileError, ReconciliationResult,
};
pub use remote::{CookbookManifest, HttpRemote, ManifestRecord, RemoteError, RemoteSource};
pub use report::Report;
pub use utils::{compute_hash, compute_json_hash, ContentHash, DigestAlgorithm};
