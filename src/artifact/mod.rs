//! Artifact kinds and the classification of local files.
//!
//! Local files are classified once, while a collection is built, into a
//! [`LocalFile`] carrying a [`LocalFileFormat`], or into a
//! [`CookbookSegment`] for cookbook contents. Comparison code never looks
//! at file names or extensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Where a collection was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Local,
    Remote,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Local => f.write_str("local"),
            Origin::Remote => f.write_str("remote"),
        }
    }
}

/// The kinds of artifact that can be compared
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Cookbook names
    Cookbooks,
    /// Files of one cookbook, keyed by path relative to the cookbook root
    CookbookFiles { cookbook: String },
    /// Data bag names
    DataBags,
    /// Items of one data bag, keyed by item id
    DataBagItems { bag: String },
    /// Roles, keyed by role name
    Roles,
}

impl ArtifactKind {
    /// Whether collections of this kind carry content hashes
    pub fn has_content(&self) -> bool {
        !matches!(self, ArtifactKind::Cookbooks | ArtifactKind::DataBags)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Cookbooks => f.write_str("cookbooks"),
            ArtifactKind::CookbookFiles { cookbook } => write!(f, "{cookbook} cookbook files"),
            ArtifactKind::DataBags => f.write_str("data bags"),
            ArtifactKind::DataBagItems { bag } => write!(f, "{bag} data bag items"),
            ArtifactKind::Roles => f.write_str("roles"),
        }
    }
}

/// Serialization format of a data bag item or role file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalFileFormat {
    Json,
    /// Ruby DSL; can be listed but not hashed comparably to server JSON
    RubyDsl,
}

/// A data bag item or role file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// File name without extension; the artifact identity
    pub stem: String,
    pub format: LocalFileFormat,
}

impl LocalFile {
    /// Classify a file name. Returns `None` for anything that is not a
    /// `.json` or `.rb` file, and for hidden files.
    pub fn classify(file_name: &str) -> Option<Self> {
        if file_name.starts_with('.') {
            return None;
        }

        let path = Path::new(file_name);
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => LocalFileFormat::Json,
            Some("rb") => LocalFileFormat::RubyDsl,
            _ => return None,
        };
        let stem = path.file_stem()?.to_str()?.to_string();

        Some(Self { stem, format })
    }
}

/// The part of a cookbook a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CookbookSegment {
    Attributes,
    Definitions,
    Files,
    Libraries,
    Providers,
    Recipes,
    Resources,
    Templates,
    RootFiles,
}

impl CookbookSegment {
    /// Segments that live in a directory of the same name
    pub const DIRECTORIES: [CookbookSegment; 8] = [
        CookbookSegment::Attributes,
        CookbookSegment::Definitions,
        CookbookSegment::Files,
        CookbookSegment::Libraries,
        CookbookSegment::Providers,
        CookbookSegment::Recipes,
        CookbookSegment::Resources,
        CookbookSegment::Templates,
    ];

    /// Every segment, as named in a server cookbook manifest
    pub const ALL: [CookbookSegment; 9] = [
        CookbookSegment::Attributes,
        CookbookSegment::Definitions,
        CookbookSegment::Files,
        CookbookSegment::Libraries,
        CookbookSegment::Providers,
        CookbookSegment::Recipes,
        CookbookSegment::Resources,
        CookbookSegment::Templates,
        CookbookSegment::RootFiles,
    ];

    /// Key of the segment in a server cookbook manifest
    pub fn manifest_key(self) -> &'static str {
        match self {
            CookbookSegment::Attributes => "attributes",
            CookbookSegment::Definitions => "definitions",
            CookbookSegment::Files => "files",
            CookbookSegment::Libraries => "libraries",
            CookbookSegment::Providers => "providers",
            CookbookSegment::Recipes => "recipes",
            CookbookSegment::Resources => "resources",
            CookbookSegment::Templates => "templates",
            CookbookSegment::RootFiles => "root_files",
        }
    }

    /// Directory name of the segment inside a cookbook, if it has one
    pub fn directory(self) -> Option<&'static str> {
        match self {
            CookbookSegment::RootFiles => None,
            other => Some(other.manifest_key()),
        }
    }

    /// Classify a path relative to the cookbook root.
    ///
    /// Files directly at the root are root files; files below one of the
    /// segment directories belong to that segment; everything else
    /// (e.g. `spec/`, `test/`, hidden entries) is not part of the cookbook.
    pub fn classify(relative: &Path) -> Option<Self> {
        let mut components = relative.components();
        let first = components.next()?.as_os_str().to_str()?;
        if first.starts_with('.') {
            return None;
        }

        if components.next().is_none() {
            return Some(CookbookSegment::RootFiles);
        }

        Self::DIRECTORIES
            .into_iter()
            .find(|segment| segment.directory() == Some(first))
    }
}
