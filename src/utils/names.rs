use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Characters the server accepts in cookbook, data bag, item and role names.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("name pattern is a valid regex")
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("Invalid {kind} name: {name:?}")]
    Invalid { kind: &'static str, name: String },
}

/// Check if a name can be used safely in a repository path or an API URL
pub fn is_valid_name(name: &str) -> bool {
    name != "." && name != ".." && NAME_PATTERN.is_match(name)
}

/// Validate a name, labelling the error with what kind of name it is
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), NameError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(NameError::Invalid {
            kind,
            name: name.to_string(),
        })
    }
}
