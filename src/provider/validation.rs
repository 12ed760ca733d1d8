// Static validation of configuration values

use crate::auth::{parse_document, PathOrContents};

/// Warnings and errors produced by an attribute validator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Best-effort check of a `credentials` value.
///
/// An existing path is accepted without reading it. Anything else must parse
/// as a credentials document. The value itself is never echoed back since it
/// may hold a private key.
pub fn validate_credentials(value: Option<&str>, key: &str) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    let Some(creds) = value.filter(|v| !v.is_empty()) else {
        return outcome;
    };

    if PathOrContents::classify(creds).is_path() {
        return outcome;
    }

    if let Err(e) = parse_document(creds) {
        outcome
            .errors
            .push(format!("JSON credentials in {:?} are not valid: {}", key, e));
    }

    outcome
}
