//! Failures reported by the record store and the upstream importer, and the
//! classifier that decides which of them the engine can absorb.

use std::fmt;

use thiserror::Error;

/// Marker the record store puts in its message when a case was never imported.
pub const NO_MATCHING_CASE: &str = "No Matching Case";

/// Marker upstream puts in its message when a docket entry has no documents.
pub const NO_DOCUMENT_AVAILABLE: &str = "No PDF";

/// Structured failure payload from a record-store or importer call.
///
/// HTTP status and raw body are kept for diagnostics; classification only
/// ever looks at `message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.status, .message))]
pub struct UpstreamFailure {
    pub status: Option<u16>,
    pub message: String,
    pub body: String,
}

impl UpstreamFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: String::new(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            body: body.into(),
        }
    }
}

fn describe(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("upstream returned {status}: {message}"),
        None => format!("upstream call failed: {message}"),
    }
}

/// Which record-store resource a call was addressing. Classification depends
/// on it: the same message can be recoverable for one resource and fatal for
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Case,
    ClaimsHeader,
    ClaimsPage,
    DocketUpdate,
    DocketPage,
    DocumentList,
    DocumentPart,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::ClaimsHeader => "claims header",
            Self::ClaimsPage => "claims page",
            Self::DocketUpdate => "docket update",
            Self::DocketPage => "docket page",
            Self::DocumentList => "document list",
            Self::DocumentPart => "document part",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The resource is not in the record store yet; one import fixes it.
    NotFound,
    /// Upstream has nothing to give; treat as an empty result.
    BenignEmpty,
    /// Anything else. Propagated as-is, never retried.
    Fatal,
}

/// Decides how a failure should be handled.
///
/// Upstream only reports these conditions as human-readable text, so the
/// default [`MarkerClassifier`] matches substrings. Swap in another
/// implementation if upstream grows structured error codes.
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, lookup: Lookup, failure: &UpstreamFailure) -> FailureClass;
}

/// Substring-matching classifier.
///
/// "No matching case" only counts for case lookups and "no document" only for
/// document-list calls; in any other context both are fatal. Matching is
/// case-sensitive.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    not_found_marker: String,
    no_document_marker: String,
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::new(NO_MATCHING_CASE, NO_DOCUMENT_AVAILABLE)
    }
}

impl MarkerClassifier {
    pub fn new(not_found_marker: impl Into<String>, no_document_marker: impl Into<String>) -> Self {
        Self {
            not_found_marker: not_found_marker.into(),
            no_document_marker: no_document_marker.into(),
        }
    }
}

impl ErrorClassifier for MarkerClassifier {
    fn classify(&self, lookup: Lookup, failure: &UpstreamFailure) -> FailureClass {
        match lookup {
            Lookup::Case if failure.message.contains(&self.not_found_marker) => {
                FailureClass::NotFound
            }
            Lookup::DocumentList if failure.message.contains(&self.no_document_marker) => {
                FailureClass::BenignEmpty
            }
            _ => FailureClass::Fatal,
        }
    }
}
