//! Case record types shared between the engine and the record-store client.
//!
//! Every value here is transient: it is rebuilt from the record store on each
//! read and never mutated by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifies a case uniquely within a court, e.g. `nysb` / `21-12345`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseHandle {
    pub court: String,
    pub case_number: String,
}

impl CaseHandle {
    pub fn new(court: impl Into<String>, case_number: impl Into<String>) -> Self {
        Self {
            court: court.into(),
            case_number: case_number.into(),
        }
    }
}

impl fmt::Display for CaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.court, self.case_number)
    }
}

/// Case metadata as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInfo {
    pub court: String,
    pub case_number: String,
    pub title: Option<String>,
    pub chapter: Option<String>,
    /// As reported by the court, usually `YYYY-MM-DD`.
    pub date_filed: Option<String>,
}

/// One page of a paged record-store listing.
///
/// `total_pages` is only authoritative on the first page of a walk; zero
/// means the store did not report a count.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page_number: u32, total_pages: u32) -> Self {
        Self {
            items,
            page_number,
            total_pages,
        }
    }
}

// ── Claims register ──

/// Summary header of a case's claims register.
///
/// `html` stays null until the register has been updated from upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimsHeader {
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEntry {
    pub claim_number: String,
    pub filed_date: Option<String>,
    pub creditor: String,
    pub claimed_amount: Option<f64>,
    /// Unix seconds.
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A fully materialized claims register: case, header, and every entry in
/// store order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsRegister {
    pub case: CaseInfo,
    pub header: ClaimsHeader,
    pub entries: Vec<ClaimEntry>,
}

// ── Dockets and documents ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocketEntry {
    /// Store-assigned docket sequence, used to address the entry's documents.
    pub sequence_id: String,
    pub file_date: Option<String>,
    pub description: Option<String>,
}

/// Free-form docket search criteria, passed through to the docket listing as
/// query parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocketFilter(Map<String, Value>);

impl DocketFilter {
    pub fn new(criteria: Map<String, Value>) -> Self {
        Self(criteria)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the criteria as query pairs. Strings are passed verbatim, nulls
    /// are dropped, and everything else uses its JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.clone(), rendered))
            })
            .collect()
    }
}

/// Reference to one document part within a docket entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRef {
    pub number: u32,
    pub description: Option<String>,
}

/// The document parts known for a docket entry. Empty until the entry's
/// document list has been updated from upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub parts: Vec<PartRef>,
}

/// Descriptor of a single document part.
///
/// The upstream system has no "purchased" flag; an unpurchased part comes back
/// as an empty descriptor, which deserializes to all-`None` fields here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPart {
    pub part_number: u32,
    pub friendly_name: Option<String>,
    pub download_url: Option<String>,
}

impl DocumentPart {
    pub fn is_empty(&self) -> bool {
        self.friendly_name.is_none() && self.download_url.is_none()
    }
}

/// A purchased document, ready to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLink {
    pub filename: String,
    pub download_url: String,
}
