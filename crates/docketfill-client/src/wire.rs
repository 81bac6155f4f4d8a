//! JSON bodies as the record service sends them, and their conversion into
//! core record types.

use docketfill_core::{
    CaseHandle, CaseInfo, ClaimEntry, ClaimsHeader, DocketEntry, DocumentList, DocumentPart,
    PagedResult, PartRef,
};
use serde::Deserialize;
use serde_json::Value;

/// Pull a human-readable failure message out of a response body.
///
/// The service reports errors as `{"error": "..."}`, `{"error": {"message":
/// "..."}}`, or `{"errorMessage": "..."}` depending on the endpoint, and
/// upstream pass-through failures can carry both `error` and `errorMessage`.
/// When both are present they are joined so neither marker is lost.
pub(crate) fn failure_message(body: &Value) -> Option<String> {
    let error = match body.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Object(obj)) => match obj.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(Value::Object(obj.clone()).to_string()),
        },
        Some(Value::Null | Value::Bool(false)) | None => None,
        Some(other) => Some(other.to_string()),
    };
    let detail = body
        .get("errorMessage")
        .and_then(Value::as_str)
        .map(str::to_string);

    match (error, detail) {
        (Some(error), Some(detail)) if error != detail => Some(format!("{error}: {detail}")),
        (error, detail) => detail.or(error),
    }
}

/// Render a scalar the service sends as either a string or a number.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePage<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> WirePage<T> {
    fn into_paged<U>(self, requested_page: u32, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult::new(
            self.content.into_iter().map(f).collect(),
            self.page_number.unwrap_or(requested_page),
            self.total_pages,
        )
    }
}

// ── Case ──

#[derive(Debug, Deserialize)]
pub(crate) struct CaseEnvelope {
    #[serde(default)]
    pub case: Value,
}

impl CaseEnvelope {
    pub fn into_case_info(self, handle: &CaseHandle) -> CaseInfo {
        let field = |name: &str| self.case.get(name).and_then(scalar_text);
        CaseInfo {
            court: field("court").unwrap_or_else(|| handle.court.clone()),
            case_number: field("case_no").unwrap_or_else(|| handle.case_number.clone()),
            title: field("title"),
            chapter: field("chapter"),
            date_filed: field("date_filed"),
        }
    }
}

// ── Claims ──

#[derive(Debug, Deserialize)]
pub(crate) struct ClaimsHeaderEnvelope {
    #[serde(default)]
    pub header: WireClaimsHeader,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireClaimsHeader {
    #[serde(default)]
    pub html: Option<String>,
}

impl From<ClaimsHeaderEnvelope> for ClaimsHeader {
    fn from(envelope: ClaimsHeaderEnvelope) -> Self {
        ClaimsHeader {
            html: envelope.header.html,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClaimsPageEnvelope {
    pub entries: WirePage<WireClaim>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireClaim {
    #[serde(default)]
    pub info: WireClaimInfo,
    #[serde(default)]
    pub creditor: Option<String>,
    #[serde(default)]
    pub amounts: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireClaimInfo {
    #[serde(default)]
    pub claim_no: Value,
    #[serde(default)]
    pub original_filed_date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl From<WireClaim> for ClaimEntry {
    fn from(claim: WireClaim) -> Self {
        ClaimEntry {
            claim_number: scalar_text(&claim.info.claim_no).unwrap_or_default(),
            filed_date: claim.info.original_filed_date,
            creditor: claim.creditor.unwrap_or_default(),
            claimed_amount: claim
                .amounts
                .pointer("/amount/claimed")
                .and_then(scalar_number),
            last_updated: claim.info.timestamp,
        }
    }
}

impl ClaimsPageEnvelope {
    pub fn into_paged(self, requested_page: u32) -> PagedResult<ClaimEntry> {
        self.entries.into_paged(requested_page, ClaimEntry::from)
    }
}

// ── Dockets ──

#[derive(Debug, Deserialize)]
pub(crate) struct DocketPageEnvelope {
    pub entries: WirePage<WireDocket>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDocket {
    pub docket_seq: Value,
    #[serde(default)]
    pub date_filed: Option<String>,
    #[serde(default, alias = "docket_text")]
    pub description: Option<String>,
}

impl From<WireDocket> for DocketEntry {
    fn from(docket: WireDocket) -> Self {
        DocketEntry {
            sequence_id: scalar_text(&docket.docket_seq).unwrap_or_default(),
            file_date: docket.date_filed,
            description: docket.description,
        }
    }
}

impl DocketPageEnvelope {
    pub fn into_paged(self, requested_page: u32) -> PagedResult<DocketEntry> {
        self.entries.into_paged(requested_page, DocketEntry::from)
    }
}

// ── Documents ──

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentListEnvelope {
    #[serde(default)]
    pub parts: Vec<WirePartRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePartRef {
    pub number: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<DocumentListEnvelope> for DocumentList {
    fn from(envelope: DocumentListEnvelope) -> Self {
        DocumentList {
            parts: envelope
                .parts
                .into_iter()
                .map(|part| PartRef {
                    number: part.number,
                    description: part.description,
                })
                .collect(),
        }
    }
}

/// An unpurchased part comes back as `{"part": {}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DocumentPartEnvelope {
    #[serde(default)]
    pub part: WirePart,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WirePart {
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl DocumentPartEnvelope {
    pub fn into_part(self, part_number: u32) -> DocumentPart {
        DocumentPart {
            part_number,
            friendly_name: self.part.friendly_name.filter(|s| !s.is_empty()),
            download_url: self.part.download_url.filter(|s| !s.is_empty()),
        }
    }
}
