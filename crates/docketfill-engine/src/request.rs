//! Invocation entry point: validate a request payload and dispatch it.
//!
//! Payloads are the JSON events the service is invoked with, e.g.
//! `{"court": "nysb", "caseNumber": "21-12345", "search": {}}`. Missing
//! required fields are rejected before any upstream call is made.

use std::fmt;
use std::str::FromStr;

use docketfill_core::{CaseHandle, ClaimsRegister, DocketFilter, DocumentLink};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::engine::Engine;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Assemble a case's claims register.
    Claims,
    /// Search a case's dockets and buy every matching document.
    Documents,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claims => "claims",
            Self::Documents => "documents",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claims" => Ok(Self::Claims),
            "documents" => Ok(Self::Documents),
            other => Err(EngineError::Validation(format!(
                "unknown operation '{other}' (expected 'claims' or 'documents')"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    court: Option<String>,
    case_number: Option<String>,
    search: Option<DocketFilter>,
}

fn parse(event: Value) -> Result<RawRequest, EngineError> {
    serde_json::from_value(event)
        .map_err(|e| EngineError::Validation(format!("invalid request payload: {e}")))
}

fn required(value: Option<String>, name: &str) -> Result<String, EngineError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(EngineError::Validation(format!("{name} is required"))),
    }
}

fn case_handle(raw: &mut RawRequest) -> Result<CaseHandle, EngineError> {
    let court = required(raw.court.take(), "court")?;
    let case_number = required(raw.case_number.take(), "caseNumber")?;
    Ok(CaseHandle::new(court, case_number))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsRequest {
    pub case: CaseHandle,
}

impl ClaimsRequest {
    pub fn from_event(event: Value) -> Result<Self, EngineError> {
        let mut raw = parse(event)?;
        Ok(Self {
            case: case_handle(&mut raw)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentsRequest {
    pub case: CaseHandle,
    pub search: DocketFilter,
}

impl DocumentsRequest {
    pub fn from_event(event: Value) -> Result<Self, EngineError> {
        let mut raw = parse(event)?;
        let case = case_handle(&mut raw)?;
        let search = raw
            .search
            .ok_or_else(|| EngineError::Validation("search is required".into()))?;
        Ok(Self { case, search })
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Claims(ClaimsRegister),
    Documents(Vec<DocumentLink>),
}

impl Engine {
    /// Validate `event` for `operation` and run it to completion.
    pub async fn invoke(&self, operation: Operation, event: Value) -> Result<Response, EngineError> {
        match operation {
            Operation::Claims => {
                let request = ClaimsRequest::from_event(event)?;
                info!(operation = %operation, case = %request.case, "invocation started");
                self.claims_register(&request.case)
                    .await
                    .map(Response::Claims)
            }
            Operation::Documents => {
                let request = DocumentsRequest::from_event(event)?;
                info!(operation = %operation, case = %request.case, "invocation started");
                self.find_documents(&request.case, &request.search)
                    .await
                    .map(Response::Documents)
            }
        }
    }
}
