//! HTTP transport for the record store and the upstream importer.
//!
//! Reads go to the service's local index (`GET`); importer calls are the
//! billed upstream operations (`POST`). Every call authenticates with the
//! invocation's app id and secret.

use async_trait::async_trait;
use docketfill_core::{
    CaseHandle, CaseInfo, ClaimEntry, ClaimsHeader, DocketEntry, DocketFilter, DocumentList,
    DocumentPart, PagedResult, SortOrder, UpstreamFailure,
};
use docketfill_engine::{Importer, RecordStore};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::{ClientConfig, ClientError};
use crate::wire::{
    CaseEnvelope, ClaimsHeaderEnvelope, ClaimsPageEnvelope, DocketPageEnvelope,
    DocumentListEnvelope, DocumentPartEnvelope, failure_message,
};

/// HTTP client for a CourtAPI-style case record service.
pub struct CourtApiClient {
    client: reqwest::Client,
    base_url: Url,
    app_id: String,
    app_secret: String,
}

fn transport_failure(err: reqwest::Error) -> UpstreamFailure {
    UpstreamFailure {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
        body: String::new(),
    }
}

impl CourtApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "not a hierarchical URL".into(),
            });
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url,
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn case_endpoint(&self, case: &CaseHandle, rest: &[&str]) -> Url {
        let mut segments = vec!["cases", "pacer", case.court.as_str(), case.case_number.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "record service request");
        self.client
            .request(method, url)
            .basic_auth(&self.app_id, Some(&self.app_secret))
    }

    /// Send a request and return its JSON body, turning non-2xx statuses and
    /// 2xx bodies that carry an `error` field into failures.
    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamFailure> {
        let resp = request.send().await.map_err(transport_failure)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport_failure)?;
        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(failure_message)
                .unwrap_or_else(|| status.to_string());
            warn!(status = status.as_u16(), message = %message, "record service error");
            return Err(UpstreamFailure::with_status(status.as_u16(), message, body));
        }

        let value = match parsed {
            Some(value) => value,
            None if body.trim().is_empty() => Value::Null,
            None => {
                return Err(UpstreamFailure::with_status(
                    status.as_u16(),
                    "response was not valid JSON",
                    body,
                ));
            }
        };
        if let Some(message) = failure_message(&value) {
            warn!(status = status.as_u16(), message = %message, "record service error in body");
            return Err(UpstreamFailure::with_status(status.as_u16(), message, body));
        }
        Ok(value)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(String, String)],
    ) -> Result<T, UpstreamFailure> {
        let value = self.send(self.request(Method::GET, url).query(query)).await?;
        serde_json::from_value(value.clone()).map_err(|e| UpstreamFailure {
            status: None,
            message: format!("unexpected response shape: {e}"),
            body: value.to_string(),
        })
    }

    async fn post(&self, url: Url, body: Option<Value>) -> Result<(), UpstreamFailure> {
        let mut request = self.request(Method::POST, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.send(request).await.map(|_| ())
    }
}

fn page_query(page_number: u32, page_size: u32) -> Vec<(String, String)> {
    vec![
        ("page_number".to_string(), page_number.to_string()),
        ("page_size".to_string(), page_size.to_string()),
    ]
}

#[async_trait]
impl RecordStore for CourtApiClient {
    async fn get_case(&self, case: &CaseHandle) -> Result<CaseInfo, UpstreamFailure> {
        let envelope: CaseEnvelope = self.get(self.case_endpoint(case, &[]), &[]).await?;
        Ok(envelope.into_case_info(case))
    }

    async fn get_claims_header(&self, case: &CaseHandle) -> Result<ClaimsHeader, UpstreamFailure> {
        let envelope: ClaimsHeaderEnvelope = self
            .get(self.case_endpoint(case, &["claims", "header"]), &[])
            .await?;
        Ok(envelope.into())
    }

    async fn get_claims_page(
        &self,
        case: &CaseHandle,
        page_number: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> Result<PagedResult<ClaimEntry>, UpstreamFailure> {
        let mut query = page_query(page_number, page_size);
        query.push(("sort_order".to_string(), sort_order.as_str().to_string()));
        let envelope: ClaimsPageEnvelope = self
            .get(self.case_endpoint(case, &["claims"]), &query)
            .await?;
        Ok(envelope.into_paged(page_number))
    }

    async fn get_docket_page(
        &self,
        case: &CaseHandle,
        filter: &DocketFilter,
        page_number: u32,
        page_size: u32,
    ) -> Result<PagedResult<DocketEntry>, UpstreamFailure> {
        // Paging parameters win over anything of the same name in the filter.
        let mut query: Vec<(String, String)> = filter
            .query_pairs()
            .into_iter()
            .filter(|(key, _)| key != "page_number" && key != "page_size")
            .collect();
        query.extend(page_query(page_number, page_size));
        let envelope: DocketPageEnvelope = self
            .get(self.case_endpoint(case, &["dockets"]), &query)
            .await?;
        Ok(envelope.into_paged(page_number))
    }

    async fn get_document_list(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<DocumentList, UpstreamFailure> {
        let envelope: DocumentListEnvelope = self
            .get(
                self.case_endpoint(case, &["dockets", docket_seq, "documents"]),
                &[],
            )
            .await?;
        Ok(envelope.into())
    }

    async fn get_document_part(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<DocumentPart, UpstreamFailure> {
        let part = part_number.to_string();
        let envelope: DocumentPartEnvelope = self
            .get(
                self.case_endpoint(case, &["dockets", docket_seq, "documents", &part]),
                &[],
            )
            .await?;
        Ok(envelope.into_part(part_number))
    }
}

#[async_trait]
impl Importer for CourtApiClient {
    async fn import_case(&self, case: &CaseHandle) -> Result<(), UpstreamFailure> {
        let url = self.endpoint(&["cases", "pacer", case.court.as_str(), "search"]);
        self.post(url, Some(json!({ "case_no": case.case_number })))
            .await
    }

    async fn update_claims(&self, case: &CaseHandle) -> Result<(), UpstreamFailure> {
        self.post(
            self.case_endpoint(case, &["claims", "update"]),
            Some(json!({})),
        )
        .await
    }

    async fn update_dockets(&self, case: &CaseHandle) -> Result<(), UpstreamFailure> {
        self.post(self.case_endpoint(case, &["dockets", "update"]), None)
            .await
    }

    async fn update_document_list(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<(), UpstreamFailure> {
        self.post(
            self.case_endpoint(case, &["dockets", docket_seq, "documents"]),
            None,
        )
        .await
    }

    async fn purchase_document_part(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<(), UpstreamFailure> {
        let part = part_number.to_string();
        self.post(
            self.case_endpoint(case, &["dockets", docket_seq, "documents", &part]),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CourtApiClient {
        CourtApiClient::new(&ClientConfig::new(base_url, "app", "secret")).unwrap()
    }

    #[test]
    fn case_endpoint_layout() {
        let client = client("https://train.v1.courtapi.com/");
        let url = client.case_endpoint(
            &CaseHandle::new("nysb", "21-12345"),
            &["dockets", "7", "documents", "1"],
        );
        assert_eq!(
            url.as_str(),
            "https://train.v1.courtapi.com/cases/pacer/nysb/21-12345/dockets/7/documents/1"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let client = client("http://localhost:8080/api/v1");
        let url = client.case_endpoint(&CaseHandle::new("nysb", "1:21 cv/1"), &[]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/cases/pacer/nysb/1:21%20cv%2F1"
        );
    }

    #[test]
    fn rejects_missing_credentials() {
        let err = CourtApiClient::new(&ClientConfig::new("http://localhost", "", "secret"))
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::MissingCredential("appId")));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = CourtApiClient::new(&ClientConfig::new("not a url", "app", "secret"))
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_failure() {
        let client = client("http://127.0.0.1:9");
        let failure = client
            .get_case(&CaseHandle::new("nysb", "21-12345"))
            .await
            .unwrap_err();
        assert_eq!(failure.status, None);
        assert!(failure.body.is_empty());
    }
}
