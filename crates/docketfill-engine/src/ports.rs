//! Boundary traits for the two external services the engine drives.

use async_trait::async_trait;
use docketfill_core::{
    CaseHandle, CaseInfo, ClaimEntry, ClaimsHeader, DocketEntry, DocketFilter, DocumentList,
    DocumentPart, PagedResult, SortOrder, UpstreamFailure,
};

/// Read-only access to the local record index.
///
/// Reads may return stale or partial records; they never change upstream
/// state.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_case(&self, case: &CaseHandle) -> Result<CaseInfo, UpstreamFailure>;

    async fn get_claims_header(&self, case: &CaseHandle) -> Result<ClaimsHeader, UpstreamFailure>;

    async fn get_claims_page(
        &self,
        case: &CaseHandle,
        page_number: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> Result<PagedResult<ClaimEntry>, UpstreamFailure>;

    async fn get_docket_page(
        &self,
        case: &CaseHandle,
        filter: &DocketFilter,
        page_number: u32,
        page_size: u32,
    ) -> Result<PagedResult<DocketEntry>, UpstreamFailure>;

    async fn get_document_list(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<DocumentList, UpstreamFailure>;

    async fn get_document_part(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<DocumentPart, UpstreamFailure>;
}

/// Paid operations against the upstream records system.
///
/// Each call is billed. Its only effect the engine relies on is that a later
/// [`RecordStore`] read of the same resource comes back populated.
#[async_trait]
pub trait Importer: Send + Sync {
    async fn import_case(&self, case: &CaseHandle) -> Result<(), UpstreamFailure>;

    async fn update_claims(&self, case: &CaseHandle) -> Result<(), UpstreamFailure>;

    async fn update_dockets(&self, case: &CaseHandle) -> Result<(), UpstreamFailure>;

    async fn update_document_list(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<(), UpstreamFailure>;

    async fn purchase_document_part(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<(), UpstreamFailure>;
}
