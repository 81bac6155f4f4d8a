//! In-memory record store and importer for engine tests.
//!
//! Models the record store as a cache in front of upstream: reads return
//! stale or empty records until the matching importer call has run. Every
//! call is recorded in order.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use docketfill_core::failure::{NO_DOCUMENT_AVAILABLE, NO_MATCHING_CASE};
use docketfill_core::{
    CaseHandle, CaseInfo, ClaimEntry, ClaimsHeader, DocketEntry, DocketFilter, DocumentList,
    DocumentPart, PagedResult, PartRef, SortOrder, UpstreamFailure,
};

use crate::engine::Engine;
use crate::ports::{Importer, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetCase,
    ImportCase,
    GetClaimsHeader,
    UpdateClaims,
    GetClaimsPage(u32, u32, SortOrder),
    UpdateDockets,
    GetDocketPage(u32),
    GetDocumentList(String),
    UpdateDocumentList(String),
    GetDocumentPart(String, u32),
    PurchaseDocumentPart(String, u32),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    failures: Vec<(Call, UpstreamFailure)>,
    case_imported: bool,
    claims_updated: bool,
    claims_pages: Vec<Vec<ClaimEntry>>,
    docket_pages: Vec<Vec<DocketEntry>>,
    docket_total: Option<u32>,
    docket_filters: Vec<DocketFilter>,
    entry_documents: BTreeMap<String, Vec<u32>>,
    lists_updated: HashSet<String>,
    no_pdf: HashSet<String>,
    purchased: HashSet<(String, u32)>,
    purchase_ignored: bool,
    unnamed_parts: bool,
}

#[derive(Clone, Default)]
pub struct FakeRecords {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRecords {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn edit(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state());
        self
    }

    pub fn engine(&self) -> Engine {
        Engine::new(Arc::new(self.clone()), Arc::new(self.clone()))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state().calls.iter().filter(|c| *c == call).count()
    }

    pub fn docket_filters(&self) -> Vec<DocketFilter> {
        self.state().docket_filters.clone()
    }

    /// Make every occurrence of `call` fail with `failure`.
    pub fn failing(self, call: Call, failure: UpstreamFailure) -> Self {
        self.edit(|s| s.failures.push((call, failure)))
    }

    pub fn with_case_imported(self) -> Self {
        self.edit(|s| s.case_imported = true)
    }

    pub fn with_claims_updated(self) -> Self {
        self.edit(|s| s.claims_updated = true)
    }

    pub fn with_claims_pages(self, pages: Vec<Vec<ClaimEntry>>) -> Self {
        self.edit(|s| s.claims_pages = pages)
    }

    pub fn with_docket_pages(self, pages: Vec<Vec<DocketEntry>>) -> Self {
        self.edit(|s| s.docket_pages = pages)
    }

    /// Report `total` pages regardless of how many are configured.
    pub fn with_docket_total(self, total: u32) -> Self {
        self.edit(|s| s.docket_total = Some(total))
    }

    /// Parts upstream holds for a docket entry. The store only lists them
    /// once the entry's document list has been updated.
    pub fn with_entry_documents(self, docket_seq: &str, parts: &[u32]) -> Self {
        self.edit(|s| {
            s.entry_documents
                .insert(docket_seq.to_string(), parts.to_vec());
        })
    }

    pub fn with_document_list_updated(self, docket_seq: &str) -> Self {
        self.edit(|s| {
            s.lists_updated.insert(docket_seq.to_string());
        })
    }

    pub fn with_no_pdf(self, docket_seq: &str) -> Self {
        self.edit(|s| {
            s.no_pdf.insert(docket_seq.to_string());
        })
    }

    pub fn with_purchased(self, docket_seq: &str, part_number: u32) -> Self {
        self.edit(|s| {
            s.purchased.insert((docket_seq.to_string(), part_number));
        })
    }

    /// Purchased parts come back with a download URL but no friendly name.
    pub fn with_unnamed_parts(self) -> Self {
        self.edit(|s| s.unnamed_parts = true)
    }

    /// Purchases succeed but never show up in the store.
    pub fn with_purchase_ignored(self) -> Self {
        self.edit(|s| s.purchase_ignored = true)
    }

    fn record(&self, call: Call) -> Result<MutexGuard<'_, FakeState>, UpstreamFailure> {
        let mut state = self.state();
        let failure = state
            .failures
            .iter()
            .find(|(c, _)| *c == call)
            .map(|(_, f)| f.clone());
        state.calls.push(call);
        match failure {
            Some(failure) => Err(failure),
            None => Ok(state),
        }
    }
}

pub fn case() -> CaseHandle {
    CaseHandle::new("nysb", "21-12345")
}

pub fn claim(number: &str) -> ClaimEntry {
    ClaimEntry {
        claim_number: number.to_string(),
        filed_date: Some("2021-08-02".into()),
        creditor: format!("Creditor {number}"),
        claimed_amount: Some(1250.5),
        last_updated: Some(1_628_000_000),
    }
}

pub fn entry(docket_seq: &str) -> DocketEntry {
    DocketEntry {
        sequence_id: docket_seq.to_string(),
        file_date: Some("2021-09-14".into()),
        description: Some(format!("Docket entry {docket_seq}")),
    }
}

fn page<T: Clone>(pages: &[Vec<T>], page_number: u32, total: u32) -> PagedResult<T> {
    let items = pages
        .get(page_number as usize - 1)
        .cloned()
        .unwrap_or_default();
    PagedResult::new(items, page_number, total)
}

#[async_trait]
impl RecordStore for FakeRecords {
    async fn get_case(&self, case: &CaseHandle) -> Result<CaseInfo, UpstreamFailure> {
        let state = self.record(Call::GetCase)?;
        if !state.case_imported {
            return Err(UpstreamFailure::with_status(
                404,
                format!("{NO_MATCHING_CASE} for {case}"),
                format!(r#"{{"error":"{NO_MATCHING_CASE}"}}"#),
            ));
        }
        Ok(CaseInfo {
            court: case.court.clone(),
            case_number: case.case_number.clone(),
            title: Some("In re Example Holdings LLC".into()),
            chapter: Some("11".into()),
            date_filed: Some("2021-07-30".into()),
        })
    }

    async fn get_claims_header(&self, _case: &CaseHandle) -> Result<ClaimsHeader, UpstreamFailure> {
        let state = self.record(Call::GetClaimsHeader)?;
        let html = state
            .claims_updated
            .then(|| "<table>claims summary</table>".to_string());
        Ok(ClaimsHeader { html })
    }

    async fn get_claims_page(
        &self,
        _case: &CaseHandle,
        page_number: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> Result<PagedResult<ClaimEntry>, UpstreamFailure> {
        let state = self.record(Call::GetClaimsPage(page_number, page_size, sort_order))?;
        let total = state.claims_pages.len() as u32;
        Ok(page(&state.claims_pages, page_number, total))
    }

    async fn get_docket_page(
        &self,
        _case: &CaseHandle,
        filter: &DocketFilter,
        page_number: u32,
        _page_size: u32,
    ) -> Result<PagedResult<DocketEntry>, UpstreamFailure> {
        let mut state = self.record(Call::GetDocketPage(page_number))?;
        state.docket_filters.push(filter.clone());
        let total = state
            .docket_total
            .unwrap_or(state.docket_pages.len() as u32);
        Ok(page(&state.docket_pages, page_number, total))
    }

    async fn get_document_list(
        &self,
        _case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<DocumentList, UpstreamFailure> {
        let state = self.record(Call::GetDocumentList(docket_seq.to_string()))?;
        if !state.lists_updated.contains(docket_seq) {
            return Ok(DocumentList::default());
        }
        let parts = state
            .entry_documents
            .get(docket_seq)
            .map(|numbers| {
                numbers
                    .iter()
                    .map(|&number| PartRef {
                        number,
                        description: None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(DocumentList { parts })
    }

    async fn get_document_part(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<DocumentPart, UpstreamFailure> {
        let state = self.record(Call::GetDocumentPart(docket_seq.to_string(), part_number))?;
        let purchased = state
            .purchased
            .contains(&(docket_seq.to_string(), part_number));
        Ok(DocumentPart {
            part_number,
            friendly_name: (purchased && !state.unnamed_parts)
                .then(|| format!("doc-{docket_seq}-{part_number}.pdf")),
            download_url: purchased.then(|| {
                format!(
                    "https://records.test/{}/{}/{docket_seq}/{part_number}",
                    case.court, case.case_number
                )
            }),
        })
    }
}

#[async_trait]
impl Importer for FakeRecords {
    async fn import_case(&self, _case: &CaseHandle) -> Result<(), UpstreamFailure> {
        let mut state = self.record(Call::ImportCase)?;
        state.case_imported = true;
        Ok(())
    }

    async fn update_claims(&self, _case: &CaseHandle) -> Result<(), UpstreamFailure> {
        let mut state = self.record(Call::UpdateClaims)?;
        state.claims_updated = true;
        Ok(())
    }

    async fn update_dockets(&self, _case: &CaseHandle) -> Result<(), UpstreamFailure> {
        self.record(Call::UpdateDockets)?;
        Ok(())
    }

    async fn update_document_list(
        &self,
        _case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<(), UpstreamFailure> {
        let mut state = self.record(Call::UpdateDocumentList(docket_seq.to_string()))?;
        if state.no_pdf.contains(docket_seq) {
            return Err(UpstreamFailure::with_status(
                404,
                format!("{NO_DOCUMENT_AVAILABLE} Document available for entry {docket_seq}"),
                format!(r#"{{"errorMessage":"{NO_DOCUMENT_AVAILABLE} Document"}}"#),
            ));
        }
        state.lists_updated.insert(docket_seq.to_string());
        Ok(())
    }

    async fn purchase_document_part(
        &self,
        _case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<(), UpstreamFailure> {
        let mut state = self.record(Call::PurchaseDocumentPart(
            docket_seq.to_string(),
            part_number,
        ))?;
        if !state.purchase_ignored {
            state.purchased.insert((docket_seq.to_string(), part_number));
        }
        Ok(())
    }
}
