use docketfill_core::{CaseHandle, ClaimEntry, ClaimsHeader, ClaimsRegister, Lookup};
use tracing::info;

use crate::engine::Engine;
use crate::error::{EngineError, Stage};
use crate::paginate::collect_all_pages;

impl Engine {
    /// The claims register header, updating the register from upstream if it
    /// has never been pulled.
    pub async fn claims_header(&self, case: &CaseHandle) -> Result<ClaimsHeader, EngineError> {
        self.materializer()
            .ensure_fresh(
                Lookup::ClaimsHeader,
                || self.store.get_claims_header(case),
                || async {
                    info!(case = %case, "updating claims register from upstream");
                    self.importer.update_claims(case).await
                },
            )
            .await
    }

    /// Every claim in the register, in store order.
    pub async fn claim_entries(&self, case: &CaseHandle) -> Result<Vec<ClaimEntry>, EngineError> {
        let page_size = self.config.claims_page_size;
        let sort_order = self.config.claims_sort_order;
        collect_all_pages(self.config.page_boundary, |page_number| async move {
            self.store
                .get_claims_page(case, page_number, page_size, sort_order)
                .await
                .map_err(|failure| EngineError::upstream(Lookup::ClaimsPage, Stage::Fetch, failure))
        })
        .await
    }

    /// Resolve the case, make sure its claims register has been pulled, and
    /// read the whole register.
    pub async fn claims_register(&self, case: &CaseHandle) -> Result<ClaimsRegister, EngineError> {
        let case_info = self.resolve_case(case).await?;
        let header = self.claims_header(case).await?;
        let entries = self.claim_entries(case).await?;
        info!(case = %case, claims = entries.len(), "claims register assembled");
        Ok(ClaimsRegister {
            case: case_info,
            header,
            entries,
        })
    }
}
