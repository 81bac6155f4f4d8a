use docketfill_core::{CaseHandle, CaseInfo, Lookup};
use tracing::info;

use crate::engine::Engine;
use crate::error::EngineError;

impl Engine {
    /// Look up a case, importing it from upstream if the record store has
    /// never seen it.
    pub async fn resolve_case(&self, case: &CaseHandle) -> Result<CaseInfo, EngineError> {
        let info = self
            .materializer()
            .ensure_fresh(
                Lookup::Case,
                || self.store.get_case(case),
                || async {
                    info!(case = %case, "importing case from upstream");
                    self.importer.import_case(case).await
                },
            )
            .await?;
        info!(case = %case, title = info.title.as_deref().unwrap_or(""), "case resolved");
        Ok(info)
    }
}
