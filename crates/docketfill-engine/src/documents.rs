use docketfill_core::{
    CaseHandle, DocketEntry, DocketFilter, DocumentLink, DocumentList, Lookup,
};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::error::{EngineError, Stage};
use crate::fanout::{fan_out, for_each_sequential};
use crate::paginate::collect_all_pages;

impl Engine {
    /// Pull the case's docket sheet from upstream. Billed on every call.
    pub async fn update_dockets(&self, case: &CaseHandle) -> Result<(), EngineError> {
        info!(case = %case, "updating dockets from upstream");
        self.importer
            .update_dockets(case)
            .await
            .map_err(|failure| EngineError::upstream(Lookup::DocketUpdate, Stage::Materialize, failure))
    }

    /// Every docket entry matching `filter`, in store order.
    pub async fn docket_entries(
        &self,
        case: &CaseHandle,
        filter: &DocketFilter,
    ) -> Result<Vec<DocketEntry>, EngineError> {
        let page_size = self.config.docket_page_size;
        collect_all_pages(self.config.page_boundary, |page_number| async move {
            self.store
                .get_docket_page(case, filter, page_number, page_size)
                .await
                .map_err(|failure| EngineError::upstream(Lookup::DocketPage, Stage::Fetch, failure))
        })
        .await
    }

    /// The document parts of one docket entry, updating the entry's document
    /// list from upstream if the store has none. An entry upstream has no
    /// documents for yields an empty list.
    pub async fn document_list(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
    ) -> Result<DocumentList, EngineError> {
        self.materializer()
            .ensure_fresh_or_empty(
                Lookup::DocumentList,
                || self.store.get_document_list(case, docket_seq),
                || async {
                    info!(case = %case, docket_seq, "updating document list from upstream");
                    self.importer.update_document_list(case, docket_seq).await
                },
            )
            .await
    }

    /// One document part, purchasing it first if the store only holds an
    /// empty descriptor.
    pub async fn document_part(
        &self,
        case: &CaseHandle,
        docket_seq: &str,
        part_number: u32,
    ) -> Result<DocumentLink, EngineError> {
        let part = self
            .materializer()
            .ensure_fresh(
                Lookup::DocumentPart,
                || self.store.get_document_part(case, docket_seq, part_number),
                || async {
                    info!(case = %case, docket_seq, part_number, "purchasing document part");
                    self.importer
                        .purchase_document_part(case, docket_seq, part_number)
                        .await
                },
            )
            .await?;

        let Some(download_url) = part.download_url else {
            return Err(EngineError::Unmaterialized {
                what: format!("{case} docket {docket_seq} part {part_number}"),
            });
        };
        // Unnamed parts are named after the case and docket position.
        let filename = part.friendly_name.unwrap_or_else(|| {
            format!(
                "{}-{}-{docket_seq}-{part_number}.pdf",
                case.court, case.case_number
            )
        });
        Ok(DocumentLink {
            filename,
            download_url,
        })
    }

    /// Every purchased document of one docket entry, in part order.
    pub async fn entry_documents(
        &self,
        case: &CaseHandle,
        entry: &DocketEntry,
    ) -> Result<Vec<DocumentLink>, EngineError> {
        let docket_seq = entry.sequence_id.as_str();
        let list = self.document_list(case, docket_seq).await?;
        debug!(case = %case, docket_seq, parts = list.parts.len(), "processing docket entry");
        for_each_sequential(list.parts.iter().map(|part| part.number), |part_number| {
            self.document_part(case, docket_seq, part_number)
        })
        .await
    }

    /// Resolve the case, update its dockets, and buy every document attached
    /// to a docket entry matching `filter`.
    ///
    /// Results are in docket order, then part order. Any fatal failure aborts
    /// the whole search; there is no partial result.
    pub async fn find_documents(
        &self,
        case: &CaseHandle,
        filter: &DocketFilter,
    ) -> Result<Vec<DocumentLink>, EngineError> {
        self.resolve_case(case).await?;
        self.update_dockets(case).await?;

        let entries = self.docket_entries(case, filter).await?;
        info!(case = %case, entries = entries.len(), "matched docket entries");

        let per_entry = fan_out(self.config.fan_out, &entries, |entry| {
            self.entry_documents(case, entry)
        })
        .await?;

        let documents: Vec<DocumentLink> = per_entry.into_iter().flatten().collect();
        info!(case = %case, documents = documents.len(), "document search complete");
        Ok(documents)
    }
}
