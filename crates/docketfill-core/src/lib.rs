pub mod config;
pub mod failure;
pub mod records;
pub mod state;

pub use config::{EngineConfig, FanOutPolicy, PageBoundary};
pub use failure::{ErrorClassifier, FailureClass, Lookup, MarkerClassifier, UpstreamFailure};
pub use records::{
    CaseHandle, CaseInfo, ClaimEntry, ClaimsHeader, ClaimsRegister, DocketEntry, DocketFilter,
    DocumentLink, DocumentList, DocumentPart, PagedResult, PartRef, SortOrder,
};
pub use state::{Materializable, MaterializationState};
