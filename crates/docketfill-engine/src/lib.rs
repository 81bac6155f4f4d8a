//! Case-record retrieval engine: lazy materialization from upstream, page
//! aggregation, and per-item fan-out over a cached record store.

mod case;
mod claims;
mod documents;
mod engine;
mod error;
pub mod fanout;
pub mod materialize;
pub mod paginate;
pub mod ports;
pub mod request;

#[cfg(test)]
mod testing;

pub use engine::Engine;
pub use error::{EngineError, Stage};
pub use ports::{Importer, RecordStore};
pub use request::{ClaimsRequest, DocumentsRequest, Operation, Response};
