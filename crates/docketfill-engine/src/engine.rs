use std::sync::Arc;

use docketfill_core::{EngineConfig, ErrorClassifier, MarkerClassifier};

use crate::materialize::Materializer;
use crate::ports::{Importer, RecordStore};

/// Case-record retrieval over a cached record store, filling gaps from
/// upstream on demand.
///
/// Holds no state of its own between calls; every record it returns is read
/// fresh from the store. Store and importer calls within one request are
/// issued one after another unless the configured fan-out allows more.
pub struct Engine {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) importer: Arc<dyn Importer>,
    pub(crate) classifier: Arc<dyn ErrorClassifier>,
    pub(crate) config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default marker classifier and configuration.
    pub fn new(store: Arc<dyn RecordStore>, importer: Arc<dyn Importer>) -> Self {
        Self {
            store,
            importer,
            classifier: Arc::new(MarkerClassifier::default()),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn materializer(&self) -> Materializer<'_> {
        Materializer::new(self.classifier.as_ref())
    }
}
