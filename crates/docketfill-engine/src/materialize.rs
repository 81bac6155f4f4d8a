//! The "ensure present" protocol.
//!
//! Read from the record store; if the resource is absent or stale, run one
//! upstream materialization and read again. At most one materialize-and-refetch
//! cycle happens per call: each materialization may be billed, so a resource
//! that needs more than one update pass comes back as whatever the second read
//! returned.

use std::future::Future;

use docketfill_core::{
    ErrorClassifier, FailureClass, Lookup, Materializable, MaterializationState, UpstreamFailure,
};
use tracing::{debug, info, warn};

use crate::error::{EngineError, Stage};

pub struct Materializer<'a> {
    classifier: &'a dyn ErrorClassifier,
}

impl<'a> Materializer<'a> {
    pub fn new(classifier: &'a dyn ErrorClassifier) -> Self {
        Self { classifier }
    }

    /// Fetch a resource, materializing it first if its content says it is not
    /// usable yet.
    pub async fn ensure_fresh<T, F, Fut, M, MFut>(
        &self,
        lookup: Lookup,
        fetch: F,
        materialize: M,
    ) -> Result<T, EngineError>
    where
        T: Materializable,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamFailure>>,
        M: FnOnce() -> MFut,
        MFut: Future<Output = Result<(), UpstreamFailure>>,
    {
        self.ensure_fresh_by(lookup, fetch, T::materialization_state, materialize)
            .await
    }

    /// Like [`ensure_fresh`](Self::ensure_fresh), with an explicit freshness
    /// test instead of the resource's own.
    pub async fn ensure_fresh_by<T, F, Fut, A, M, MFut>(
        &self,
        lookup: Lookup,
        fetch: F,
        assess: A,
        materialize: M,
    ) -> Result<T, EngineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamFailure>>,
        A: Fn(&T) -> MaterializationState,
        M: FnOnce() -> MFut,
        MFut: Future<Output = Result<(), UpstreamFailure>>,
    {
        self.cycle(lookup, fetch, assess, materialize)
            .await
            .map_err(|(stage, failure)| EngineError::upstream(lookup, stage, failure))
    }

    /// Like [`ensure_fresh`](Self::ensure_fresh), but a failure the classifier
    /// calls benign-empty, at any stage, yields `T::default()` instead of an
    /// error.
    pub async fn ensure_fresh_or_empty<T, F, Fut, M, MFut>(
        &self,
        lookup: Lookup,
        fetch: F,
        materialize: M,
    ) -> Result<T, EngineError>
    where
        T: Materializable + Default,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamFailure>>,
        M: FnOnce() -> MFut,
        MFut: Future<Output = Result<(), UpstreamFailure>>,
    {
        match self
            .cycle(lookup, fetch, T::materialization_state, materialize)
            .await
        {
            Ok(value) => Ok(value),
            Err((stage, failure)) => match self.classifier.classify(lookup, &failure) {
                FailureClass::BenignEmpty => {
                    warn!(
                        lookup = %lookup,
                        stage = %stage,
                        message = %failure.message,
                        "nothing available upstream, using empty result"
                    );
                    Ok(T::default())
                }
                _ => Err(EngineError::upstream(lookup, stage, failure)),
            },
        }
    }

    async fn cycle<T, F, Fut, A, M, MFut>(
        &self,
        lookup: Lookup,
        mut fetch: F,
        assess: A,
        materialize: M,
    ) -> Result<T, (Stage, UpstreamFailure)>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamFailure>>,
        A: Fn(&T) -> MaterializationState,
        M: FnOnce() -> MFut,
        MFut: Future<Output = Result<(), UpstreamFailure>>,
    {
        let state = match fetch().await {
            Ok(value) => match assess(&value) {
                MaterializationState::Fresh => {
                    debug!(lookup = %lookup, "record store copy is fresh");
                    return Ok(value);
                }
                state => state,
            },
            Err(failure) => match self.classifier.classify(lookup, &failure) {
                FailureClass::NotFound => MaterializationState::Absent,
                _ => return Err((Stage::Fetch, failure)),
            },
        };

        info!(lookup = %lookup, state = state.as_str(), "materializing from upstream");
        materialize()
            .await
            .map_err(|failure| (Stage::Materialize, failure))?;

        fetch().await.map_err(|failure| (Stage::Refetch, failure))
    }
}
