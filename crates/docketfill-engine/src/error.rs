use std::fmt;

use docketfill_core::{Lookup, UpstreamFailure};
use thiserror::Error;

/// Where in a materialize cycle a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Materialize,
    Refetch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Materialize => "materialize",
            Self::Refetch => "refetch",
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required request field was missing. Raised before any upstream call.
    #[error("{0}")]
    Validation(String),

    #[error("{lookup} {stage} failed: {failure}")]
    Upstream {
        lookup: Lookup,
        stage: Stage,
        #[source]
        failure: UpstreamFailure,
    },

    #[error("{what} still unavailable after materialization")]
    Unmaterialized { what: String },

    /// The invocation environment gave up on the request.
    #[error("invocation aborted: {0}")]
    Aborted(String),
}

impl EngineError {
    pub fn upstream(lookup: Lookup, stage: Stage, failure: UpstreamFailure) -> Self {
        Self::Upstream {
            lookup,
            stage,
            failure,
        }
    }

    /// The underlying upstream payload, with status and body intact.
    pub fn failure(&self) -> Option<&UpstreamFailure> {
        match self {
            Self::Upstream { failure, .. } => Some(failure),
            _ => None,
        }
    }
}
