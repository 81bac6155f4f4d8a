//! Materialization state of record-store resources.
//!
//! The record store never says outright whether a resource has been pulled
//! from upstream. Each resource type signals it differently (a null header,
//! an empty part list, an empty descriptor), so the test lives here in one
//! place and the engine only ever sees the tri-state result.

use crate::records::{CaseInfo, ClaimsHeader, DocumentList, DocumentPart};

/// Whether a resource read from the record store is usable as-is.
///
/// Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializationState {
    /// Not in the record store at all.
    Absent,
    /// Present but not yet populated from upstream.
    Stale,
    /// Usable as-is.
    Fresh,
}

impl MaterializationState {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Stale => "stale",
            Self::Fresh => "fresh",
        }
    }
}

/// A record-store resource whose freshness can be read off its content.
pub trait Materializable {
    fn materialization_state(&self) -> MaterializationState;
}

/// A case that could be read is usable; an unknown case surfaces as a
/// lookup failure instead.
impl Materializable for CaseInfo {
    fn materialization_state(&self) -> MaterializationState {
        MaterializationState::Fresh
    }
}

impl Materializable for ClaimsHeader {
    fn materialization_state(&self) -> MaterializationState {
        if self.html.is_none() {
            MaterializationState::Stale
        } else {
            MaterializationState::Fresh
        }
    }
}

impl Materializable for DocumentList {
    fn materialization_state(&self) -> MaterializationState {
        if self.parts.is_empty() {
            MaterializationState::Stale
        } else {
            MaterializationState::Fresh
        }
    }
}

impl Materializable for DocumentPart {
    fn materialization_state(&self) -> MaterializationState {
        if self.is_empty() {
            MaterializationState::Absent
        } else {
            MaterializationState::Fresh
        }
    }
}
