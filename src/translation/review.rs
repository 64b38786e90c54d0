//! Review queue and resolution
//!
//! Pure operations on in-memory stores. Persisting the result is the desk's job.

use crate::error::AppError;
use crate::models::QuestionRecord;
use crate::store::{ProposalStore, VerifiedStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    /// Promote the proposal (or an edited version of it) to the verified store
    #[serde(alias = "accept")]
    Commit,
    /// Discard the proposal
    Reject,
}

impl std::fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewAction::Commit => write!(f, "commit"),
            ReviewAction::Reject => write!(f, "reject"),
        }
    }
}

/// Smallest index with a pending proposal
pub fn next_pending(proposals: &ProposalStore) -> Option<usize> {
    proposals.pending_indices().first().copied()
}

/// What a resolution changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the verified store was modified and must be saved
    pub verified_changed: bool,
    /// The proposal that was removed
    pub removed: QuestionRecord,
}

/// Apply `action` for `index` to the in-memory stores.
///
/// On commit the verified record becomes `edited` when given, else the
/// proposal itself. Both actions remove the proposal. Fails without touching
/// anything when `index` has no pending proposal.
pub fn resolve(
    verified: &mut VerifiedStore,
    proposals: &mut ProposalStore,
    index: usize,
    action: ReviewAction,
    edited: Option<QuestionRecord>,
) -> Result<Resolution, AppError> {
    let removed = proposals
        .remove(index)
        .ok_or(AppError::ProposalNotFound(index))?;

    let verified_changed = match action {
        ReviewAction::Commit => {
            let final_record = edited.unwrap_or_else(|| removed.clone());
            verified.set(index, final_record);
            true
        }
        ReviewAction::Reject => false,
    };

    Ok(Resolution {
        verified_changed,
        removed,
    })
}
