//! Translation desk
//!
//! Entry point for both workflows: community submission and admin review.
//! Every read-modify-write runs under one lock so operations from this
//! process never interleave; writers in other processes still race with
//! last-writer-wins semantics.

use crate::error::AppError;
use crate::models::QuestionRecord;
use crate::store::{ProposalStore, SourceStore, TranslationStores, VerifiedStore};
use crate::translation::review::{self, ReviewAction};
use crate::translation::session::{CursorStep, Direction, SubmissionCursor};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Everything a submitter needs to translate one question
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub cursor: SubmissionCursor,
    pub position: usize,
    pub progress: f64,
    pub source: QuestionRecord,
    pub verified: QuestionRecord,
    /// Existing proposal if any, else the verified record
    pub draft: QuestionRecord,
    pub has_proposal: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub index: usize,
    /// True when an earlier proposal for the same index was overwritten
    pub replaced: bool,
    #[serde(flatten)]
    pub step: CursorStep,
}

/// One pending proposal next to its source and current verified records
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub index: usize,
    pub position: usize,
    pub total: usize,
    pub remaining: usize,
    pub source: QuestionRecord,
    pub verified: QuestionRecord,
    pub proposal: QuestionRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQueue {
    pub pending: Vec<usize>,
    pub remaining: usize,
    /// Smallest pending index; `None` means nothing is waiting for review
    pub current: Option<ReviewItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutcome {
    pub index: usize,
    pub action: ReviewAction,
    /// Record live in the verified store after the resolution
    pub verified: QuestionRecord,
    pub remaining: usize,
    pub resolved_at: DateTime<Utc>,
}

pub struct TranslationDesk {
    stores: TranslationStores,
    write_lock: Mutex<()>,
}

impl TranslationDesk {
    pub fn new(stores: TranslationStores) -> Self {
        Self {
            stores,
            write_lock: Mutex::new(()),
        }
    }

    /// Number of source questions; fails if the source file is missing
    pub async fn question_count(&self) -> Result<usize, AppError> {
        Ok(self.stores.source().await?.len())
    }

    pub async fn submission_view(&self, index: usize) -> Result<SubmissionView, AppError> {
        let source = self.stores.source().await?;
        let cursor = SubmissionCursor::new(index, source.len())?;
        let verified = self.stores.verified(&source).await?;
        let proposals = self.stores.proposals(&source).await?;

        let verified_record = verified
            .get(index)
            .cloned()
            .unwrap_or_else(QuestionRecord::placeholder);
        let proposal = proposals.get(index).cloned();

        Ok(SubmissionView {
            cursor,
            position: cursor.position(),
            progress: cursor.progress(),
            source: source.get(index)?.clone(),
            has_proposal: proposal.is_some(),
            draft: proposal.unwrap_or_else(|| verified_record.clone()),
            verified: verified_record,
        })
    }

    /// Move the cursor without touching any store
    pub async fn navigate(&self, index: usize, direction: Direction) -> Result<SubmissionCursor, AppError> {
        let total = self.question_count().await?;
        Ok(SubmissionCursor::new(index, total)?.step(direction))
    }

    /// Store `record` as the proposal for `index` and advance the cursor
    pub async fn submit_proposal(&self, index: usize, record: QuestionRecord) -> Result<SubmitOutcome, AppError> {
        let _guard = self.write_lock.lock().await;
        self.stores.invalidate().await;

        let source = self.stores.source().await?;
        let cursor = SubmissionCursor::new(index, source.len())?;

        let mut proposals = (*self.stores.proposals(&source).await?).clone();
        let replaced = proposals.insert(index, record).is_some();
        self.stores.save_proposals(&proposals).await?;

        let step = cursor.advance();
        info!(
            "Proposal stored for question #{} ({}){}",
            cursor.position(),
            if replaced { "replaced" } else { "new" },
            if step.completed { ", end of question list reached" } else { "" }
        );

        Ok(SubmitOutcome { index, replaced, step })
    }

    pub async fn review_queue(&self) -> Result<ReviewQueue, AppError> {
        let source = self.stores.source().await?;
        let verified = self.stores.verified(&source).await?;
        let proposals = self.stores.proposals(&source).await?;
        if proposals.is_empty() {
            debug!("No proposals pending review");
        }
        let pending = proposals.pending_indices();

        // Same snapshot as `pending`
        let current = match review::next_pending(&proposals) {
            Some(index) => Some(review_item_from(&source, &verified, &proposals, index)?),
            None => None,
        };

        Ok(ReviewQueue {
            remaining: pending.len(),
            pending,
            current,
        })
    }

    pub async fn review_item(&self, index: usize) -> Result<ReviewItem, AppError> {
        let source = self.stores.source().await?;
        source.check_index(index)?;
        let verified = self.stores.verified(&source).await?;
        let proposals = self.stores.proposals(&source).await?;
        review_item_from(&source, &verified, &proposals, index)
    }

    /// Commit or reject the pending proposal for `index`.
    ///
    /// The verified file is written before the proposal is removed, so a
    /// crash in between leaves the proposal pending and a retry reapplies
    /// the same commit.
    pub async fn resolve_proposal(
        &self,
        index: usize,
        action: ReviewAction,
        record: Option<QuestionRecord>,
    ) -> Result<ResolveOutcome, AppError> {
        let _guard = self.write_lock.lock().await;
        self.stores.invalidate().await;

        let source = self.stores.source().await?;
        source.check_index(index)?;

        let mut verified = (*self.stores.verified(&source).await?).clone();
        let mut proposals = (*self.stores.proposals(&source).await?).clone();

        let resolution = review::resolve(&mut verified, &mut proposals, index, action, record)?;
        debug!("Removed proposal for #{}: {:?}", index + 1, resolution.removed.question);
        if resolution.verified_changed {
            self.stores.save_verified(&verified).await?;
        }
        self.stores.save_proposals(&proposals).await?;

        info!(
            "Proposal for question #{} resolved with {} ({} pending)",
            index + 1,
            action,
            proposals.len()
        );

        Ok(ResolveOutcome {
            index,
            action,
            verified: verified
                .get(index)
                .cloned()
                .unwrap_or_else(QuestionRecord::placeholder),
            remaining: proposals.len(),
            resolved_at: Utc::now(),
        })
    }
}

fn review_item_from(
    source: &SourceStore,
    verified: &VerifiedStore,
    proposals: &ProposalStore,
    index: usize,
) -> Result<ReviewItem, AppError> {
    let proposal = proposals
        .get(index)
        .cloned()
        .ok_or(AppError::ProposalNotFound(index))?;

    Ok(ReviewItem {
        index,
        position: index + 1,
        total: source.len(),
        remaining: proposals.len(),
        source: source.get(index)?.clone(),
        verified: verified
            .get(index)
            .cloned()
            .unwrap_or_else(QuestionRecord::placeholder),
        proposal,
    })
}
