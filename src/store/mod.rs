//! File-backed stores
//!
//! Owns the paths of the source, verified and proposal files together with a
//! read-through cache per file. Every save invalidates the cache it affects.

mod cache;
mod dataset;
mod files;

pub use dataset::{ProposalStore, SourceStore, VerifiedStore};

use cache::ReadThroughCache;
use files::{read_json_opt, write_json_atomic};

use crate::config::{StorageConfig, VerifiedFallback};
use crate::error::AppError;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct TranslationStores {
    source_path: PathBuf,
    verified_path: PathBuf,
    proposals_path: PathBuf,
    fallback: VerifiedFallback,
    source: ReadThroughCache<SourceStore>,
    verified: ReadThroughCache<VerifiedStore>,
    proposals: ReadThroughCache<ProposalStore>,
}

impl TranslationStores {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            source_path: config.source_path(),
            verified_path: config.verified_path(),
            proposals_path: config.proposals_path(),
            fallback: config.verified_fallback,
            source: ReadThroughCache::new(config.cache_ttl),
            verified: ReadThroughCache::new(config.cache_ttl),
            proposals: ReadThroughCache::new(config.cache_ttl),
        }
    }

    /// Source questions; a missing file is fatal
    pub async fn source(&self) -> Result<Arc<SourceStore>, AppError> {
        self.source
            .get_or_load(|| async {
                let value: Value = read_json_opt(&self.source_path)
                    .await?
                    .ok_or_else(|| AppError::MissingSourceFile(self.source_path.clone()))?;
                let store = SourceStore::from_json(&self.source_path, value)?;
                debug!("Loaded {} source questions", store.len());
                Ok(store)
            })
            .await
    }

    /// Verified translations; a missing file yields fallback records
    pub async fn verified(&self, source: &SourceStore) -> Result<Arc<VerifiedStore>, AppError> {
        self.verified
            .get_or_load(|| async {
                match read_json_opt::<Value>(&self.verified_path).await? {
                    Some(value) => VerifiedStore::from_json(&self.verified_path, value, source.len()),
                    None => {
                        warn!(
                            "Verified file {} not found, serving {:?} fallback",
                            self.verified_path.display(),
                            self.fallback
                        );
                        Ok(VerifiedStore::fallback(source, self.fallback))
                    }
                }
            })
            .await
    }

    /// Pending proposals; a missing file is an empty store
    pub async fn proposals(&self, source: &SourceStore) -> Result<Arc<ProposalStore>, AppError> {
        self.proposals
            .get_or_load(|| async {
                match read_json_opt::<Value>(&self.proposals_path).await? {
                    Some(value) => ProposalStore::from_json(&self.proposals_path, value, source.len()),
                    None => {
                        debug!(
                            "Proposals file {} not found, starting empty",
                            self.proposals_path.display()
                        );
                        Ok(ProposalStore::default())
                    }
                }
            })
            .await
    }

    /// Forget cached verified and proposal data so the next read hits disk
    pub async fn invalidate(&self) {
        self.verified.invalidate().await;
        self.proposals.invalidate().await;
    }

    pub async fn save_verified(&self, store: &VerifiedStore) -> Result<(), AppError> {
        let result = write_json_atomic(&self.verified_path, store).await;
        self.verified.invalidate().await;
        result?;
        info!("Saved {} verified records", store.len());
        Ok(())
    }

    pub async fn save_proposals(&self, store: &ProposalStore) -> Result<(), AppError> {
        let result = write_json_atomic(&self.proposals_path, store).await;
        self.proposals.invalidate().await;
        result?;
        info!("Saved {} pending proposals", store.len());
        Ok(())
    }
}
