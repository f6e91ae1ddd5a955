//! Restaurant import from the map source
//!
//! One-shot merge keyed on exact (name, address):
//! - match → contact data, category and position are refreshed
//! - no match → inserted, owned by the configured sync account
//!
//! A failing record is logged and skipped; the run continues.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::application::config::{CatalogConfig, PREVIEW_SHOWN};
use crate::domain::entity::{Restaurant, SyncCandidate, SyncReport};
use crate::domain::repository::{RestaurantRepository, RestaurantSource, SyncRepository};
use crate::error::{CatalogError, CatalogResult};

/// Candidates fetched without touching the store
#[derive(Debug, Clone)]
pub struct SyncPreview {
    pub count: usize,
    pub shown: Vec<SyncCandidate>,
}

enum Merge {
    Created,
    Updated,
}

pub struct SyncRestaurantsUseCase<R, S>
where
    R: RestaurantRepository + SyncRepository,
    S: RestaurantSource,
{
    repo: Arc<R>,
    source: Arc<S>,
    config: Arc<CatalogConfig>,
}

impl<R, S> SyncRestaurantsUseCase<R, S>
where
    R: RestaurantRepository + SyncRepository,
    S: RestaurantSource,
{
    pub fn new(repo: Arc<R>, source: Arc<S>, config: Arc<CatalogConfig>) -> Self {
        Self {
            repo,
            source,
            config,
        }
    }

    pub async fn execute(&self) -> CatalogResult<SyncReport> {
        tracing::info!(limit = self.config.sync_limit, "Starting restaurant sync");

        let candidates = self.source.fetch(self.config.sync_limit).await?;
        if candidates.is_empty() {
            return Err(CatalogError::NothingFound {
                area: self.config.area_name.clone(),
            });
        }
        tracing::info!(found = candidates.len(), "Fetched restaurant candidates");

        let owner_id = self
            .repo
            .find_user_id_by_user_name(&self.config.sync_owner)
            .await?
            .ok_or_else(|| CatalogError::SyncOwnerMissing {
                user_name: self.config.sync_owner.clone(),
            })?;

        let mut report = SyncReport {
            total_found: candidates.len(),
            ..Default::default()
        };

        for candidate in &candidates {
            match self.merge(candidate, owner_id).await {
                Ok(Merge::Created) => {
                    report.created += 1;
                    tracing::debug!(name = %candidate.name, "Created restaurant");
                }
                Ok(Merge::Updated) => {
                    report.updated += 1;
                    tracing::debug!(name = %candidate.name, "Updated restaurant");
                }
                Err(e) => {
                    tracing::warn!(
                        name = %candidate.name,
                        source_id = %candidate.source_id,
                        error = %e,
                        "Skipping restaurant that failed to sync"
                    );
                }
            }
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            total_found = report.total_found,
            "Restaurant sync completed"
        );
        Ok(report)
    }

    async fn merge(
        &self,
        candidate: &SyncCandidate,
        owner_id: UserId,
    ) -> CatalogResult<Merge> {
        let existing = self
            .repo
            .find_by_name_and_address(&candidate.name, &candidate.address)
            .await?;

        match existing {
            Some(restaurant_id) => {
                self.repo
                    .refresh_from_source(restaurant_id, candidate, Utc::now())
                    .await?;
                Ok(Merge::Updated)
            }
            None => {
                self.repo
                    .create(&Restaurant::import(candidate, owner_id))
                    .await?;
                Ok(Merge::Created)
            }
        }
    }

    /// Fetch `limit` candidates and return the first few; nothing is stored
    pub async fn preview(&self, limit: u32) -> CatalogResult<SyncPreview> {
        tracing::info!(limit, "Previewing restaurants from map source");

        let mut candidates = self.source.fetch(limit).await?;
        let count = candidates.len();
        candidates.truncate(PREVIEW_SHOWN);

        Ok(SyncPreview {
            count,
            shown: candidates,
        })
    }

    /// Remove every restaurant from the store
    pub async fn purge(&self) -> CatalogResult<u64> {
        let deleted = self.repo.delete_all().await?;
        tracing::warn!(deleted, "Deleted all restaurants");
        Ok(deleted)
    }
}
