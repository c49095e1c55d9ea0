use chrono::{TimeDelta, Utc};
use sqlx::SqlitePool;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{mutators::JobMutator, selectors::JobSelector},
            images::ImageStore,
        },
        server::state::GetTxn,
    },
    prelude::{Result, bad_request},
};

#[derive(Debug, Default, PartialEq)]
pub struct JobStats {
    pub total: i64,
    pub per_category: Vec<(String, i64)>,
    pub oldest: Option<String>,
    pub newest: Option<String>,
}

impl JobStats {
    pub fn log(&self) {
        tracing::info!("total jobs in db: {}", self.total);
        for (category, count) in &self.per_category {
            tracing::info!("  {}: {}", category, count);
        }
        tracing::info!(
            "oldest job posted: {}, newest job posted: {}",
            self.oldest.as_deref().unwrap_or("-"),
            self.newest.as_deref().unwrap_or("-")
        );
    }
}

/// Deletes postings older than `days` days together with their images and
/// returns how many rows were removed.
pub async fn sweep(pool: &SqlitePool, images: &ImageStore, days: i64) -> Result<u64> {
    let cutoff = Some(days)
        .filter(|days| *days >= 1)
        .and_then(TimeDelta::try_days)
        .and_then(|retention| Utc::now().checked_sub_signed(retention))
        .ok_or_else(|| bad_request("ERR-CONF-001", format!("retention of {} days", days)))?;
    tracing::info!("removing jobs posted before {}", cutoff.to_rfc3339());

    let mut tx = pool.begin_write_txn().await?;
    let expired = JobSelector::new(&mut tx).posted_before(cutoff).await?;
    if expired.is_empty() {
        tracing::info!("no expired jobs to delete");
        return Ok(0);
    }
    tracing::info!("deleting {} expired job(s)", expired.len());
    let removed = JobMutator::new(&mut tx).delete_posted_before(cutoff).await?;
    tx.commit().await?;

    for key in expired.iter().filter_map(|job| job.image.as_deref()) {
        images.discard(key).await;
    }
    Ok(removed)
}

pub async fn statistics(pool: &SqlitePool) -> Result<JobStats> {
    let mut conn = pool.acquire().await?;
    let mut selector = JobSelector::new(&mut conn);
    let total = selector.count().await?;
    let per_category = selector.count_by_category().await?;
    let (oldest, newest) = selector.posted_on_range().await?;
    Ok(JobStats {
        total,
        per_category,
        oldest,
        newest,
    })
}
