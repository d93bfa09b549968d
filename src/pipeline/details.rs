// src/pipeline/details.rs

//! Concurrent PGCR detail fetcher.
//!
//! Records are split into contiguous chunks of the configured width. All
//! requests of a chunk run concurrently and are joined as a unit; chunks are
//! strictly sequential. After a chunk resolves, its results are walked in
//! submission order and every server-declared throttle is slept on the
//! single control task before the next result. The effective connection
//! bound therefore equals the chunk width.

use std::time::Duration;

use futures::future::join_all;
use log::info;

use crate::error::Result;
use crate::models::{ActivityRecord, PgcrReport, PlayerIdentity};
use crate::services::DetailSource;
use crate::storage::CacheStore;

/// Fetch (or load from cache) the PGCR for every given activity, in
/// chunk-then-position order.
pub async fn fetch_activity_details(
    source: &dyn DetailSource,
    cache: &CacheStore,
    activities: &[ActivityRecord],
    player: &PlayerIdentity,
    width: usize,
    requery: bool,
) -> Result<Vec<PgcrReport>> {
    let key = format!("players_{}.json", player.display_name);

    cache
        .load_or_compute(&key, "activity details", requery, || {
            collect_details(source, activities, width)
        })
        .await
}

async fn collect_details(
    source: &dyn DetailSource,
    activities: &[ActivityRecord],
    width: usize,
) -> Result<Vec<PgcrReport>> {
    let width = width.max(1);
    let total = activities.len();
    let mut reports = Vec::with_capacity(total);

    info!("Requesting detailed PGCRs, this can take a while...");

    for chunk in activities.chunks(width) {
        let results = join_all(
            chunk
                .iter()
                .map(|activity| source.fetch(&activity.activity_details.instance_id)),
        )
        .await;

        // walk in submission order, not completion order
        for result in results {
            let detail = result?;
            reports.push(detail.report);

            if detail.throttle_seconds > 0 {
                info!(
                    "Sleeping {} seconds because the API told us to",
                    detail.throttle_seconds
                );
                tokio::time::sleep(Duration::from_secs(detail.throttle_seconds)).await;
                info!("Continuing.");
            }
        }

        let done = reports.len();
        info!(
            "Requested players for {} / {} activities ({:.2}%)",
            done,
            total,
            (done as f64 * 100.0) / total as f64
        );
    }

    info!("Finished loading PGCRs.");
    Ok(reports)
}
