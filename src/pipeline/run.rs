// src/pipeline/run.rs

//! Full pipeline orchestration.

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{
    batches::fetch_activity_batches, compare::report_shared_activities,
    details::fetch_activity_details, filters::filter_activities, filters::sort_by_period,
    roster::fetch_clan_members, roster::resolve_player,
};
use crate::services::{BungieClient, PgcrClient};
use crate::storage::CacheStore;

/// Run the full scan: resolve player, fetch roster, fetch and filter
/// activities, fetch PGCRs, report shared games.
pub async fn run_scan(config: &Config) -> Result<()> {
    config.validate()?;
    info!("Data folder is {}", config.data_dir.display());
    std::fs::create_dir_all(&config.data_dir)?;

    let cache = CacheStore::new(&config.data_dir);
    let api = BungieClient::new(config)?;

    let player = resolve_player(&api, &config.bungie_name).await?;

    let clanmates = fetch_clan_members(
        &api,
        &cache,
        &config.clan_id,
        &player.membership_id,
        config.requery.clanmates,
    )
    .await?;

    let batches = fetch_activity_batches(&api, &cache, &player, config.requery.activity_batches)
        .await?;

    // filtering only reduces the API calls below; it has no effect on a
    // cached detail document unless activity_details is requeried
    let records = filter_activities(batches, &config.filters)?;
    let records = sort_by_period(records)?;

    let pgcr = PgcrClient::new(config);
    let reports = fetch_activity_details(
        &pgcr,
        &cache,
        &records,
        &player,
        config.advanced.concurrency,
        config.requery.activity_details,
    )
    .await?;

    let matches = report_shared_activities(&reports, &clanmates, config.only_list_first_n);
    info!("Done. {matches} shared activities listed.");

    Ok(())
}
