// src/pipeline/batches.rs

//! Activity batch fetcher.
//!
//! Pages through the per-character activity history endpoint, 250 records at
//! a time, until the API answers a page without an activity list. The full
//! batch list persists through the cache newest-first (fetch order) and is
//! reversed on the way out so callers see the oldest batch first.

use log::info;

use crate::error::Result;
use crate::models::{ActivityBatch, ActivityPage, PlayerIdentity, ProfileCharacters};
use crate::services::ApiTransport;
use crate::storage::CacheStore;

/// Safety bound against an endpoint that never reports an end of history.
const MAX_PAGES_PER_CHARACTER: usize = 500;

/// Activity history page size, the API maximum.
const PAGE_SIZE: usize = 250;

/// Fetch (or load from cache) all activity batches for a player, ordered
/// oldest batch first.
pub async fn fetch_activity_batches(
    api: &dyn ApiTransport,
    cache: &CacheStore,
    player: &PlayerIdentity,
    requery: bool,
) -> Result<Vec<ActivityBatch>> {
    let key = format!("activities_{}.json", player.display_name);

    let batches: Vec<ActivityBatch> = cache
        .load_or_compute(&key, "activity batches", requery, || {
            collect_batches(api, player)
        })
        .await?;

    // persisted newest-first, consumed oldest-first
    Ok(batches.into_iter().rev().collect())
}

async fn collect_batches(
    api: &dyn ApiTransport,
    player: &PlayerIdentity,
) -> Result<Vec<ActivityBatch>> {
    let profile = api
        .get(&format!(
            "/Destiny2/{}/Profile/{}/?components=200",
            player.membership_type, player.membership_id
        ))
        .await?;
    let profile: ProfileCharacters = serde_json::from_value(profile)?;

    let mut batches = Vec::new();

    for (character_id, character) in &profile.characters.data {
        let class = character.class_type;
        info!("Requesting activities for character with ID {character_id} ({class})");

        for page in 0..MAX_PAGES_PER_CHARACTER {
            let response = api
                .get(&format!(
                    "/Destiny2/{}/Account/{}/Character/{}/Stats/Activities/?mode=0&count={}&page={}",
                    player.membership_type,
                    player.membership_id,
                    character_id,
                    PAGE_SIZE,
                    page
                ))
                .await?;

            let page_data: ActivityPage = serde_json::from_value(response)?;
            let Some(records) = page_data.activities else {
                info!("Loaded data for {class}, {} batches total", batches.len());
                break;
            };
            if records.is_empty() {
                // the usual sentinel is a missing key, but an explicitly
                // empty page also means the history is exhausted
                info!("Loaded data for {class}, {} batches total", batches.len());
                break;
            }

            let batch = ActivityBatch::from_page(class, records)?;
            info!(
                "Requested {class} activity page {page}, ranging from {} to {}",
                batch.from.to_rfc3339(),
                batch.to.to_rfc3339()
            );
            batches.push(batch);
        }
    }

    info!("Loaded data for all characters.");
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;

    /// Mock transport serving one character with a fixed set of pages.
    struct PagedApi {
        pages: Vec<Value>,
        calls: AtomicU32,
        log: Mutex<Vec<String>>,
    }

    impl PagedApi {
        fn new(pages: Vec<Value>) -> Self {
            Self {
                pages,
                calls: AtomicU32::new(0),
                log: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ApiTransport for PagedApi {
        async fn get(&self, endpoint: &str) -> crate::error::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(endpoint.to_string());

            if endpoint.contains("/Profile/") {
                return Ok(json!({
                    "characters": { "data": { "char-1": { "classType": 0 } } }
                }));
            }

            let page: usize = endpoint
                .rsplit("page=")
                .next()
                .unwrap()
                .parse()
                .unwrap();
            Ok(self.pages.get(page).cloned().unwrap_or(json!({})))
        }

        async fn post(&self, _endpoint: &str, _body: Value) -> crate::error::Result<Value> {
            unreachable!("batch fetcher never posts")
        }
    }

    fn page(periods: &[&str]) -> Value {
        let activities: Vec<Value> = periods
            .iter()
            .enumerate()
            .map(|(i, p)| {
                json!({
                    "period": p,
                    "activityDetails": { "instanceId": format!("{p}-{i}") }
                })
            })
            .collect();
        json!({ "activities": activities })
    }

    fn player() -> PlayerIdentity {
        PlayerIdentity {
            membership_id: "4611686018467260757".into(),
            membership_type: 3,
            display_name: "Tester".into(),
        }
    }

    #[tokio::test]
    async fn pagination_stops_at_empty_page_and_reverses() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheStore::new(tmp.path());
        // two non-empty pages, newest first within each, then the sentinel
        let api = PagedApi::new(vec![
            page(&["2020-02-10T00:00:00Z", "2020-02-01T00:00:00Z"]),
            page(&["2020-01-20T00:00:00Z", "2020-01-01T00:00:00Z"]),
        ]);

        let batches = fetch_activity_batches(&api, &cache, &player(), true)
            .await
            .unwrap();

        assert_eq!(batches.len(), 2);
        for batch in &batches {
            assert!(batch.from <= batch.to);
        }
        // reversed on read: oldest batch first
        assert!(batches[0].from < batches[1].from);
        assert_eq!(batches[0].from.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn cached_run_never_touches_the_transport() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheStore::new(tmp.path());
        let api = PagedApi::new(vec![page(&["2020-02-10T00:00:00Z"])]);

        let first = fetch_activity_batches(&api, &cache, &player(), true)
            .await
            .unwrap();
        let calls_after_first = api.calls.load(Ordering::SeqCst);

        let second = fetch_activity_batches(&api, &cache, &player(), false)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(api.calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn missing_cache_without_requery_fails() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheStore::new(tmp.path());
        let api = PagedApi::new(vec![]);

        let result = fetch_activity_batches(&api, &cache, &player(), false).await;
        assert!(matches!(result, Err(AppError::CacheMiss { .. })));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn requests_use_fixed_mode_and_page_size() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheStore::new(tmp.path());
        let api = PagedApi::new(vec![page(&["2020-02-10T00:00:00Z"])]);

        fetch_activity_batches(&api, &cache, &player(), true)
            .await
            .unwrap();

        let log = api.log.lock().unwrap();
        let history_call = log.iter().find(|e| e.contains("/Stats/Activities/")).unwrap();
        assert!(history_call.contains("mode=0"));
        assert!(history_call.contains("count=250"));
        assert!(history_call.contains("page=0"));
    }
}
