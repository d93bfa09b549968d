// src/pipeline/roster.rs

//! Player resolution and clan roster retrieval.

use log::info;

use crate::error::{AppError, Result};
use crate::models::{
    ClanDetail, ClanMemberList, DestinyMembership, LinkedProfiles, PlayerIdentity,
    SearchByBungieName,
};
use crate::services::ApiTransport;
use crate::storage::CacheStore;

/// Resolve a `Name#1234` Bungie name to a membership identity.
pub async fn resolve_player(api: &dyn ApiTransport, bungie_name: &str) -> Result<PlayerIdentity> {
    let (display_name, display_name_code) = bungie_name
        .split_once('#')
        .ok_or_else(|| AppError::validation("Bungie name must be in Name#1234 form"))?;

    let request = SearchByBungieName {
        display_name: display_name.to_string(),
        display_name_code: display_name_code.to_string(),
    };

    let response = api
        .post(
            "/Destiny2/SearchDestinyPlayerByBungieName/-1/",
            serde_json::to_value(&request)?,
        )
        .await?;

    let memberships: Vec<DestinyMembership> = serde_json::from_value(response)?;
    let primary = memberships
        .into_iter()
        .next()
        .ok_or_else(|| AppError::validation(format!("no memberships found for {bungie_name}")))?;

    Ok(PlayerIdentity {
        membership_id: primary.membership_id,
        membership_type: primary.membership_type,
        display_name: display_name.to_string(),
    })
}

/// Fetch (or load from cache) the clan roster with every member's linked
/// profiles, skipping over the searched player's own membership.
pub async fn fetch_clan_members(
    api: &dyn ApiTransport,
    cache: &CacheStore,
    clan_id: &str,
    skip_membership_id: &str,
    requery: bool,
) -> Result<Vec<LinkedProfiles>> {
    let key = format!("clanmembers_{clan_id}_without_{skip_membership_id}.json");

    cache
        .load_or_compute(&key, "clan members", requery, || {
            collect_members(api, clan_id, skip_membership_id)
        })
        .await
}

async fn collect_members(
    api: &dyn ApiTransport,
    clan_id: &str,
    skip_membership_id: &str,
) -> Result<Vec<LinkedProfiles>> {
    let detail = api.get(&format!("/GroupV2/{clan_id}/")).await?;
    let detail: ClanDetail = serde_json::from_value(detail)?;
    info!("Loading clan member details for {}", detail.detail.name);

    let members = api.get(&format!("/GroupV2/{clan_id}/Members/")).await?;
    let members: ClanMemberList = serde_json::from_value(members)?;

    let mut profiles = Vec::new();

    for member in members.results {
        let info = member.destiny_user_info;
        if info.membership_id == skip_membership_id {
            info!("Skipping {}...", info.membership_id);
            continue;
        }

        info!("Requesting data of clanmember ID {}", info.membership_id);
        let linked = api
            .get(&format!(
                "/Destiny2/{}/Profile/{}/LinkedProfiles/?getAllMemberships=true",
                info.membership_type, info.membership_id
            ))
            .await?;
        profiles.push(serde_json::from_value(linked)?);
    }

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::*;

    struct RosterApi {
        log: Mutex<Vec<String>>,
    }

    impl RosterApi {
        fn new() -> Self {
            Self {
                log: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ApiTransport for RosterApi {
        async fn get(&self, endpoint: &str) -> crate::error::Result<Value> {
            self.log.lock().unwrap().push(endpoint.to_string());

            if endpoint == "/GroupV2/999/" {
                return Ok(json!({ "detail": { "name": "Test Clan" } }));
            }
            if endpoint == "/GroupV2/999/Members/" {
                return Ok(json!({
                    "results": [
                        { "destinyUserInfo": { "membershipId": "1", "membershipType": 3 } },
                        { "destinyUserInfo": { "membershipId": "2", "membershipType": 2 } }
                    ]
                }));
            }
            if endpoint.contains("/LinkedProfiles/") {
                return Ok(json!({
                    "profiles": [{ "membershipId": "2", "membershipType": 2, "displayName": "Mate" }]
                }));
            }
            panic!("unexpected endpoint {endpoint}");
        }

        async fn post(&self, _endpoint: &str, body: Value) -> crate::error::Result<Value> {
            assert_eq!(body["displayName"], "Guardian");
            assert_eq!(body["displayNameCode"], "1234");
            Ok(json!([
                { "membershipId": "42", "membershipType": 3, "displayName": "Guardian" }
            ]))
        }
    }

    #[tokio::test]
    async fn resolves_bungie_name_to_identity() {
        let api = RosterApi::new();
        let player = resolve_player(&api, "Guardian#1234").await.unwrap();
        assert_eq!(player.membership_id, "42");
        assert_eq!(player.membership_type, 3);
        assert_eq!(player.display_name, "Guardian");
    }

    #[tokio::test]
    async fn rejects_name_without_code() {
        let api = RosterApi::new();
        let result = resolve_player(&api, "Guardian").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn roster_skips_the_searched_player() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheStore::new(tmp.path());
        let api = RosterApi::new();

        let members = fetch_clan_members(&api, &cache, "999", "1", true)
            .await
            .unwrap();

        // member "1" skipped, only member "2" expanded
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].profiles[0].membership_id, "2");

        let log = api.log.lock().unwrap();
        let linked_calls: Vec<_> = log
            .iter()
            .filter(|e| e.contains("/LinkedProfiles/"))
            .collect();
        assert_eq!(linked_calls.len(), 1);
        assert!(linked_calls[0].contains("/Profile/2/"));
    }

    #[tokio::test]
    async fn roster_cache_key_names_clan_and_skipped_player() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheStore::new(tmp.path());
        let api = RosterApi::new();

        fetch_clan_members(&api, &cache, "999", "1", true)
            .await
            .unwrap();

        assert!(cache.path("clanmembers_999_without_1.json").exists());
    }
}
