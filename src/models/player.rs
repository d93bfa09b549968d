// src/models/player.rs

//! Player, profile and clan roster data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::activity::CharacterClass;

/// Skips re-serializing fields that were absent and filled by `default`.
fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// The resolved identity of the searched player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Opaque membership identifier
    pub membership_id: String,

    /// Platform the identifier is scoped to
    pub membership_type: i32,

    /// Display name, used as the cache-file identifier
    pub display_name: String,
}

/// Request body for the Bungie-name search endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchByBungieName {
    pub display_name: String,
    pub display_name_code: String,
}

/// A membership card as embedded in rosters, profiles and PGCR entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DestinyMembership {
    pub membership_id: String,

    #[serde(default, skip_serializing_if = "is_default")]
    pub membership_type: i32,

    #[serde(default, skip_serializing_if = "is_default")]
    pub display_name: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Character summary from the profile endpoint (`components=200`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub class_type: CharacterClass,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterComponent {
    pub data: BTreeMap<String, CharacterSummary>,
}

/// Profile response carrying the character dictionary.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileCharacters {
    pub characters: CharacterComponent,
}

/// Clan detail, only the display name is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct ClanDetail {
    pub detail: ClanDetailInner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClanDetailInner {
    pub name: String,
}

/// Clan member listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ClanMemberList {
    pub results: Vec<ClanMember>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub destiny_user_info: DestinyMembership,
}

/// Linked-profile payload for one clan member, all platforms included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedProfiles {
    #[serde(default)]
    pub profiles: Vec<DestinyMembership>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_characters_decode() {
        let raw = serde_json::json!({
            "characters": {
                "data": {
                    "2305843009": { "classType": 2, "light": 1810 },
                    "2305843010": { "classType": 0 }
                }
            }
        });
        let profile: ProfileCharacters = serde_json::from_value(raw).unwrap();
        let classes: Vec<_> = profile
            .characters
            .data
            .values()
            .map(|c| c.class_type)
            .collect();
        assert_eq!(classes, vec![CharacterClass::Warlock, CharacterClass::Titan]);
    }

    #[test]
    fn linked_profiles_round_trip_unknown_fields() {
        let raw = serde_json::json!({
            "profiles": [
                { "membershipId": "42", "membershipType": 3, "displayName": "Someone", "isPublic": true }
            ],
            "bnetMembership": { "membershipId": "99" }
        });
        let parsed: LinkedProfiles = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.profiles[0].membership_id, "42");
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }
}
