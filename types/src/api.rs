//! Request and response bodies for the portal HTTP surface.
//!
//! Field names follow the wire contract expected by the game clients
//! (camelCase on the reward endpoint).

use serde::{Deserialize, Serialize};

use crate::{Balances, GrantSet};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email, phone, or username; the first matching field wins.
    pub identifier: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectCharacterRequest {
    pub character_id: i64,
}

/// Game-session outcome as reported by the client. The victory flag is
/// advisory; the resolver re-checks it against the kill count.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequest {
    pub defeated_monsters: u32,
    pub victory: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResponse {
    pub success: bool,
    /// Whether any grant was persisted to the ledger.
    pub granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    /// Snacks rolled from kill-based packs.
    pub obtained_snack: GrantSet,
    /// Snacks rolled from victory-bonus packs.
    pub win_bonus: GrantSet,
    pub defeated_monsters: u32,
    pub kill_reward_packs: u32,
    pub victory_bonus: u32,
    /// Post-grant balances; present only when a non-zero grant was persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Balances>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_request_uses_wire_names() {
        let req: RewardRequest =
            serde_json::from_str(r#"{"defeatedMonsters": 12, "victory": true}"#).unwrap();
        assert_eq!(req.defeated_monsters, 12);
        assert!(req.victory);
    }

    #[test]
    fn skipped_response_omits_resources() {
        let resp = RewardResponse {
            success: true,
            granted: false,
            skipped: Some(true),
            obtained_snack: GrantSet::default(),
            win_bonus: GrantSet::default(),
            defeated_monsters: 0,
            kill_reward_packs: 0,
            victory_bonus: 0,
            resources: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["skipped"], true);
        assert!(json.get("resources").is_none());
        assert!(json.get("killRewardPacks").is_some());
    }
}
