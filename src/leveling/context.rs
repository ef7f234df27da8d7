//! Tags bound when rendering a level-up message.

use serde::{Deserialize, Serialize};

use crate::tags::{ObjectMap, Parser, Store, Value};

/// Message sent when a guild has not configured its own
pub const DEFAULT_LEVEL_UP_MESSAGE: &str =
    "GGs {user:mention}! You have leveled up to **Level {level}**.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpUser {
    pub id: String,
    pub mention: String,
    pub username: String,
    #[serde(rename = "avatarURL", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpServer {
    pub id: String,
    pub name: String,
    #[serde(rename = "iconURL", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    #[serde(rename = "memberCount")]
    pub member_count: u64,
}

/// Role granted for reaching the new level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpReward {
    pub id: String,
    pub name: String,
    pub mention: String,
}

/// Everything a level-up template can refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpContext {
    pub user: LevelUpUser,
    pub server: LevelUpServer,
    #[serde(default)]
    pub reward: Option<LevelUpReward>,
    pub level: u32,
}

impl LevelUpContext {
    pub fn old_level(&self) -> u32 {
        self.level.saturating_sub(1)
    }

    /// Named tags: `user`, `server`, `reward` (only when granted), `level`
    /// and `oldLevel`.
    pub fn to_store(&self) -> Store {
        let mut user = ObjectMap::new();
        user.insert("id".into(), Value::from(self.user.id.as_str()));
        user.insert("mention".into(), Value::from(self.user.mention.as_str()));
        user.insert("username".into(), Value::from(self.user.username.as_str()));
        if let Some(avatar_url) = &self.user.avatar_url {
            user.insert("avatarURL".into(), Value::from(avatar_url.as_str()));
        }

        let mut server = ObjectMap::new();
        server.insert("id".into(), Value::from(self.server.id.as_str()));
        server.insert("name".into(), Value::from(self.server.name.as_str()));
        if let Some(icon_url) = &self.server.icon_url {
            server.insert("iconURL".into(), Value::from(icon_url.as_str()));
        }
        server.insert("ownerID".into(), Value::from(self.server.owner_id.as_str()));
        server.insert("memberCount".into(), Value::from(self.server.member_count));

        let mut store = Store::from_named([
            ("user", Value::Object(user)),
            ("server", Value::Object(server)),
        ]);

        if let Some(reward) = &self.reward {
            let mut map = ObjectMap::new();
            map.insert("id".into(), Value::from(reward.id.as_str()));
            map.insert("name".into(), Value::from(reward.name.as_str()));
            map.insert("mention".into(), Value::from(reward.mention.as_str()));
            store.set("reward", Value::Object(map));
        }

        store.set("level", self.level);
        store.set("oldLevel", self.old_level());
        store
    }
}

/// Render a level-up message, falling back to [`DEFAULT_LEVEL_UP_MESSAGE`]
/// when no template is configured.
pub fn render_level_up(parser: &Parser, template: Option<&str>, context: &LevelUpContext) -> String {
    let template = template
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_LEVEL_UP_MESSAGE);

    let mut store = context.to_store();
    parser.parse_with_store(template, &mut store)
}
