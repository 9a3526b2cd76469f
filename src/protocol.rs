use crate::game::types::{CollisionType, Direction, Player, TrailSegment};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "join")]
  Join {
    #[serde(default, deserialize_with = "lenient_string")]
    username: Option<String>,
  },
  #[serde(rename = "move")]
  Move(MoveUpdate),
  #[serde(rename = "killPlayer")]
  KillPlayer(KillClaim),
  #[serde(rename = "requestPlayerData")]
  RequestPlayerData {
    #[serde(rename = "playerId")]
    player_id: String,
  },
}

/// Client position report. A client-sent `trail` is accepted on the wire but
/// never read: trails are recorded server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveUpdate {
  pub x: f64,
  pub y: f64,
  #[serde(default, deserialize_with = "lenient_direction")]
  pub direction: Option<Direction>,
  #[serde(default, rename = "isMoving")]
  pub is_moving: Option<bool>,
  #[serde(default, rename = "invincibleUntil")]
  pub invincible_until: Option<f64>,
}

/// A client's report that it died. Every field is optional and wrongly typed
/// values read as absent, so a malformed claim still reaches the resolver.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KillClaim {
  #[serde(default, rename = "killedBy", deserialize_with = "lenient_string")]
  pub killed_by: Option<String>,
  #[serde(default, rename = "killerUsername", deserialize_with = "lenient_string")]
  pub killer_username: Option<String>,
  #[serde(default, rename = "collisionType", deserialize_with = "lenient_collision")]
  pub collision_type: CollisionType,
  #[serde(default, rename = "isSelfKill", deserialize_with = "lenient_bool")]
  pub is_self_kill: bool,
  #[serde(default, rename = "selfKill", deserialize_with = "lenient_bool")]
  pub self_kill: bool,
  #[serde(default, rename = "isSuicide", deserialize_with = "lenient_bool")]
  pub is_suicide: bool,
  #[serde(default, rename = "killedSelf", deserialize_with = "lenient_bool")]
  pub killed_self: bool,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(match value {
    Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
    _ => None,
  })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(matches!(value, Some(Value::Bool(true))))
}

fn lenient_direction<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Direction>, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

fn lenient_collision<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CollisionType, D::Error> {
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value
    .and_then(|value| serde_json::from_value(value).ok())
    .unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "init")]
  Init(Player),
  #[serde(rename = "existingPlayers")]
  ExistingPlayers { players: Vec<Player> },
  #[serde(rename = "playerJoined")]
  PlayerJoined(Player),
  #[serde(rename = "playerMoved")]
  PlayerMoved(PlayerDelta),
  #[serde(rename = "playerDied")]
  PlayerDied {
    id: String,
    username: String,
    #[serde(rename = "deathType")]
    death_type: CollisionType,
  },
  #[serde(rename = "selfRespawn")]
  SelfRespawn {
    x: f64,
    y: f64,
    #[serde(rename = "invincibleUntil")]
    invincible_until: i64,
  },
  #[serde(rename = "serverRespawn")]
  ServerRespawn {
    id: String,
    x: f64,
    y: f64,
    #[serde(rename = "invincibleUntil")]
    invincible_until: i64,
  },
  #[serde(rename = "scoreUpdated")]
  ScoreUpdated(ScoreUpdate),
  #[serde(rename = "playerLeft")]
  PlayerLeft { id: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDelta {
  pub id: String,
  pub x: f64,
  pub y: f64,
  pub direction: Direction,
  #[serde(rename = "isMoving")]
  pub is_moving: bool,
  #[serde(rename = "invincibleUntil")]
  pub invincible_until: i64,
  pub trail: Vec<TrailSegment>,
}

impl PlayerDelta {
  pub fn from_player(player: &Player) -> Self {
    Self {
      id: player.id.clone(),
      x: player.x,
      y: player.y,
      direction: player.direction,
      is_moving: player.is_moving,
      invincible_until: player.invincible_until,
      trail: player.trail.iter().copied().collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreUpdate {
  pub id: String,
  pub score: u32,
  pub username: String,
  #[serde(rename = "killedUsername")]
  pub killed_username: String,
  #[serde(rename = "deathType")]
  pub death_type: CollisionType,
  #[serde(rename = "isSelfKill")]
  pub is_self_kill: bool,
}

pub fn decode_client_message(text: &str) -> Result<ClientMessage, serde_json::Error> {
  serde_json::from_str(text)
}

pub fn encode_server_message(message: &ServerMessage) -> Result<String, serde_json::Error> {
  serde_json::to_string(message)
}
