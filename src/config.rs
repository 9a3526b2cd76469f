use crate::app::room_name::sanitize_room_name;
use crate::game::constants::{
  ARENA_HEIGHT, ARENA_MARGIN, ARENA_WIDTH, JOIN_INVINCIBILITY_MS, RESPAWN_INVINCIBILITY_MS,
  TRAIL_CAP,
};
use crate::game::types::Arena;
use anyhow::bail;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Per-arena rules shared by every room the server hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomConfig {
  pub arena: Arena,
  pub trail_cap: usize,
  pub join_invincibility_ms: i64,
  pub respawn_invincibility_ms: i64,
  /// Whether client self-kill hints may veto kill credit.
  pub trust_self_kill_hints: bool,
}

impl Default for RoomConfig {
  fn default() -> Self {
    Self {
      arena: Arena {
        width: ARENA_WIDTH,
        height: ARENA_HEIGHT,
        margin: ARENA_MARGIN,
      },
      trail_cap: TRAIL_CAP,
      join_invincibility_ms: JOIN_INVINCIBILITY_MS,
      respawn_invincibility_ms: RESPAWN_INVINCIBILITY_MS,
      trust_self_kill_hints: true,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_address: IpAddr,
  pub port: u16,
  pub default_room: String,
  pub room: RoomConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
      port: 8787,
      default_room: "main".to_string(),
      room: RoomConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds a config from any variable source. Unparseable values fall back to
  /// their default with a warning; values that leave no playable game are errors.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
    let defaults = Self::default();
    let read = |name: &str| {
      lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    };

    let default_room = read("DEFAULT_ROOM")
      .map(|value| sanitize_room_name(&value))
      .filter(|value| !value.is_empty())
      .unwrap_or(defaults.default_room);

    let config = Self {
      bind_address: parse_or(read("BIND_ADDRESS"), "BIND_ADDRESS", defaults.bind_address),
      port: parse_or(read("PORT"), "PORT", defaults.port),
      default_room,
      room: RoomConfig {
        arena: Arena {
          width: parse_or(read("ARENA_WIDTH"), "ARENA_WIDTH", defaults.room.arena.width),
          height: parse_or(read("ARENA_HEIGHT"), "ARENA_HEIGHT", defaults.room.arena.height),
          margin: parse_or(read("ARENA_MARGIN"), "ARENA_MARGIN", defaults.room.arena.margin),
        },
        trail_cap: parse_or(read("TRAIL_CAP"), "TRAIL_CAP", defaults.room.trail_cap),
        join_invincibility_ms: parse_or(
          read("JOIN_INVINCIBILITY_MS"),
          "JOIN_INVINCIBILITY_MS",
          defaults.room.join_invincibility_ms,
        ),
        respawn_invincibility_ms: parse_or(
          read("RESPAWN_INVINCIBILITY_MS"),
          "RESPAWN_INVINCIBILITY_MS",
          defaults.room.respawn_invincibility_ms,
        ),
        trust_self_kill_hints: read("TRUST_SELF_KILL_HINTS")
          .map(|value| !matches!(value.as_str(), "0" | "false" | "FALSE"))
          .unwrap_or(defaults.room.trust_self_kill_hints),
      },
    };
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    let arena = &self.room.arena;
    if !(arena.width.is_finite() && arena.height.is_finite() && arena.margin.is_finite()) {
      bail!("arena dimensions must be finite");
    }
    if arena.margin < 0.0 || arena.width <= arena.margin * 2.0 || arena.height <= arena.margin * 2.0 {
      bail!(
        "arena margin {} leaves no playable area in {}x{}",
        arena.margin,
        arena.width,
        arena.height
      );
    }
    if self.room.trail_cap == 0 {
      bail!("TRAIL_CAP must be at least 1");
    }
    if self.room.join_invincibility_ms < 0 {
      bail!("JOIN_INVINCIBILITY_MS cannot be negative");
    }
    if self.room.respawn_invincibility_ms <= 0 {
      bail!("RESPAWN_INVINCIBILITY_MS must be at least 1");
    }
    Ok(())
  }
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> T {
  let Some(value) = value else { return default };
  match value.parse() {
    Ok(parsed) => parsed,
    Err(_) => {
      tracing::warn!("invalid {name} '{value}', using default");
      default
    }
  }
}
