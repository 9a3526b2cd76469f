mod dispatch;

use dispatch::Dispatcher;

use super::error::RoomError;
use super::kill::resolve_claim;
use super::movement::apply_move;
use super::registry::PlayerRegistry;
use crate::app::time::now_millis;
use crate::config::RoomConfig;
use crate::protocol::{self, ClientMessage, KillClaim, MoveUpdate, ServerMessage};
use crate::shared::names::{sanitize_username, DEFAULT_USERNAME};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// One arena: the player registry plus the sessions watching it.
///
/// There is no room-wide lock. The registry serializes per player and each
/// session's messages arrive in order from its own socket task, which is all
/// the ordering the game needs.
#[derive(Debug)]
pub struct Room {
  registry: PlayerRegistry,
  dispatcher: Dispatcher,
  config: RoomConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
  pub players: usize,
  pub sessions: usize,
}

impl Room {
  pub fn new(config: RoomConfig) -> Self {
    Self {
      registry: PlayerRegistry::new(config),
      dispatcher: Dispatcher::new(),
      config,
    }
  }

  pub fn add_session(&self, sender: UnboundedSender<String>) -> String {
    let session_id = Uuid::new_v4().to_string();
    self.dispatcher.register(&session_id, sender);
    tracing::debug!(session_id = %session_id, "session connected");
    session_id
  }

  /// Drops the session and its player. Safe to call for ids that are already gone.
  pub fn remove_session(&self, session_id: &str) {
    self.dispatcher.unregister(session_id);
    let Some(player) = self.registry.remove(session_id) else { return };
    tracing::info!(session_id, username = %player.username, score = player.score, "player left");
    self.dispatcher.to_all(&ServerMessage::PlayerLeft {
      id: player.id,
    });
  }

  pub fn stats(&self) -> RoomStats {
    RoomStats {
      players: self.registry.len(),
      sessions: self.dispatcher.session_count(),
    }
  }

  pub fn handle_text_message(&self, session_id: &str, text: &str) {
    let result = protocol::decode_client_message(text)
      .map_err(RoomError::from)
      .and_then(|message| self.handle_client_message(session_id, message, now_millis()));
    if let Err(error) = result {
      if error.is_expected() {
        tracing::debug!(session_id, %error, "ignoring message");
      } else {
        tracing::warn!(session_id, %error, "rejected client message");
      }
    }
  }

  fn handle_client_message(
    &self,
    session_id: &str,
    message: ClientMessage,
    now: i64,
  ) -> Result<(), RoomError> {
    match message {
      ClientMessage::Join { username } => {
        self.handle_join(session_id, username, now);
        Ok(())
      }
      ClientMessage::Move(update) => self.handle_move(session_id, &update, now),
      ClientMessage::KillPlayer(claim) => self.handle_kill(session_id, &claim, now),
      ClientMessage::RequestPlayerData { player_id } => {
        self.handle_request_player_data(session_id, &player_id)
      }
    }
  }

  fn handle_join(&self, session_id: &str, username: Option<String>, now: i64) {
    let username = sanitize_username(username.as_deref().unwrap_or_default(), DEFAULT_USERNAME);

    let rejoined = self.registry.update(session_id, |player| {
      let renamed = player.username != username;
      player.username = username.clone();
      (player.clone(), renamed)
    });

    let (player, announce) = match rejoined {
      Some((player, renamed)) => {
        tracing::debug!(session_id, renamed, "session joined again");
        (player, renamed)
      }
      None => {
        let player = self.registry.create(session_id, username, now);
        tracing::info!(session_id, username = %player.username, color = %player.color, "player joined");
        (player, true)
      }
    };

    self.dispatcher.to_one(session_id, &ServerMessage::Init(player.clone()));
    if announce {
      self.dispatcher.to_all_except(session_id, &ServerMessage::PlayerJoined(player));
    }
    self.dispatcher.to_one(
      session_id,
      &ServerMessage::ExistingPlayers {
        players: self.registry.list_except(session_id),
      },
    );
  }

  fn handle_move(&self, session_id: &str, update: &MoveUpdate, now: i64) -> Result<(), RoomError> {
    let delta = self
      .registry
      .update(session_id, |player| apply_move(player, update, &self.config, now))
      .ok_or_else(|| RoomError::StaleSession(session_id.to_string()))??;
    self.dispatcher.to_all_except(session_id, &ServerMessage::PlayerMoved(delta));
    Ok(())
  }

  fn handle_kill(&self, session_id: &str, claim: &KillClaim, now: i64) -> Result<(), RoomError> {
    let outcome = resolve_claim(&self.registry, session_id, claim, &self.config, now)?;
    tracing::info!(
      victim_id = %outcome.victim_id,
      death_type = outcome.death_type.as_str(),
      self_kill = outcome.attribution.is_self_kill(),
      attribution = ?outcome.attribution,
      "player died"
    );

    self.dispatcher.to_all(&ServerMessage::PlayerDied {
      id: outcome.victim_id.clone(),
      username: outcome.victim_username.clone(),
      death_type: outcome.death_type,
    });
    self.dispatcher.to_one(
      session_id,
      &ServerMessage::SelfRespawn {
        x: outcome.respawned.position.x,
        y: outcome.respawned.position.y,
        invincible_until: outcome.respawned.invincible_until,
      },
    );
    self.dispatcher.to_all_except(
      session_id,
      &ServerMessage::ServerRespawn {
        id: outcome.victim_id.clone(),
        x: outcome.respawned.position.x,
        y: outcome.respawned.position.y,
        invincible_until: outcome.respawned.invincible_until,
      },
    );
    self.dispatcher.to_all(&ServerMessage::ScoreUpdated(outcome.score));
    Ok(())
  }

  fn handle_request_player_data(&self, session_id: &str, player_id: &str) -> Result<(), RoomError> {
    let player = self
      .registry
      .get(player_id)
      .ok_or_else(|| RoomError::UnknownPlayer(player_id.to_string()))?;
    self.dispatcher.to_one(session_id, &ServerMessage::PlayerJoined(player));
    Ok(())
  }
}
