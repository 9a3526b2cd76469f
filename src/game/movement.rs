use super::error::RoomError;
use super::types::{Player, Point, TrailSegment};
use crate::config::RoomConfig;
use crate::protocol::{MoveUpdate, PlayerDelta};

/// Applies a client position report to `player` and returns the delta to fan out.
///
/// Position is trusted apart from clamping to the arena. While moving, the
/// pre-update position is recorded as a trail segment tagged with the player's
/// invincibility at that instant. A reported invincibility timestamp can only
/// lengthen the current window, and never past one respawn grant from now.
pub fn apply_move(
    player: &mut Player,
    update: &MoveUpdate,
    config: &RoomConfig,
    now: i64,
) -> Result<PlayerDelta, RoomError> {
    if !update.x.is_finite() || !update.y.is_finite() {
        return Err(RoomError::InvalidPosition {
            x: update.x,
            y: update.y,
        });
    }

    let moving = update.is_moving.unwrap_or(player.is_moving);
    if moving {
        player.trail.push(TrailSegment {
            x: player.x,
            y: player.y,
            timestamp: now,
            is_invincible: player.is_invincible(now),
        });
    }

    let position = config.arena.clamp(Point {
        x: update.x,
        y: update.y,
    });
    player.x = position.x;
    player.y = position.y;
    player.is_moving = moving;
    if let Some(direction) = update.direction {
        player.direction = direction;
    }
    if let Some(reported) = update.invincible_until.filter(|value| value.is_finite()) {
        let ceiling = now.saturating_add(config.respawn_invincibility_ms);
        let accepted = (reported as i64).min(ceiling);
        player.invincible_until = player.invincible_until.max(accepted);
    }

    Ok(PlayerDelta::from_player(player))
}
