use super::types::{Arena, Direction, Player, Point};

/// Observable life states. Death is never stored: a dying player is moved
/// straight back to `AliveInvincible` inside the same resolver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    AliveInvincible,
    AliveVulnerable,
}

impl LifeState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifeState::AliveInvincible => "alive-invincible",
            LifeState::AliveVulnerable => "alive-vulnerable",
        }
    }
}

/// Evaluated lazily against the caller's clock; there are no expiry timers.
pub fn life_state(player: &Player, now: i64) -> LifeState {
    if player.is_invincible(now) {
        LifeState::AliveInvincible
    } else {
        LifeState::AliveVulnerable
    }
}

/// A grant never shortens a window that is still running.
pub fn grant_invincibility(player: &mut Player, now: i64, duration_ms: i64) {
    let until = now.saturating_add(duration_ms.max(0));
    player.invincible_until = player.invincible_until.max(until);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Respawned {
    pub position: Point,
    pub invincible_until: i64,
    pub previous: LifeState,
}

/// Applies death and respawn atomically: center of the arena, default heading,
/// stopped, trail wiped, fresh invincibility.
pub fn respawn(player: &mut Player, arena: &Arena, now: i64, duration_ms: i64) -> Respawned {
    let previous = life_state(player, now);
    let center = arena.center();
    player.x = center.x;
    player.y = center.y;
    player.direction = Direction::default();
    player.is_moving = false;
    player.trail.clear();
    grant_invincibility(player, now, duration_ms);
    Respawned {
        position: center,
        invincible_until: player.invincible_until,
        previous,
    }
}
