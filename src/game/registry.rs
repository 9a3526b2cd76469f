use super::color::assign_color;
use super::respawn::grant_invincibility;
use super::trail::TrailBuffer;
use super::types::{Direction, Player};
use crate::config::RoomConfig;
use dashmap::DashMap;
use std::collections::HashSet;

/// Authoritative session id → player map.
///
/// Backed by a sharded map so updates to different players never contend on a
/// single lock. Callers must not hold a reference across another registry call;
/// every accessor here clones out or runs a closure and releases the shard.
#[derive(Debug)]
pub struct PlayerRegistry {
    players: DashMap<String, Player>,
    config: RoomConfig,
}

impl PlayerRegistry {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            players: DashMap::new(),
            config,
        }
    }

    pub fn create(&self, session_id: &str, username: String, now: i64) -> Player {
        let used_colors: HashSet<String> = self
            .players
            .iter()
            .map(|entry| entry.value().color.clone())
            .collect();
        let color = assign_color(&used_colors, &mut rand::thread_rng());
        let spawn = self.config.arena.random_spawn();

        let mut player = Player {
            id: session_id.to_string(),
            x: spawn.x,
            y: spawn.y,
            username,
            color,
            direction: Direction::default(),
            is_moving: false,
            invincible_until: 0,
            score: 0,
            trail: TrailBuffer::with_cap(self.config.trail_cap),
        };
        grant_invincibility(&mut player, now, self.config.join_invincibility_ms);

        self.players.insert(session_id.to_string(), player.clone());
        player
    }

    pub fn get(&self, session_id: &str) -> Option<Player> {
        self.players.get(session_id).map(|entry| entry.value().clone())
    }

    /// Runs `mutator` under the player's shard lock. `None` when the player is gone.
    pub fn update<R>(&self, session_id: &str, mutator: impl FnOnce(&mut Player) -> R) -> Option<R> {
        let mut entry = self.players.get_mut(session_id)?;
        Some(mutator(entry.value_mut()))
    }

    pub fn remove(&self, session_id: &str) -> Option<Player> {
        self.players.remove(session_id).map(|(_, player)| player)
    }

    pub fn list_except(&self, session_id: &str) -> Vec<Player> {
        self.players
            .iter()
            .filter(|entry| entry.key() != session_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::COLOR_POOL;

    fn registry() -> PlayerRegistry {
        PlayerRegistry::new(RoomConfig::default())
    }

    #[test]
    fn create_applies_join_defaults() {
        let registry = registry();
        let player = registry.create("a", "Alice".to_string(), 1_000);
        assert_eq!(player.id, "a");
        assert_eq!(player.score, 0);
        assert_eq!(player.direction, Direction::Right);
        assert!(!player.is_moving);
        assert!(player.trail.is_empty());
        assert_eq!(player.invincible_until, 1_000 + RoomConfig::default().join_invincibility_ms);
        assert!((20.0..=780.0).contains(&player.x));
        assert!((20.0..=580.0).contains(&player.y));
        assert!(registry.get("a").is_some());
    }

    #[test]
    fn colors_stay_unique_until_palette_runs_out() {
        let registry = registry();
        let mut seen = HashSet::new();
        registry.create("seed", "Seed".to_string(), 0);
        seen.insert(registry.get("seed").map(|p| p.color).unwrap_or_default());
        for index in 0..COLOR_POOL.len() - 1 {
            let player = registry.create(&format!("p{index}"), "P".to_string(), 0);
            assert!(COLOR_POOL.contains(&player.color.as_str()));
            assert!(seen.insert(player.color), "palette color reused early");
        }
    }

    #[test]
    fn update_and_remove_missing_player_are_noops() {
        let registry = registry();
        assert!(registry.update("ghost", |player| player.score += 1).is_none());
        assert!(registry.remove("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn list_except_skips_requester() {
        let registry = registry();
        registry.create("a", "A".to_string(), 0);
        registry.create("b", "B".to_string(), 0);
        registry.create("c", "C".to_string(), 0);
        let mut ids: Vec<String> = registry.list_except("b").into_iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn update_is_last_writer_wins() {
        let registry = registry();
        registry.create("a", "A".to_string(), 0);
        registry.update("a", |player| player.x = 100.0);
        registry.update("a", |player| player.x = 200.0);
        assert_eq!(registry.get("a").map(|p| p.x), Some(200.0));
    }
}
