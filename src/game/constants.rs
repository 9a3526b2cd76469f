pub const ARENA_WIDTH: f64 = 800.0;
pub const ARENA_HEIGHT: f64 = 600.0;
pub const ARENA_MARGIN: f64 = 20.0;
pub const TRAIL_CAP: usize = 40;
pub const JOIN_INVINCIBILITY_MS: i64 = 2000;
pub const RESPAWN_INVINCIBILITY_MS: i64 = 2000;

pub const AVATAR_RADIUS: f64 = 5.0;
// Newest own segments sit under the avatar and never count as a self-trail hit.
pub const SELF_TRAIL_GRACE_SEGMENTS: usize = 3;

pub const COLOR_JITTER: i16 = 40;

pub const COLOR_POOL: [&str; 8] = [
  "#ff6b6b",
  "#ffd166",
  "#06d6a0",
  "#4dabf7",
  "#f06595",
  "#845ef7",
  "#20c997",
  "#fcc419",
];
