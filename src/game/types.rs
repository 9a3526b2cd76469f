use super::trail::TrailBuffer;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
  Left,
  #[default]
  Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
  #[serde(rename = "player")]
  Player,
  #[serde(rename = "trail")]
  Trail,
  #[serde(rename = "self")]
  SelfCollision,
  #[serde(rename = "self-trail")]
  SelfTrail,
  #[default]
  #[serde(rename = "unknown", other)]
  Unknown,
}

impl CollisionType {
  pub fn is_self_inflicted(self) -> bool {
    matches!(self, CollisionType::SelfCollision | CollisionType::SelfTrail)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      CollisionType::Player => "player",
      CollisionType::Trail => "trail",
      CollisionType::SelfCollision => "self",
      CollisionType::SelfTrail => "self-trail",
      CollisionType::Unknown => "unknown",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub fn distance(self, other: Point) -> f64 {
    (self.x - other.x).hypot(self.y - other.y)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailSegment {
  pub x: f64,
  pub y: f64,
  pub timestamp: i64,
  #[serde(rename = "isInvincible")]
  pub is_invincible: bool,
}

impl TrailSegment {
  pub fn point(&self) -> Point {
    Point {
      x: self.x,
      y: self.y,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct Player {
  pub id: String,
  pub x: f64,
  pub y: f64,
  pub username: String,
  pub color: String,
  pub direction: Direction,
  #[serde(rename = "isMoving")]
  pub is_moving: bool,
  #[serde(rename = "invincibleUntil")]
  pub invincible_until: i64,
  pub score: u32,
  pub trail: TrailBuffer,
}

impl Player {
  pub fn position(&self) -> Point {
    Point {
      x: self.x,
      y: self.y,
    }
  }

  pub fn is_invincible(&self, now: i64) -> bool {
    now < self.invincible_until
  }
}

/// Playable rectangle. Positions are kept inside `[margin, size - margin]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
  pub width: f64,
  pub height: f64,
  pub margin: f64,
}

impl Arena {
  pub fn center(&self) -> Point {
    Point {
      x: self.width / 2.0,
      y: self.height / 2.0,
    }
  }

  pub fn clamp(&self, point: Point) -> Point {
    Point {
      x: point.x.clamp(self.margin, self.width - self.margin),
      y: point.y.clamp(self.margin, self.height - self.margin),
    }
  }

  pub fn random_spawn(&self) -> Point {
    let mut rng = rand::thread_rng();
    Point {
      x: rng.gen_range(self.margin..=self.width - self.margin),
      y: rng.gen_range(self.margin..=self.height - self.margin),
    }
  }
}
