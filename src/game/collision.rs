use super::constants::{AVATAR_RADIUS, SELF_TRAIL_GRACE_SEGMENTS};
use super::types::{CollisionType, Player, Point, TrailSegment};

/// Whether `segment` hurts `target` at its current position right now.
///
/// Only the target's live invincibility matters. A segment laid while its owner
/// was invincible keeps that tag forever but is as dangerous as any other once
/// the target is vulnerable.
pub fn segment_threatens(segment: &TrailSegment, target: &Player, now: i64) -> bool {
    !target.is_invincible(now) && touches(target.position(), segment.point(), AVATAR_RADIUS)
}

fn touches(a: Point, b: Point, reach: f64) -> bool {
    a.distance(b) <= reach
}

/// Recomputes the most likely cause of death from registry positions.
///
/// This is diagnostic only: clients detect collisions with fresher positions than
/// the server holds, so disagreement is logged, never acted on. `None` means
/// the registry shows nothing that could have killed the victim.
pub fn corroborate(victim: &Player, killer: Option<&Player>, now: i64) -> Option<CollisionType> {
    let position = victim.position();

    if let Some(killer) = killer.filter(|killer| killer.id != victim.id) {
        if touches(position, killer.position(), AVATAR_RADIUS * 2.0) {
            return Some(CollisionType::Player);
        }
        let hit = killer
            .trail
            .iter()
            .any(|segment| segment_threatens(segment, victim, now));
        if hit {
            return Some(CollisionType::Trail);
        }
    }

    let own_segments = victim.trail.len().saturating_sub(SELF_TRAIL_GRACE_SEGMENTS);
    let self_hit = victim
        .trail
        .iter()
        .take(own_segments)
        .any(|segment| segment_threatens(segment, victim, now));
    if self_hit {
        return Some(CollisionType::SelfTrail);
    }

    None
}

/// True when the claimed collision type is consistent with what the registry shows.
pub fn agrees(claimed: CollisionType, observed: Option<CollisionType>) -> bool {
    match (claimed, observed) {
        (CollisionType::Unknown, _) => true,
        (_, None) => false,
        (CollisionType::SelfCollision | CollisionType::SelfTrail, Some(observed)) => {
            observed.is_self_inflicted()
        }
        (claimed, Some(observed)) => claimed == observed,
    }
}
