use super::collision::{agrees, corroborate};
use super::error::RoomError;
use super::registry::PlayerRegistry;
use super::respawn::{respawn, LifeState, Respawned};
use super::types::CollisionType;
use crate::config::RoomConfig;
use crate::protocol::{KillClaim, ScoreUpdate};

/// Client-supplied hints that the death was self-inflicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfKillSignal {
    IsSelfKillFlag,
    SelfKillFlag,
    SuicideFlag,
    KilledSelfFlag,
    SelfCollisionType,
}

impl SelfKillSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            SelfKillSignal::IsSelfKillFlag => "isSelfKill",
            SelfKillSignal::SelfKillFlag => "selfKill",
            SelfKillSignal::SuicideFlag => "isSuicide",
            SelfKillSignal::KilledSelfFlag => "killedSelf",
            SelfKillSignal::SelfCollisionType => "collisionType",
        }
    }
}

pub fn self_kill_signals(claim: &KillClaim) -> Vec<SelfKillSignal> {
    [
        (claim.is_self_kill, SelfKillSignal::IsSelfKillFlag),
        (claim.self_kill, SelfKillSignal::SelfKillFlag),
        (claim.is_suicide, SelfKillSignal::SuicideFlag),
        (claim.killed_self, SelfKillSignal::KilledSelfFlag),
        (claim.collision_type.is_self_inflicted(), SelfKillSignal::SelfCollisionType),
    ]
    .into_iter()
    .filter_map(|(fired, signal)| fired.then_some(signal))
    .collect()
}

fn signal_names(signals: &[SelfKillSignal]) -> Vec<&'static str> {
    signals.iter().map(|signal| signal.as_str()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrationPolicy {
    /// When false only the server-side id comparison decides; hints are logged and ignored.
    pub trust_self_kill_hints: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    /// `killedBy` names the victim.
    SelfInflicted,
    /// A killer was named but a self-kill hint vetoed the credit.
    Vetoed {
        killer_id: String,
        signals: Vec<SelfKillSignal>,
    },
    /// No killer could be identified; nobody scores.
    Unattributed,
    /// A different player is credited with the kill.
    Credited { killer_id: String },
}

impl Attribution {
    pub fn is_self_kill(&self) -> bool {
        !matches!(self, Attribution::Credited { .. })
    }
}

/// Decides who, if anyone, earns the kill from the claim alone.
///
/// The id comparison is final. Hints can only withhold credit, never grant it.
/// `Credited` still needs the killer to be registered when the score is applied.
pub fn arbitrate(victim_id: &str, claim: &KillClaim, policy: ArbitrationPolicy) -> Attribution {
    let Some(killer_id) = claim.killed_by.as_deref() else {
        return Attribution::Unattributed;
    };
    if killer_id == victim_id {
        return Attribution::SelfInflicted;
    }

    let signals = self_kill_signals(claim);
    if policy.trust_self_kill_hints && !signals.is_empty() {
        return Attribution::Vetoed {
            killer_id: killer_id.to_string(),
            signals,
        };
    }
    Attribution::Credited {
        killer_id: killer_id.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KillOutcome {
    pub victim_id: String,
    pub victim_username: String,
    pub death_type: CollisionType,
    pub respawned: Respawned,
    pub attribution: Attribution,
    pub score: ScoreUpdate,
}

/// Arbitrates a death claim from `victim_id` and applies every resulting mutation.
///
/// The victim is respawned whatever the claim says. Scores move only on a
/// `Credited` attribution whose killer is still registered; a killer that left
/// mid-flight downgrades to `Unattributed`. A victim that was still invincible
/// cannot have been killed, so its claim is `Unattributed` too.
pub fn resolve_claim(
    registry: &PlayerRegistry,
    victim_id: &str,
    claim: &KillClaim,
    config: &RoomConfig,
    now: i64,
) -> Result<KillOutcome, RoomError> {
    let victim_before = registry
        .get(victim_id)
        .ok_or_else(|| RoomError::StaleSession(victim_id.to_string()))?;
    let killer_before = claim.killed_by.as_deref().and_then(|id| registry.get(id));
    let observed = corroborate(&victim_before, killer_before.as_ref(), now);
    if !agrees(claim.collision_type, observed) {
        tracing::debug!(
            victim_id,
            claimed = claim.collision_type.as_str(),
            observed = ?observed,
            "kill claim not corroborated by registry positions"
        );
    }
    if let (Some(claimed), Some(killer)) = (claim.killer_username.as_deref(), killer_before.as_ref()) {
        if claimed != killer.username {
            tracing::debug!(
                victim_id,
                claimed,
                registered = %killer.username,
                "killer username in claim does not match registry"
            );
        }
    }

    let (respawned, victim_username, victim_score) = registry
        .update(victim_id, |victim| {
            let respawned = respawn(
                victim,
                &config.arena,
                now,
                config.respawn_invincibility_ms,
            );
            (respawned, victim.username.clone(), victim.score)
        })
        .ok_or_else(|| RoomError::StaleSession(victim_id.to_string()))?;
    tracing::debug!(
        victim_id,
        previous = respawned.previous.as_str(),
        invincible_until = respawned.invincible_until,
        "victim respawned"
    );

    let death_type = claim.collision_type;
    let unattributed = || ScoreUpdate {
        id: victim_id.to_string(),
        score: victim_score,
        username: victim_username.clone(),
        killed_username: victim_username.clone(),
        death_type,
        is_self_kill: true,
    };

    let policy = ArbitrationPolicy {
        trust_self_kill_hints: config.trust_self_kill_hints,
    };
    let attribution = match arbitrate(victim_id, claim, policy) {
        Attribution::SelfInflicted => Attribution::SelfInflicted,
        attribution if respawned.previous == LifeState::AliveInvincible => {
            tracing::debug!(
                victim_id,
                withheld = ?attribution,
                "victim was invincible, kill claim earns no credit"
            );
            Attribution::Unattributed
        }
        attribution => attribution,
    };
    let (attribution, score) = match attribution {
        Attribution::SelfInflicted => (Attribution::SelfInflicted, unattributed()),
        Attribution::Unattributed => {
            let signals = self_kill_signals(claim);
            tracing::debug!(
                victim_id,
                signals = ?signal_names(&signals),
                "kill claim without resolvable killer"
            );
            (Attribution::Unattributed, unattributed())
        }
        Attribution::Vetoed { killer_id, signals } => match registry.get(&killer_id) {
            Some(killer) => {
                tracing::debug!(
                    victim_id,
                    killer_id = %killer_id,
                    signals = ?signal_names(&signals),
                    "self-kill hint withheld kill credit"
                );
                let score = ScoreUpdate {
                    id: killer.id,
                    score: killer.score,
                    username: killer.username,
                    killed_username: victim_username.clone(),
                    death_type,
                    is_self_kill: true,
                };
                (Attribution::Vetoed { killer_id, signals }, score)
            }
            None => (Attribution::Unattributed, unattributed()),
        },
        Attribution::Credited { killer_id } => {
            let hints = self_kill_signals(claim);
            if !hints.is_empty() {
                tracing::debug!(
                    victim_id,
                    killer_id = %killer_id,
                    signals = ?signal_names(&hints),
                    "ignoring untrusted self-kill hints"
                );
            }
            let credited = registry.update(&killer_id, |killer| {
                killer.score = killer.score.saturating_add(1);
                (killer.score, killer.username.clone())
            });
            match credited {
                Some((score, username)) => {
                    tracing::info!(victim_id, killer_id = %killer_id, score, "kill credited");
                    let score = ScoreUpdate {
                        id: killer_id.clone(),
                        score,
                        username,
                        killed_username: victim_username.clone(),
                        death_type,
                        is_self_kill: false,
                    };
                    (Attribution::Credited { killer_id }, score)
                }
                None => {
                    tracing::debug!(victim_id, killer_id = %killer_id, "claimed killer is not registered");
                    (Attribution::Unattributed, unattributed())
                }
            }
        }
    };

    Ok(KillOutcome {
        victim_id: victim_id.to_string(),
        victim_username,
        death_type,
        respawned,
        attribution,
        score,
    })
}
