use glam::Vec2;

use super::chase::APPROACH_FACTOR;
use super::{Hunter, HunterState, StepCtx};
use crate::config::Span;
use crate::kinematics::{direction, heading_vector, step_toward};

/// Single attack: bite range around the pointer.
const BITE_RANGE: f32 = 6.0;
/// Multi attack: start charging inside this range.
const CHARGE_RANGE: f32 = 60.0;
/// Retreat point counts as reached inside this range.
const RETREAT_ARRIVE: f32 = 2.0;
/// Retreat speed as a fraction of chase speed.
const RETREAT_FACTOR: f32 = 0.45;

const SINGLE_RETREAT: Span = Span::new(12.0, 28.0);
const MULTI_RETREAT: Span = Span::new(24.0, 48.0);

const CIRCLE_RADIUS: Span = Span::new(36.0, 96.0);
const CIRCLE_RADIUS_MIN: f32 = 20.0;
const CIRCLE_RADIUS_MAX: f32 = 200.0;
const CIRCLE_DURATION: Span = Span::new(0.4, 1.3);
/// Orbit angular speed numerator: `omega = dir * ORBIT_RATE / radius`.
const ORBIT_RATE: f32 = 1.8;

const APPROACH_FRAME: f32 = 0.080;
const STRIKE_FRAME: f32 = 0.040;
const RETREAT_FRAME: f32 = 0.060;
const CIRCLE_FRAME: f32 = 0.080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    /// Dart in, back off, repeat.
    Single,
    /// Stalk, charge, back off, circle, repeat.
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackPhase {
    Approach,
    Charge,
    Retreat {
        target: Vec2,
    },
    Circle {
        radius: f32,
        /// +1 or -1.
        dir: f32,
        duration: f32,
        elapsed: f32,
    },
}

/// What to do once all hits landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowUp {
    pub pause: Span,
    pub ignore_pointer: Span,
}

impl FollowUp {
    pub const AFTER_ATTACK: FollowUp = FollowUp {
        pause: Span::new(0.8, 1.6),
        ignore_pointer: Span::new(2.0, 5.0),
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackSession {
    pub mode: AttackMode,
    pub hits: u32,
    pub completed: u32,
    pub phase: AttackPhase,
    /// Seconds spent in the current phase.
    pub phase_timer: f32,
    pub retreat_dist: f32,
    pub follow_up: FollowUp,
}

impl AttackSession {
    pub fn single(hits: u32, rng: &mut fastrand::Rng) -> Self {
        Self::new(AttackMode::Single, hits, SINGLE_RETREAT.sample(rng))
    }

    pub fn multi(hits: u32, rng: &mut fastrand::Rng) -> Self {
        Self::new(AttackMode::Multi, hits, MULTI_RETREAT.sample(rng))
    }

    fn new(mode: AttackMode, hits: u32, retreat_dist: f32) -> Self {
        Self {
            mode,
            hits: hits.max(1),
            completed: 0,
            phase: AttackPhase::Approach,
            phase_timer: 0.0,
            retreat_dist,
            follow_up: FollowUp::AFTER_ATTACK,
        }
    }

    fn enter(&mut self, phase: AttackPhase) {
        self.phase = phase;
        self.phase_timer = 0.0;
    }

    /// Count a hit. Returns the completion once the last one lands.
    fn land_hit(&mut self) -> Option<(u32, FollowUp)> {
        self.completed += 1;
        if self.completed >= self.hits {
            return Some((self.completed, self.follow_up));
        }
        self.enter(AttackPhase::Approach);
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    Continue,
    /// Every hit landed; the caller applies `follow_up` exactly once.
    Completed { hits: u32, follow_up: FollowUp },
}

/// One tick of the attack sequence against the live pointer position.
/// On completion the hunter is already back in `Wander`.
pub fn step(
    hunter: &mut Hunter,
    pointer: Vec2,
    ctx: &StepCtx,
    rng: &mut fastrand::Rng,
) -> AttackOutcome {
    let HunterState::Attack(session) = &mut hunter.state else {
        return AttackOutcome::Continue;
    };
    session.phase_timer += ctx.dt;

    let chase_speed = ctx.config.chase_speed;
    let dist = hunter.pos.distance(pointer);
    // Direction away from the pointer, falling back to "behind the sprite"
    // when sitting right on it.
    let mut away = -direction(hunter.pos, pointer);
    if away == Vec2::ZERO {
        away = -heading_vector(hunter.angle);
    }

    let mut finished = None;
    match (session.mode, session.phase) {
        (AttackMode::Single, AttackPhase::Approach) => {
            if dist > BITE_RANGE {
                hunter.pos = step_toward(hunter.pos, pointer, chase_speed * ctx.dt);
            } else {
                let target = hunter.pos + away * session.retreat_dist;
                session.enter(AttackPhase::Retreat { target });
            }
            hunter.anim.advance(ctx.dt, ctx.frame_interval(STRIKE_FRAME));
        }
        (AttackMode::Multi, AttackPhase::Approach) => {
            if dist > BITE_RANGE {
                let speed = ctx.config.base_speed * APPROACH_FACTOR;
                hunter.pos = step_toward(hunter.pos, pointer, speed * ctx.dt);
            }
            hunter.anim.advance(ctx.dt, ctx.frame_interval(APPROACH_FRAME));
            if dist < CHARGE_RANGE {
                session.enter(AttackPhase::Charge);
            }
        }
        (_, AttackPhase::Charge) => {
            if dist > ctx.config.catch_dist {
                hunter.pos = step_toward(hunter.pos, pointer, chase_speed * ctx.dt);
            } else {
                let target = hunter.pos + away * session.retreat_dist;
                session.enter(AttackPhase::Retreat { target });
            }
            hunter.anim.advance(ctx.dt, ctx.frame_interval(STRIKE_FRAME));
        }
        (mode, AttackPhase::Retreat { target }) => {
            if hunter.pos.distance(target) > RETREAT_ARRIVE {
                let speed = chase_speed * RETREAT_FACTOR;
                hunter.pos = step_toward(hunter.pos, target, speed * ctx.dt);
            } else if mode == AttackMode::Single {
                finished = session.land_hit();
            } else {
                session.enter(AttackPhase::Circle {
                    radius: CIRCLE_RADIUS
                        .sample(rng)
                        .clamp(CIRCLE_RADIUS_MIN, CIRCLE_RADIUS_MAX),
                    dir: if rng.bool() { 1.0 } else { -1.0 },
                    duration: CIRCLE_DURATION.sample(rng),
                    elapsed: 0.0,
                });
            }
            hunter.anim.advance(ctx.dt, ctx.frame_interval(RETREAT_FRAME));
        }
        (
            _,
            AttackPhase::Circle {
                radius,
                dir,
                duration,
                elapsed,
            },
        ) => {
            let elapsed = elapsed + ctx.dt;
            let offset = hunter.pos - pointer;
            let angle = offset.y.atan2(offset.x);
            let omega = dir * ORBIT_RATE / radius.max(CIRCLE_RADIUS_MIN);
            let next = angle + omega * ctx.dt;
            let orbit = pointer + Vec2::new(next.cos(), next.sin()) * radius;
            hunter.pos = step_toward(hunter.pos, orbit, ctx.config.base_speed * ctx.dt);
            hunter.anim.advance(ctx.dt, ctx.frame_interval(CIRCLE_FRAME));

            if elapsed > duration {
                finished = session.land_hit();
            } else {
                session.phase = AttackPhase::Circle {
                    radius,
                    dir,
                    duration,
                    elapsed,
                };
            }
        }
    }

    hunter.face_toward(pointer);

    if let Some((hits, follow_up)) = finished {
        hunter.return_to_wander();
        log::debug!("attack finished after {} hits", hits);
        return AttackOutcome::Completed { hits, follow_up };
    }
    AttackOutcome::Continue
}

/// Sample a hit count for an attack outcome.
pub fn sample_hits(min: u32, max: u32, rng: &mut fastrand::Rng) -> u32 {
    let min = min.max(1);
    rng.u32(min..=max.max(min))
}
