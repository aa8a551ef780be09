use glam::Vec2;

use super::{Hunter, HunterState, StepCtx};
use crate::config::Span;
use crate::ecs::components::PreyId;
use crate::kinematics::step_toward;
use crate::prey::Population;

/// How long the hunter sizes up its prey before moving.
const FACE_DURATION: Span = Span::new(0.12, 0.38);
/// Approach speed as a fraction of base speed.
pub const APPROACH_FACTOR: f32 = 0.9;
/// Switch from stalking to charging inside this range.
const CHARGE_RANGE: f32 = 64.0;
/// Don't shuffle when basically on top of the target.
const MIN_MOVE_DIST: f32 = 3.0;

const FACE_FRAME: f32 = 0.160;
const APPROACH_FRAME: f32 = 0.080;
const CHARGE_FRAME: f32 = 0.040;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChasePhase {
    Face,
    Approach,
    Charge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chase {
    pub target: PreyId,
    pub phase: ChasePhase,
    /// Seconds spent in the current phase.
    pub phase_timer: f32,
    pub face_duration: f32,
}

impl Chase {
    pub fn new(target: PreyId, rng: &mut fastrand::Rng) -> Self {
        Self {
            target,
            phase: ChasePhase::Face,
            phase_timer: 0.0,
            face_duration: FACE_DURATION.sample(rng),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseOutcome {
    Continue,
    /// The target no longer exists (or is already webbed).
    TargetLost,
    /// Close enough to bite.
    Contact(PreyId),
}

/// One tick of face → approach → charge.
pub fn step(hunter: &mut Hunter, population: &Population, ctx: &StepCtx) -> ChaseOutcome {
    let HunterState::ChasePrey(chase) = &mut hunter.state else {
        return ChaseOutcome::Continue;
    };

    let target: Vec2 = match population.position(chase.target) {
        Some(pos) if !population.is_ensnared(chase.target) => pos,
        _ => return ChaseOutcome::TargetLost,
    };

    chase.phase_timer += ctx.dt;
    let dist = hunter.pos.distance(target);

    match chase.phase {
        ChasePhase::Face => {
            hunter.anim.advance(ctx.dt, ctx.frame_interval(FACE_FRAME));
            if chase.phase_timer > chase.face_duration {
                // The part of this tick past the face deadline is spent moving.
                let spill = chase.phase_timer - chase.face_duration;
                chase.phase = ChasePhase::Approach;
                chase.phase_timer = spill;
                let speed = ctx.config.base_speed * APPROACH_FACTOR;
                hunter.pos = step_toward(hunter.pos, target, speed * spill);
            }
        }
        ChasePhase::Approach => {
            if dist > MIN_MOVE_DIST {
                let speed = ctx.config.base_speed * APPROACH_FACTOR;
                hunter.pos = step_toward(hunter.pos, target, speed * ctx.dt);
                hunter.anim.advance(ctx.dt, ctx.frame_interval(APPROACH_FRAME));
            }
            if dist < CHARGE_RANGE {
                chase.phase = ChasePhase::Charge;
                chase.phase_timer = 0.0;
            }
        }
        ChasePhase::Charge => {
            if dist > ctx.config.catch_dist {
                hunter.pos = step_toward(hunter.pos, target, ctx.config.chase_speed * ctx.dt);
                hunter.anim.advance(ctx.dt, ctx.frame_interval(CHARGE_FRAME));
            } else {
                let id = chase.target;
                hunter.face_toward(target);
                return ChaseOutcome::Contact(id);
            }
        }
    }

    hunter.face_toward(target);
    ChaseOutcome::Continue
}
