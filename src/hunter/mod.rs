pub mod attack;
pub mod chase;
pub mod wander;

use glam::Vec2;

use crate::anim::AnimState;
use crate::config::{SimConfig, Span};
use crate::ecs::components::PreyId;
use crate::kinematics::{facing_degrees, uniform, Viewport};
use crate::timing::{TimerKey, Timers};

pub use attack::{AttackMode, AttackPhase, AttackSession, FollowUp};
pub use chase::{Chase, ChasePhase};
pub use wander::WanderState;

/// Where a fresh simulation puts the hunter when nothing was restored.
pub const DEFAULT_POSITION: Vec2 = Vec2::new(120.0, 120.0);
/// Waypoints for ordinary wandering keep this far from the edges.
pub const WANDER_INSET: f32 = 40.0;
/// Reach of a "somewhere nearby" waypoint after a chase.
const NEARBY_RANGE: f32 = 120.0;
const NEARBY_INSET: f32 = 20.0;

/// Persisted pose: what a save/restore collaborator reads and writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HunterPose {
    pub pos: Vec2,
    /// Degrees.
    pub angle: f32,
}

impl Default for HunterPose {
    fn default() -> Self {
        Self {
            pos: DEFAULT_POSITION,
            angle: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Top-level behavior. Chase and attack carry their own sub-machines.
#[derive(Debug, Clone, PartialEq)]
pub enum HunterState {
    Wander,
    FollowPointer,
    ChasePrey(Chase),
    Attack(AttackSession),
}

/// Payload-free view of [`HunterState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTag {
    Wander,
    FollowPointer,
    ChasePrey,
    Attack,
}

impl StateTag {
    pub fn label(self) -> &'static str {
        match self {
            Self::Wander => "wander",
            Self::FollowPointer => "follow-pointer",
            Self::ChasePrey => "chase-prey",
            Self::Attack => "attack",
        }
    }
}

impl HunterState {
    pub fn tag(&self) -> StateTag {
        match self {
            Self::Wander => StateTag::Wander,
            Self::FollowPointer => StateTag::FollowPointer,
            Self::ChasePrey(_) => StateTag::ChasePrey,
            Self::Attack(_) => StateTag::Attack,
        }
    }
}

/// Per-tick inputs shared by the state steps.
pub struct StepCtx<'a> {
    pub dt: f32,
    pub now: f64,
    pub config: &'a SimConfig,
    pub viewport: Viewport,
}

impl StepCtx<'_> {
    /// Frame interval scaled by the configured animation speed.
    pub fn frame_interval(&self, base: f32) -> f32 {
        base / self.config.anim_speed_mul
    }
}

// ---------------------------------------------------------------------------
// Hunter
// ---------------------------------------------------------------------------

/// The single pursuer.
#[derive(Debug, Clone)]
pub struct Hunter {
    pub pos: Vec2,
    /// Facing in degrees, sprite rest orientation included.
    pub angle: f32,
    pub state: HunterState,
    pub anim: AnimState,
    pub timers: Timers,
    pub wander: WanderState,
}

impl Hunter {
    pub fn new(
        pose: HunterPose,
        config: &SimConfig,
        viewport: &Viewport,
        now: f64,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut timers = Timers::new();
        timers.reset_attention(now, config.attention_open, config.attention_closed, rng);
        let waypoint = viewport.random_point(rng, WANDER_INSET);
        Self {
            pos: pose.pos,
            angle: pose.angle,
            state: HunterState::Wander,
            anim: AnimState::new(config.hunter_frames),
            timers,
            wander: WanderState::new(waypoint, now, rng),
        }
    }

    pub fn pose(&self) -> HunterPose {
        HunterPose {
            pos: self.pos,
            angle: self.angle,
        }
    }

    pub fn tag(&self) -> StateTag {
        self.state.tag()
    }

    /// Turn toward `target`. Keeps the old angle when already on top of it.
    pub fn face_toward(&mut self, target: Vec2) {
        if let Some(angle) = facing_degrees(target - self.pos) {
            self.angle = angle;
        }
    }

    /// Switch to chasing `target`, dropping whatever was going on.
    /// An attack session in progress is abandoned without its follow-up.
    pub fn start_chase(&mut self, target: PreyId, rng: &mut fastrand::Rng) {
        if let HunterState::Attack(session) = &self.state {
            log::debug!(
                "attack abandoned after {}/{} hits: prey spotted",
                session.completed,
                session.hits
            );
        }
        log::debug!("chasing prey {:?}", target);
        self.state = HunterState::ChasePrey(Chase::new(target, rng));
    }

    pub fn start_attack(&mut self, session: AttackSession) {
        log::debug!("attack started: {:?} x{}", session.mode, session.hits);
        self.state = HunterState::Attack(session);
    }

    pub fn return_to_wander(&mut self) {
        self.state = HunterState::Wander;
    }

    /// Wander to a random spot within reach of the current position.
    pub fn wander_nearby(&mut self, viewport: &Viewport, now: f64, rng: &mut fastrand::Rng) {
        let offset = Vec2::new(
            uniform(rng, -NEARBY_RANGE, NEARBY_RANGE),
            uniform(rng, -NEARBY_RANGE, NEARBY_RANGE),
        );
        let waypoint = viewport.clamp(self.pos + offset, NEARBY_INSET);
        self.wander.head_for(waypoint, now);
    }

    /// Wander to a random spot anywhere on screen.
    pub fn wander_anywhere(&mut self, viewport: &Viewport, now: f64, rng: &mut fastrand::Rng) {
        let waypoint = viewport.random_point(rng, WANDER_INSET);
        self.wander.head_for(waypoint, now);
    }

    /// Give up on whatever the current chase was after.
    pub fn abort_to_wander(&mut self, viewport: &Viewport, now: f64, rng: &mut fastrand::Rng) {
        log::debug!("chase target gone, back to wandering");
        self.return_to_wander();
        self.wander_nearby(viewport, now, rng);
    }

    /// Schedule a deadline from a span, logging it at trace level.
    pub fn schedule(
        &mut self,
        key: TimerKey,
        now: f64,
        span: Span,
        rng: &mut fastrand::Rng,
    ) {
        self.timers.schedule(key, now, span, rng);
        log::trace!("{} until {:.2}s", key.label(), self.timers.get(key));
    }
}
