//! The simulation root: owns the hunter, the prey, the clock and the RNG,
//! and runs one `tick` per presented frame.

use glam::Vec2;

use crate::arbitration;
use crate::config::{SimConfig, Span};
use crate::ecs::components::PreyId;
use crate::error::ConfigError;
use crate::events::SimEvent;
use crate::hunter::attack::{self, AttackOutcome};
use crate::hunter::chase::{self, ChaseOutcome};
use crate::hunter::{wander, FollowUp, Hunter, HunterPose, HunterState, StateTag, StepCtx};
use crate::kinematics::{uniform, Viewport};
use crate::outcome;
use crate::prey::{Population, PreyPose};
use crate::timing::TimerKey;

/// How long a poke keeps the hunter frozen.
const POKE_PAUSE: Span = Span::new(3.0, 5.0);
/// Coming back from hidden: keep well away from the edges.
const RESUME_INSET: f32 = 64.0;
const RESUME_WAYPOINT_RANGE: f32 = 60.0;
const RESUME_PAUSE: f32 = 0.3;
const RESUME_IGNORE: f32 = 3.0;
/// Hunter waypoints are pulled at least this far inside after a resize.
const RESIZE_INSET: f32 = 20.0;

/// Last reported pointer position. Ignored until the first report.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub pos: Vec2,
    pub observed: bool,
}

impl Pointer {
    pub fn position(&self) -> Option<Vec2> {
        self.observed.then_some(self.pos)
    }
}

/// Whatever the current state step asked for, applied once the step's
/// borrows are released.
enum StepResult {
    Idle,
    PreyContact(PreyId),
    TargetLost,
    AttackDone { hits: u32, follow_up: FollowUp },
}

pub struct Simulation {
    config: SimConfig,
    rng: fastrand::Rng,
    now: f64,
    viewport: Viewport,
    pointer: Pointer,
    hunter: Hunter,
    population: Population,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Validate `config` and set up a hunter at `pose` with an empty prey
    /// population whose first batch arrives after `first_spawn_delay`.
    pub fn new(
        config: SimConfig,
        viewport: Viewport,
        pose: HunterPose,
        mut rng: fastrand::Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let hunter = Hunter::new(pose, &config, &viewport, 0.0, &mut rng);
        let first_spawn = config.first_spawn_delay.sample(&mut rng) as f64;
        log::debug!("first prey batch due at {:.1}s", first_spawn);
        Ok(Self {
            config,
            rng,
            now: 0.0,
            viewport,
            pointer: Pointer::default(),
            hunter,
            population: Population::new(first_spawn),
            events: Vec::new(),
        })
    }

    // ----- Per-frame update -----

    /// Advance the whole simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.now += dt as f64;
        let now = self.now;

        // Prey first, so the hunter sees this frame's positions.
        for id in self.population.release_expired(now) {
            log::debug!("prey {:?} released from its web", id);
        }
        self.population
            .update(dt, now, &self.viewport, &self.config, &mut self.rng);
        if self.population.spawn_due(now) {
            self.population
                .spawn_batch(now, &self.viewport, &self.config, &mut self.rng);
        }

        arbitration::select_prey_target(&mut self.hunter, &self.population, &mut self.rng);

        let result = {
            let ctx = StepCtx {
                dt,
                now,
                config: &self.config,
                viewport: self.viewport,
            };
            match self.hunter.tag() {
                StateTag::ChasePrey => match chase::step(&mut self.hunter, &self.population, &ctx) {
                    ChaseOutcome::Continue => StepResult::Idle,
                    ChaseOutcome::TargetLost => StepResult::TargetLost,
                    ChaseOutcome::Contact(id) => StepResult::PreyContact(id),
                },
                StateTag::Attack => {
                    match attack::step(&mut self.hunter, self.pointer.pos, &ctx, &mut self.rng) {
                        AttackOutcome::Continue => StepResult::Idle,
                        AttackOutcome::Completed { hits, follow_up } => {
                            StepResult::AttackDone { hits, follow_up }
                        }
                    }
                }
                StateTag::Wander | StateTag::FollowPointer => {
                    wander::step(&mut self.hunter, self.pointer.position(), &ctx, &mut self.rng);
                    StepResult::Idle
                }
            }
        };

        match result {
            StepResult::Idle => {}
            StepResult::PreyContact(id) => self.catch_prey(id),
            StepResult::TargetLost => {
                self.hunter
                    .abort_to_wander(&self.viewport, now, &mut self.rng)
            }
            StepResult::AttackDone { hits, follow_up } => self.finish_attack(hits, follow_up),
        }

        if let Some(id) = arbitration::prey_in_reach(&self.hunter, &self.population, &self.config) {
            self.catch_prey(id);
        }

        let pointer = self.pointer.position();
        if arbitration::pointer_catch_ready(&self.hunter, pointer, now, &self.config) {
            outcome::catch_pointer(
                &mut self.hunter,
                &mut self.events,
                &self.config,
                &self.viewport,
                self.pointer.pos,
                now,
                &mut self.rng,
            );
        }
    }

    fn catch_prey(&mut self, id: PreyId) {
        outcome::catch_prey(
            &mut self.hunter,
            &mut self.population,
            &mut self.events,
            &self.config,
            &self.viewport,
            self.now,
            &mut self.rng,
            id,
        );
    }

    /// Runs once per completed session; preempted sessions never get here.
    fn finish_attack(&mut self, hits: u32, follow_up: FollowUp) {
        let now = self.now;
        self.hunter.return_to_wander();
        self.hunter
            .wander_anywhere(&self.viewport, now, &mut self.rng);
        self.hunter
            .schedule(TimerKey::Pause, now, follow_up.pause, &mut self.rng);
        self.hunter
            .schedule(TimerKey::IgnorePointer, now, follow_up.ignore_pointer, &mut self.rng);
        self.events.push(SimEvent::AttackCompleted { hits });
    }

    // ----- Inputs -----

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = Pointer {
            pos,
            observed: true,
        };
    }

    pub fn pointer_observed(&self) -> bool {
        self.pointer.observed
    }

    /// New surface size. Pending waypoints are pulled back inside.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.hunter.wander.waypoint = self.viewport.clamp(self.hunter.wander.waypoint, RESIZE_INSET);
        self.population.clamp_waypoints(&self.viewport);
        log::debug!("viewport resized to {}x{}", width, height);
    }

    /// A click on the hunter: it freezes and stops caring about the pointer
    /// for a few seconds.
    pub fn poke_hunter(&mut self) {
        let now = self.now;
        self.hunter
            .schedule(TimerKey::Pause, now, POKE_PAUSE, &mut self.rng);
        let until = self.hunter.timers.get(TimerKey::Pause);
        self.hunter.timers.set(TimerKey::IgnorePointer, until);
        self.events.push(SimEvent::HunterPoked {
            duration: (until - now) as f32,
        });
    }

    /// The surface was hidden for a while; drop the hunter somewhere fresh.
    pub fn resume_after_hidden(&mut self) {
        let now = self.now;
        let rng = &mut self.rng;
        let pos = self.viewport.random_point(rng, RESUME_INSET);
        let offset = Vec2::new(
            uniform(rng, -RESUME_WAYPOINT_RANGE, RESUME_WAYPOINT_RANGE),
            uniform(rng, -RESUME_WAYPOINT_RANGE, RESUME_WAYPOINT_RANGE),
        );
        let waypoint = self.viewport.clamp(pos + offset, RESIZE_INSET);

        self.hunter.pos = pos;
        self.hunter.return_to_wander();
        self.hunter.wander.head_for(waypoint, now);
        self.hunter.anim.rest();
        self.hunter.timers.set_after(TimerKey::Pause, now, RESUME_PAUSE);
        self.hunter
            .timers
            .set_after(TimerKey::IgnorePointer, now, RESUME_IGNORE);
        log::debug!("resumed at ({:.0}, {:.0})", pos.x, pos.y);
    }

    /// Place one prey directly, outside the spawn schedule.
    pub fn spawn_prey_at(&mut self, pos: Vec2, waypoint: Vec2) -> PreyId {
        self.population
            .spawn_at(pos, waypoint, self.now, &self.config, &mut self.rng)
    }

    // ----- Outputs -----

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hunter_pose(&self) -> HunterPose {
        self.hunter.pose()
    }

    pub fn hunter_state(&self) -> &HunterState {
        &self.hunter.state
    }

    pub fn hunter_state_tag(&self) -> StateTag {
        self.hunter.tag()
    }

    pub fn hunter_frame(&self) -> u32 {
        self.hunter.anim.frame
    }

    pub fn prey_poses(&self) -> Vec<PreyPose> {
        self.population.poses()
    }

    pub fn prey_count(&self) -> usize {
        self.population.len()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn hunter(&self) -> &Hunter {
        &self.hunter
    }

    /// Simulated seconds since construction.
    pub fn now(&self) -> f64 {
        self.now
    }
}
