//! What happens once something is caught.

use glam::Vec2;

use crate::config::{SimConfig, Span};
use crate::ecs::components::PreyId;
use crate::events::{PointerOutcome, SimEvent};
use crate::hunter::attack::sample_hits;
use crate::hunter::{AttackSession, Hunter};
use crate::kinematics::Viewport;
use crate::prey::Population;
use crate::timing::TimerKey;

// ----- Cooldowns after a prey catch -----

const PREY_PAUSE: Span = Span::new(2.0, 3.0);
const PREY_IGNORE: Span = Span::new(1.5, 3.5);

// ----- Cooldowns after a pointer catch -----

const POINTER_PAUSE: Span = Span::new(0.7, 1.6);
const POINTER_IGNORE: Span = Span::new(3.0, 12.0);
const WEB_IGNORE: Span = Span::new(1.2, 3.2);
const SIT_PAUSE: Span = Span::new(0.8, 2.2);
const SIT_IGNORE: Span = Span::new(1.5, 7.0);

/// What happens to a caught prey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreyFate {
    /// Stuck in a web for `duration` seconds, then gone.
    Ensnare { duration: f32 },
    Consume,
}

pub fn prey_fate(config: &SimConfig, rng: &mut fastrand::Rng) -> PreyFate {
    if rng.f32() < config.prey_ensnare_chance {
        PreyFate::Ensnare {
            duration: config.web_duration.sample(rng),
        }
    } else {
        PreyFate::Consume
    }
}

/// One roll over the configured chances, in web, attack, sit order.
pub fn pointer_outcome(config: &SimConfig, rng: &mut fastrand::Rng) -> PointerOutcome {
    let r = rng.f32();
    let web = config.web_chance;
    let attack = web + config.attack_chance;
    let sit = attack + config.cursor_sit_chance;
    if r < web {
        PointerOutcome::Web
    } else if r < attack {
        PointerOutcome::Attack
    } else if r < sit {
        PointerOutcome::Sit
    } else {
        PointerOutcome::SingleBite
    }
}

/// Resolve a prey catch: web or eat it, then back off for a moment.
#[allow(clippy::too_many_arguments)]
pub fn catch_prey(
    hunter: &mut Hunter,
    population: &mut Population,
    events: &mut Vec<SimEvent>,
    config: &SimConfig,
    viewport: &Viewport,
    now: f64,
    rng: &mut fastrand::Rng,
    id: PreyId,
) {
    let Some(pos) = population.position(id) else {
        hunter.abort_to_wander(viewport, now, rng);
        return;
    };
    events.push(SimEvent::PreyCaught { id, pos });

    match prey_fate(config, rng) {
        PreyFate::Ensnare { duration } => {
            population.ensnare(id, now + duration as f64);
            events.push(SimEvent::WebPlaced {
                pos,
                size: config.web_size.sample(rng),
                duration,
            });
            log::debug!("prey {:?} webbed for {:.1}s", id, duration);
        }
        PreyFate::Consume => {
            population.remove(id);
            log::debug!("prey {:?} eaten", id);
        }
    }

    hunter.schedule(TimerKey::Pause, now, PREY_PAUSE, rng);
    hunter.schedule(TimerKey::IgnorePointer, now, PREY_IGNORE, rng);
    hunter.return_to_wander();
    hunter.wander_nearby(viewport, now, rng);
}

/// Resolve a pointer catch with one sampled outcome.
pub fn catch_pointer(
    hunter: &mut Hunter,
    events: &mut Vec<SimEvent>,
    config: &SimConfig,
    viewport: &Viewport,
    pointer: Vec2,
    now: f64,
    rng: &mut fastrand::Rng,
) -> PointerOutcome {
    hunter.schedule(TimerKey::Pause, now, POINTER_PAUSE, rng);
    hunter.schedule(TimerKey::IgnorePointer, now, POINTER_IGNORE, rng);

    let outcome = pointer_outcome(config, rng);
    match outcome {
        PointerOutcome::Web => {
            let size = config.web_size.sample(rng);
            events.push(SimEvent::WebPlaced {
                pos: viewport.clamp(pointer, size / 2.0),
                size,
                duration: config.web_duration.sample(rng),
            });
            hunter.return_to_wander();
            hunter.wander_anywhere(viewport, now, rng);
            hunter.schedule(TimerKey::IgnorePointer, now, WEB_IGNORE, rng);
        }
        PointerOutcome::Attack => {
            let hits = sample_hits(config.attack_min_hits, config.attack_max_hits, rng);
            let session = if hits >= 2 {
                AttackSession::multi(hits, rng)
            } else {
                AttackSession::single(hits, rng)
            };
            hunter.start_attack(session);
        }
        PointerOutcome::Sit => {
            hunter.return_to_wander();
            hunter.schedule(TimerKey::Pause, now, SIT_PAUSE, rng);
            hunter.schedule(TimerKey::IgnorePointer, now, SIT_IGNORE, rng);
            let until = hunter.timers.get(TimerKey::Pause);
            let at = hunter.pos;
            hunter.wander.settle(at, until);
        }
        PointerOutcome::SingleBite => {
            hunter.start_attack(AttackSession::single(1, rng));
        }
    }

    log::debug!("pointer caught: {:?}", outcome);
    events.push(SimEvent::PointerCaught { outcome });
    outcome
}
