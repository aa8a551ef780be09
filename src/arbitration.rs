//! Per-tick decisions that sit above the individual hunter states: which
//! prey to go after, and whether anything is close enough to catch.

use glam::Vec2;

use crate::config::SimConfig;
use crate::ecs::components::PreyId;
use crate::hunter::{Hunter, HunterState};
use crate::prey::Population;
use crate::timing::TimerKey;

/// Prey always win. Point the hunter at the nearest free prey, keeping an
/// ongoing chase unless the nearest one changed. Returns true when the state
/// was replaced.
pub fn select_prey_target(
    hunter: &mut Hunter,
    population: &Population,
    rng: &mut fastrand::Rng,
) -> bool {
    let Some(nearest) = population.find_nearest(hunter.pos) else {
        return false;
    };
    if let HunterState::ChasePrey(chase) = &hunter.state {
        if chase.target == nearest.id {
            return false;
        }
    }
    hunter.start_chase(nearest.id, rng);
    true
}

/// First free prey within catch distance of the hunter, lowest id first.
pub fn prey_in_reach(hunter: &Hunter, population: &Population, config: &SimConfig) -> Option<PreyId> {
    population.first_within(hunter.pos, config.catch_dist)
}

/// Whether the hunter grabs the pointer this tick.
pub fn pointer_catch_ready(
    hunter: &Hunter,
    pointer: Option<Vec2>,
    now: f64,
    config: &SimConfig,
) -> bool {
    let Some(pointer) = pointer else {
        return false;
    };
    if matches!(hunter.state, HunterState::Attack(_) | HunterState::ChasePrey(_)) {
        return false;
    }
    hunter.timers.passed(TimerKey::IgnorePointer, now)
        && hunter.timers.passed(TimerKey::Pause, now)
        && hunter.pos.distance(pointer) < config.grab_dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunter::{AttackSession, HunterPose, StateTag};
    use crate::kinematics::Viewport;

    fn setup(at: Vec2) -> (Hunter, Population, SimConfig, fastrand::Rng) {
        let mut rng = fastrand::Rng::with_seed(21);
        let config = SimConfig::default();
        let hunter = Hunter::new(
            HunterPose { pos: at, angle: 0.0 },
            &config,
            &Viewport::new(800.0, 600.0),
            0.0,
            &mut rng,
        );
        (hunter, Population::new(f64::MAX), config, rng)
    }

    #[test]
    fn no_prey_leaves_state_alone() {
        let (mut h, pop, _, mut rng) = setup(Vec2::new(100.0, 100.0));
        assert!(!select_prey_target(&mut h, &pop, &mut rng));
        assert_eq!(h.tag(), StateTag::Wander);
    }

    #[test]
    fn nearest_prey_preempts_attack() {
        let (mut h, mut pop, config, mut rng) = setup(Vec2::new(100.0, 100.0));
        h.start_attack(AttackSession::multi(3, &mut rng));
        let id = pop.spawn_at(Vec2::new(300.0, 100.0), Vec2::ZERO, 0.0, &config, &mut rng);

        assert!(select_prey_target(&mut h, &pop, &mut rng));
        match &h.state {
            HunterState::ChasePrey(c) => assert_eq!(c.target, id),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn chase_is_kept_until_a_closer_prey_appears() {
        let (mut h, mut pop, config, mut rng) = setup(Vec2::new(100.0, 100.0));
        let far = pop.spawn_at(Vec2::new(400.0, 100.0), Vec2::ZERO, 0.0, &config, &mut rng);
        assert!(select_prey_target(&mut h, &pop, &mut rng));
        assert!(!select_prey_target(&mut h, &pop, &mut rng));

        let near = pop.spawn_at(Vec2::new(150.0, 100.0), Vec2::ZERO, 0.0, &config, &mut rng);
        assert!(select_prey_target(&mut h, &pop, &mut rng));
        match &h.state {
            HunterState::ChasePrey(c) => {
                assert_eq!(c.target, near);
                assert_ne!(c.target, far);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn webbed_prey_are_out_of_reach() {
        let (h, mut pop, config, mut rng) = setup(Vec2::new(100.0, 100.0));
        let id = pop.spawn_at(Vec2::new(105.0, 100.0), Vec2::ZERO, 0.0, &config, &mut rng);
        assert_eq!(prey_in_reach(&h, &pop, &config), Some(id));
        pop.ensnare(id, 10.0);
        assert_eq!(prey_in_reach(&h, &pop, &config), None);
    }

    #[test]
    fn pointer_catch_needs_every_condition() {
        let (mut h, _, config, mut rng) = setup(Vec2::new(100.0, 100.0));
        let close = Some(Vec2::new(102.0, 100.0));

        assert!(pointer_catch_ready(&h, close, 1.0, &config));
        assert!(!pointer_catch_ready(&h, None, 1.0, &config));
        assert!(!pointer_catch_ready(&h, Some(Vec2::new(110.0, 100.0)), 1.0, &config));

        h.timers.set(TimerKey::IgnorePointer, 2.0);
        assert!(!pointer_catch_ready(&h, close, 1.0, &config));
        h.timers.set(TimerKey::IgnorePointer, 0.0);

        h.timers.set(TimerKey::Pause, 2.0);
        assert!(!pointer_catch_ready(&h, close, 1.0, &config));
        h.timers.set(TimerKey::Pause, 0.0);

        h.start_attack(AttackSession::single(1, &mut rng));
        assert!(!pointer_catch_ready(&h, close, 1.0, &config));
    }
}
