use glam::Vec2;

use super::chase::APPROACH_FACTOR;
use super::{Hunter, HunterState, StepCtx, WANDER_INSET};
use crate::kinematics::direction;
use crate::timing::TimerKey;

/// Waypoint counts as reached inside this range.
const ARRIVE_DIST: f32 = 3.0;
/// The pointer makes the hunter twitchy inside this range.
const NEAR_POINTER: f32 = 48.0;
/// Roaming wobble fades out over the last stretch to a waypoint.
const WOBBLE_FADE_DIST: f32 = 60.0;

const WALK_FRAME: f32 = 0.080;
const AGITATED_FRAME: f32 = 0.050;

/// Idle roaming between waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct WanderState {
    pub waypoint: Vec2,
    /// When the current waypoint was picked.
    pub started: f64,
    /// Reached the waypoint and resting there.
    pub arrived: bool,
    pub dwell_until: f64,
    /// Per-hunter offset so the wobble doesn't look canned.
    pub wobble_phase: f32,
}

impl WanderState {
    pub fn new(waypoint: Vec2, now: f64, rng: &mut fastrand::Rng) -> Self {
        Self {
            waypoint,
            started: now,
            arrived: false,
            dwell_until: 0.0,
            wobble_phase: rng.f32() * std::f32::consts::TAU,
        }
    }

    pub fn head_for(&mut self, waypoint: Vec2, now: f64) {
        self.waypoint = waypoint;
        self.started = now;
        self.arrived = false;
    }

    /// Stay at `at` until `until`, then roam on.
    pub fn settle(&mut self, at: Vec2, until: f64) {
        self.waypoint = at;
        self.arrived = true;
        self.dwell_until = until;
    }
}

/// Pick the next waypoint when the current one is done with.
fn refresh_waypoint(hunter: &mut Hunter, ctx: &StepCtx, rng: &mut fastrand::Rng) {
    let now = ctx.now;
    let w = &mut hunter.wander;
    if w.arrived {
        if now > w.dwell_until {
            let next = ctx.viewport.random_point(rng, WANDER_INSET);
            w.head_for(next, now);
        }
        return;
    }

    if hunter.pos.distance(w.waypoint) <= ARRIVE_DIST {
        w.arrived = true;
        w.dwell_until = now + ctx.config.idle_wander_pause.sample(rng) as f64;
    } else if now > w.started + ctx.config.idle_wander_after as f64 {
        let next = ctx.viewport.random_point(rng, WANDER_INSET);
        w.head_for(next, now);
    }
}

/// One tick of wandering or pointer-following. `pointer` is `None` until the
/// pointer has been seen.
pub fn step(hunter: &mut Hunter, pointer: Option<Vec2>, ctx: &StepCtx, rng: &mut fastrand::Rng) {
    let now = ctx.now;
    let config = ctx.config;

    let attentive =
        hunter
            .timers
            .attention_open(now, config.attention_open, config.attention_closed, rng);
    let follow = pointer.filter(|_| attentive && hunter.timers.passed(TimerKey::IgnorePointer, now));

    let target = match follow {
        Some(p) => {
            if hunter.state != HunterState::FollowPointer {
                log::debug!("following the pointer");
            }
            hunter.state = HunterState::FollowPointer;
            p
        }
        None => {
            if hunter.state == HunterState::FollowPointer {
                log::debug!("lost interest in the pointer");
            }
            hunter.state = HunterState::Wander;
            refresh_waypoint(hunter, ctx, rng);
            hunter.wander.waypoint
        }
    };
    let following = follow.is_some();

    if hunter.timers.pending(TimerKey::Pause, now) {
        hunter.anim.rest();
    } else {
        let dist = hunter.pos.distance(target);
        let near_pointer = pointer.map_or(false, |p| p.distance(hunter.pos) < NEAR_POINTER);
        let agitated = near_pointer && !following;
        let speed = if following {
            config.base_speed * APPROACH_FACTOR
        } else if agitated {
            config.angry_speed
        } else {
            config.base_speed
        };

        if dist > ARRIVE_DIST {
            let forward = direction(hunter.pos, target);
            let sway = (2.0 * (now as f32 + hunter.wander.wobble_phase)).sin();
            let wobble = if following {
                0.0
            } else if agitated {
                sway * config.wobble_amplitude
            } else {
                sway * config.wander_wobble_amplitude * (dist / WOBBLE_FADE_DIST).min(1.0)
            };
            hunter.pos += forward * (speed * ctx.dt).min(dist) + forward.perp() * wobble * ctx.dt;

            let interval = if agitated { AGITATED_FRAME } else { WALK_FRAME };
            hunter.anim.advance(ctx.dt, ctx.frame_interval(interval));
        } else {
            hunter.anim.rest();
        }
    }

    hunter.face_toward(target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SimConfig, Span};
    use crate::hunter::{HunterPose, StateTag};
    use crate::kinematics::Viewport;

    fn setup(config: &SimConfig, at: Vec2) -> (Hunter, fastrand::Rng) {
        let mut rng = fastrand::Rng::with_seed(77);
        let h = Hunter::new(
            HunterPose { pos: at, angle: 0.0 },
            config,
            &Viewport::new(800.0, 600.0),
            0.0,
            &mut rng,
        );
        (h, rng)
    }

    fn ctx(config: &SimConfig, now: f64) -> StepCtx<'_> {
        StepCtx {
            dt: 1.0 / 60.0,
            now,
            config,
            viewport: Viewport::new(800.0, 600.0),
        }
    }

    #[test]
    fn follows_pointer_only_while_attention_is_open() {
        let config = SimConfig::default();
        let (mut h, mut rng) = setup(&config, Vec2::new(100.0, 100.0));
        let pointer = Some(Vec2::new(400.0, 400.0));

        step(&mut h, pointer, &ctx(&config, 0.1), &mut rng);
        assert_eq!(h.tag(), StateTag::FollowPointer);

        // Past the open window, inside the closed one.
        let closed_at = h.timers.get(TimerKey::AttentionOpenUntil) + 0.5;
        step(&mut h, pointer, &ctx(&config, closed_at), &mut rng);
        assert_eq!(h.tag(), StateTag::Wander);
    }

    #[test]
    fn ignore_window_blocks_following() {
        let config = SimConfig::default();
        let (mut h, mut rng) = setup(&config, Vec2::new(100.0, 100.0));
        h.timers.set(TimerKey::IgnorePointer, 10.0);
        step(&mut h, Some(Vec2::new(400.0, 400.0)), &ctx(&config, 0.1), &mut rng);
        assert_eq!(h.tag(), StateTag::Wander);
    }

    #[test]
    fn unseen_pointer_is_ignored() {
        let config = SimConfig::default();
        let (mut h, mut rng) = setup(&config, Vec2::new(100.0, 100.0));
        step(&mut h, None, &ctx(&config, 0.1), &mut rng);
        assert_eq!(h.tag(), StateTag::Wander);
    }

    #[test]
    fn paused_hunter_holds_still() {
        let config = SimConfig::default();
        let (mut h, mut rng) = setup(&config, Vec2::new(100.0, 100.0));
        h.timers.set(TimerKey::Pause, 5.0);
        h.anim.frame = 4;
        let start = h.pos;
        step(&mut h, None, &ctx(&config, 1.0), &mut rng);
        assert_eq!(h.pos, start);
        assert_eq!(h.anim.frame, 0);
    }

    #[test]
    fn reaches_waypoint_then_dwells_then_moves_on() {
        let config = SimConfig {
            idle_wander_pause: Span::new(1.0, 1.0),
            wander_wobble_amplitude: 0.0,
            ..SimConfig::default()
        };
        let (mut h, mut rng) = setup(&config, Vec2::new(100.0, 100.0));
        h.wander.head_for(Vec2::new(130.0, 100.0), 0.0);

        let mut now = 0.0;
        while !h.wander.arrived {
            now += 1.0 / 60.0;
            step(&mut h, None, &ctx(&config, now), &mut rng);
            assert!(now < 5.0, "never arrived");
        }
        assert!(h.pos.distance(Vec2::new(130.0, 100.0)) <= ARRIVE_DIST);
        let dwell_until = h.wander.dwell_until;
        assert!((dwell_until - now - 1.0).abs() < 1e-6);

        let parked = h.pos;
        step(&mut h, None, &ctx(&config, now + 0.5), &mut rng);
        assert!(h.pos.distance(parked) <= ARRIVE_DIST);

        step(&mut h, None, &ctx(&config, dwell_until + 0.1), &mut rng);
        assert!(!h.wander.arrived);
    }

    #[test]
    fn stale_waypoint_is_replaced() {
        let config = SimConfig::default();
        let (mut h, mut rng) = setup(&config, Vec2::new(100.0, 100.0));
        h.wander.head_for(Vec2::new(700.0, 500.0), 0.0);
        step(&mut h, None, &ctx(&config, 10.5), &mut rng);
        assert_eq!(h.wander.started, 10.5);
    }
}
