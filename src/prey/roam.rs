use glam::Vec2;

use crate::anim::AnimState;
use crate::config::{SimConfig, Span};
use crate::ecs::components::{Ensnared, Heading, Position, Roam};
use crate::kinematics::{direction, Viewport};

/// Seconds per prey animation frame.
const FRAME_INTERVAL: f32 = 0.040;
/// Seconds between random twitches while stuck in a web.
const THRASH_INTERVAL: f32 = 0.080;
/// Close enough to a waypoint to pick the next one.
const ARRIVE_EPSILON: f32 = 6.0;
/// Waypoints not reached within this many seconds are abandoned.
const MAX_ROAM_TIME: f64 = 8.0;
/// Chance to stop for a moment at each new waypoint.
const PAUSE_CHANCE: f32 = 0.45;
const PAUSE: Span = Span::new(0.2, 1.8);
/// Waypoints keep this far from the edges.
pub const WAYPOINT_INSET: f32 = 20.0;

/// Roaming AI for every prey: animation, pauses, waypoint steering with a
/// sideways scurry.
pub fn update(
    world: &mut hecs::World,
    dt: f32,
    now: f64,
    viewport: &Viewport,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) {
    for (_, (pos, heading, anim, roam, ensnared)) in world.query_mut::<(
        &mut Position,
        &mut Heading,
        &mut AnimState,
        &mut Roam,
        Option<&mut Ensnared>,
    )>() {
        anim.advance(dt, FRAME_INTERVAL);

        if let Some(web) = ensnared {
            web.thrash_timer += dt;
            if web.thrash_timer > THRASH_INTERVAL {
                web.thrash_timer = 0.0;
                heading.0 = rng.f32() * 360.0;
            }
            continue;
        }

        if now < roam.pause_until {
            continue;
        }

        let to_target = roam.waypoint - pos.0;
        let dist = to_target.length();
        if dist < ARRIVE_EPSILON || now > roam.roam_started + MAX_ROAM_TIME {
            roam.waypoint = viewport.random_point(rng, WAYPOINT_INSET);
            roam.pause_until = if rng.f32() < PAUSE_CHANCE {
                now + PAUSE.sample(rng) as f64
            } else {
                0.0
            };
            roam.roam_started = now;
            continue;
        }

        let forward = direction(pos.0, roam.waypoint);
        let speed = config.prey_speed * (0.6 + roam.agility * 0.8);
        roam.arc_phase += dt * roam.arc_speed;
        let lateral = roam.arc_phase.sin() * roam.arc_amplitude * roam.agility;
        pos.0 += forward * (speed * dt).min(dist) + forward.perp() * lateral * dt;

        heading.0 = to_target.y.atan2(to_target.x).to_degrees() + 180.0;
    }
}

/// Prey that have scurried this far off screen are gone for good.
pub const DESPAWN_MARGIN: f32 = 400.0;

/// Entities that left the viewport for good.
pub fn wandered_off(world: &hecs::World, viewport: &Viewport) -> Vec<hecs::Entity> {
    world
        .query::<&Position>()
        .iter()
        .filter(|(_, pos)| viewport.is_far_outside(pos.0, DESPAWN_MARGIN))
        .map(|(entity, _)| entity)
        .collect()
}

/// Roam state for a fresh prey heading to `waypoint`.
pub fn fresh_roam(waypoint: Vec2, now: f64, rng: &mut fastrand::Rng) -> Roam {
    Roam {
        waypoint,
        pause_until: 0.0,
        roam_started: now,
        arc_phase: rng.f32() * std::f32::consts::TAU,
        arc_speed: 1.0 + rng.f32() * 2.0,
        arc_amplitude: 6.0 + rng.f32() * 18.0,
        agility: 0.3 + rng.f32() * 0.7,
    }
}
