use glam::Vec2;

use crate::kinematics::{uniform, Viewport};

/// How far outside the edge new prey appear.
pub const EDGE_MARGIN: f32 = 20.0;
/// Inset for the along-edge coordinate.
const ALONG_INSET: f32 = 20.0;
/// Inset for the first waypoint's across-edge coordinate.
const ACROSS_INSET: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(0..Self::ALL.len())]
    }
}

/// Weighted batch size: mostly one, sometimes two, rarely a swarm of 3-5.
pub fn sample_batch_count(rng: &mut fastrand::Rng) -> u32 {
    let r = rng.f32();
    if r < 0.80 {
        1
    } else if r < 0.95 {
        2
    } else {
        rng.u32(3..6)
    }
}

/// Spawn point just off `edge` plus a first waypoint inside the viewport.
pub fn edge_placement(edge: Edge, viewport: &Viewport, rng: &mut fastrand::Rng) -> (Vec2, Vec2) {
    let w = viewport.width;
    let h = viewport.height;
    let along = |rng: &mut fastrand::Rng, extent: f32| {
        uniform(rng, ALONG_INSET, (extent - ALONG_INSET).max(ALONG_INSET))
    };
    let across = |rng: &mut fastrand::Rng, extent: f32| {
        uniform(rng, ACROSS_INSET, (extent - ACROSS_INSET).max(ACROSS_INSET))
    };

    let (pos, waypoint) = match edge {
        Edge::Left => {
            let y = along(rng, h);
            (Vec2::new(-EDGE_MARGIN, y), Vec2::new(across(rng, w), along(rng, h)))
        }
        Edge::Right => {
            let y = along(rng, h);
            (Vec2::new(w + EDGE_MARGIN, y), Vec2::new(across(rng, w), along(rng, h)))
        }
        Edge::Top => {
            let x = along(rng, w);
            (Vec2::new(x, -EDGE_MARGIN), Vec2::new(along(rng, w), across(rng, h)))
        }
        Edge::Bottom => {
            let x = along(rng, w);
            (Vec2::new(x, h + EDGE_MARGIN), Vec2::new(along(rng, w), across(rng, h)))
        }
    };

    // Small viewports: keep the along-edge coordinate and waypoint on screen.
    let pos = match edge {
        Edge::Left | Edge::Right => Vec2::new(pos.x, pos.y.min(h.max(0.0))),
        Edge::Top | Edge::Bottom => Vec2::new(pos.x.min(w.max(0.0)), pos.y),
    };
    let waypoint = waypoint.min(Vec2::new(w, h)).max(Vec2::ZERO);
    (pos, waypoint)
}
