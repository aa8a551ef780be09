use glam::Vec2;

/// Stable prey identifier. Handed out in increasing order and never reused,
/// unlike `hecs::Entity` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreyId(pub u64);

/// Current world position in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Sprite rotation in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// Sprite width in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub size: f32,
}

/// Per-prey roaming AI.
#[derive(Debug, Clone, Copy)]
pub struct Roam {
    pub waypoint: Vec2,
    /// Hold position until this instant.
    pub pause_until: f64,
    /// When the current waypoint was picked.
    pub roam_started: f64,
    /// Lateral "scurry" oscillation.
    pub arc_phase: f32,
    /// Radians per second.
    pub arc_speed: f32,
    /// Pixels per second at full agility.
    pub arc_amplitude: f32,
    /// 0..1, scales speed and oscillation.
    pub agility: f32,
}

/// Caught in a web: inert until released (and then removed).
#[derive(Debug, Clone, Copy)]
pub struct Ensnared {
    pub release_at: f64,
    pub thrash_timer: f32,
}
