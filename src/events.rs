use glam::Vec2;

use crate::ecs::components::PreyId;

/// How a pointer catch was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// A web was dropped where the pointer was grabbed.
    Web,
    /// A multi-hit (or single-hit, for one hit) attack sequence.
    Attack,
    /// The hunter just sits there for a while.
    Sit,
    /// Remaining probability mass: one quick bite.
    SingleBite,
}

/// Side effects for the presentation layer. Drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    PreyCaught {
        id: PreyId,
        pos: Vec2,
    },
    PointerCaught {
        outcome: PointerOutcome,
    },
    WebPlaced {
        pos: Vec2,
        /// Web width in pixels.
        size: f32,
        /// Seconds until the web fades.
        duration: f32,
    },
    AttackCompleted {
        hits: u32,
    },
    /// Somebody clicked the hunter. The presenter may show a message for
    /// `duration` seconds.
    HunterPoked {
        duration: f32,
    },
}
