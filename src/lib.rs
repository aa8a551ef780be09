//! A spider that lives on the desktop: it hunts roaches that scuttle in from
//! the screen edges and, when nothing else is around, stalks the pointer.
//!
//! Everything here is headless. A frame driver feeds pointer and viewport
//! input into a [`Simulation`], calls [`Simulation::tick`] once per frame and
//! draws whatever the pose accessors report.

pub mod anim;
pub mod arbitration;
pub mod config;
pub mod ecs;
pub mod error;
pub mod events;
pub mod hunter;
pub mod kinematics;
pub mod outcome;
pub mod prey;
pub mod sim;
pub mod timing;

pub use config::{SimConfig, Span};
pub use ecs::components::PreyId;
pub use error::ConfigError;
pub use events::{PointerOutcome, SimEvent};
pub use hunter::{HunterPose, HunterState, StateTag};
pub use kinematics::Viewport;
pub use prey::PreyPose;
pub use sim::Simulation;
