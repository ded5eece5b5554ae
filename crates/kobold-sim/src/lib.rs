//! Top-level simulation context.
//!
//! [`Simulation`] owns the LOD manager, the consumers it ranks, the camera rig
//! that supplies the viewpoint, and the player's inventory. Nothing is
//! globally reachable; every collaborator is passed in explicitly.

mod error;
mod host;
mod simulation;
mod wanderer;

pub use error::SimError;
pub use host::HeadlessHost;
pub use simulation::{Simulation, StepReport, default_equipment};
pub use wanderer::Wanderer;
