//! Deterministic scene simulation
//!
//! All per-frame logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod bounds;
pub mod collectibles;
pub mod particles;
pub mod placement;
pub mod state;
pub mod tick;

pub use actor::{ActorController, ActorState, HeldKeys, InputEvent, JumpPhase};
pub use bounds::{BoundingBox, BoundsIndex, Obstacle};
pub use collectibles::{Collectible, CollectibleSet};
pub use particles::{Particle, ParticleField};
pub use placement::{PlacementRequest, PlacementSampler, Region};
pub use state::{AnimationClip, CameraRig, RngState, Scene, SceneEvent, Tree};
pub use tick::{TickInput, TickReport, tick};

/// Shared per-tick inputs handed to each component
pub struct TickContext<'a> {
    pub bounds: &'a BoundsIndex,
    pub events: &'a mut Vec<SceneEvent>,
    /// Seconds since the scene started
    pub elapsed: f64,
}

/// A component updated once per frame
pub trait Advance {
    fn advance(&mut self, delta: f32, ctx: &mut TickContext<'_>);
}
