//! Snowfield - deterministic core for a snowy hexagon-field scene
//!
//! Core modules:
//! - `sim`: Simulation (bounds, placement, snowfall, character, gifts, frame tick)
//! - `config`: Data-driven scene tuning, loaded from JSON
//! - `error`: Setup and configuration errors
//!
//! Rendering, asset loading and camera orbit controls belong to the host.
//! The host drives [`sim::tick`] once per frame and reads back positions.

pub mod config;
pub mod error;
pub mod sim;

pub use config::SceneConfig;
pub use error::SceneError;

use glam::{Quat, Vec3};

/// Scene tuning constants (defaults for [`SceneConfig`])
pub mod consts {
    /// Host frame timestep used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Longest frame delta a tick will honor
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Circular ground plane
    pub const GROUND_RADIUS: f32 = 40.0;

    /// Hexagonal prism obstacles
    pub const HEX_COUNT: usize = 60;
    pub const HEX_RADIUS: f32 = 2.0;
    pub const HEX_MIN_HEIGHT: f32 = 1.0;
    pub const HEX_MAX_HEIGHT: f32 = 6.0;
    /// No obstacle center closer than this to the spawn point
    pub const HEX_EXCLUSION_RADIUS: f32 = 3.0;

    /// Trees (footprint is the assumed trunk+canopy diameter)
    pub const TREE_COUNT: usize = 5;
    pub const TREE_FOOTPRINT: f32 = 4.0;
    pub const TREE_SCALE: f32 = 2.0;
    pub const TREE_REGION_MIN: f32 = -40.0;
    pub const TREE_REGION_MAX: f32 = 30.0;

    /// Gift boxes
    pub const GIFT_COUNT: usize = 10;
    pub const GIFT_SIZE: f32 = 1.0;
    pub const GIFT_REGION_HALF_EXTENT: f32 = 20.0;
    /// Hover height above the ground (added to half the box size)
    pub const GIFT_LIFT: f32 = 2.0;
    pub const GIFT_BOB_AMPLITUDE: f32 = 0.5;
    /// Upper bound (exclusive) for the per-gift bobbing phase
    pub const GIFT_PHASE_RANGE: f32 = 1000.0;

    /// Extra clearance around a prop's footprint during placement
    pub const PLACEMENT_MARGIN: f32 = 0.1;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Snowfall
    pub const SNOW_COUNT: usize = 2000;
    pub const SNOW_MAX_VELOCITY: f32 = 0.5;
    /// Units per tick, not scaled by frame delta
    pub const SNOW_FALL_SPEED: f32 = 0.2;
    pub const SNOW_FADE_START: f32 = 50.0;
    pub const SNOW_FADE_END: f32 = -50.0;
    pub const SNOW_HALF_WIDTH: f32 = 1000.0;
    pub const SNOW_TOP: f32 = 2000.0;

    /// Character movement
    pub const MOVE_SPEED: f32 = 5.0;
    pub const JUMP_SPEED: f32 = 5.0;
    pub const JUMP_HEIGHT: f32 = 2.0;
    /// Radians per turn event
    pub const TURN_STEP: f32 = 0.1;
    /// Shrink applied to the character box before obstacle checks
    pub const COLLISION_SHRINK: f32 = 0.1;
    pub const ACTOR_HALF_WIDTH: f32 = 0.5;
    pub const ACTOR_HEIGHT: f32 = 2.5;

    /// Animation cross-fade durations (seconds)
    pub const FADE_WALK: f32 = 0.5;
    pub const FADE_JUMP: f32 = 0.2;
    pub const FADE_IDLE: f32 = 0.5;

    /// Follow camera offset in the character's local frame
    pub const CAMERA_OFFSET: [f32; 3] = [10.0, 5.0, 10.0];
}

/// Rotation about +Y for a facing angle (radians)
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// Rotate a local-space vector into world space for the given facing
#[inline]
pub fn rotate_by_yaw(local: Vec3, yaw: f32) -> Vec3 {
    yaw_rotation(yaw) * local
}

/// Horizontal distance from the origin, ignoring height
#[inline]
pub fn planar_distance(x: f32, z: f32) -> f32 {
    (x * x + z * z).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_by_yaw_forward() {
        let dir = rotate_by_yaw(Vec3::Z, 0.0);
        assert!((dir - Vec3::Z).length() < 1e-6);

        // Quarter turn left swings +Z onto +X
        let dir = rotate_by_yaw(Vec3::Z, FRAC_PI_2);
        assert!((dir - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_planar_distance() {
        assert!((planar_distance(3.0, 4.0) - 5.0).abs() < 1e-6);
    }
}
