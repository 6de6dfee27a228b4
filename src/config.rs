//! Scene configuration
//!
//! Every tunable lives here, grouped by the component it feeds. Defaults
//! reproduce the stock scene; a JSON file may override any subset.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SceneError;

/// What setup does when a prop cannot be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Log and leave the prop out
    #[default]
    Skip,
    /// Fail scene construction
    Abort,
}

impl ExhaustionPolicy {
    /// Name as written in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            ExhaustionPolicy::Skip => "skip",
            ExhaustionPolicy::Abort => "abort",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Radius of the circular ground disk
    pub radius: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            radius: GROUND_RADIUS,
        }
    }
}

/// Hexagonal prism field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub count: usize,
    /// Circumradius of the hexagon
    pub radius: f32,
    pub min_height: f32,
    /// Exclusive upper bound for the random height
    pub max_height: f32,
    /// Keep-out radius around the spawn point
    pub exclusion_radius: f32,
    /// Prisms may interpenetrate each other (stock scene does)
    pub allow_overlap: bool,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            count: HEX_COUNT,
            radius: HEX_RADIUS,
            min_height: HEX_MIN_HEIGHT,
            max_height: HEX_MAX_HEIGHT,
            exclusion_radius: HEX_EXCLUSION_RADIUS,
            allow_overlap: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub count: usize,
    /// Square footprint edge used for overlap checks
    pub footprint: f32,
    /// Uniform render scale
    pub scale: f32,
    /// Sampling rectangle `[region_min, region_max)` on both axes
    pub region_min: f32,
    pub region_max: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            count: TREE_COUNT,
            footprint: TREE_FOOTPRINT,
            scale: TREE_SCALE,
            region_min: TREE_REGION_MIN,
            region_max: TREE_REGION_MAX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftConfig {
    pub count: usize,
    /// Cube edge length
    pub size: f32,
    /// Sampling square `[-h, h)` on both axes
    pub region_half_extent: f32,
    /// Hover height above half the cube size
    pub lift: f32,
    pub bob_amplitude: f32,
}

impl Default for GiftConfig {
    fn default() -> Self {
        Self {
            count: GIFT_COUNT,
            size: GIFT_SIZE,
            region_half_extent: GIFT_REGION_HALF_EXTENT,
            lift: GIFT_LIFT,
            bob_amplitude: GIFT_BOB_AMPLITUDE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub margin: f32,
    pub max_attempts: u32,
    pub on_exhausted: ExhaustionPolicy,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: PLACEMENT_MARGIN,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
            on_exhausted: ExhaustionPolicy::default(),
        }
    }
}

/// Snowfall volume and fade band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub count: usize,
    pub max_velocity: f32,
    pub fall_speed: f32,
    pub fade_start: f32,
    pub fade_end: f32,
    /// Walls sit at `±half_width` on x and z
    pub half_width: f32,
    /// Respawned flakes land in `[0, top)`
    pub top: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: SNOW_COUNT,
            max_velocity: SNOW_MAX_VELOCITY,
            fall_speed: SNOW_FALL_SPEED,
            fade_start: SNOW_FADE_START,
            fade_end: SNOW_FADE_END,
            half_width: SNOW_HALF_WIDTH,
            top: SNOW_TOP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub spawn: Vec3,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub jump_height: f32,
    pub turn_step: f32,
    pub collision_shrink: f32,
    pub half_width: f32,
    pub height: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::ZERO,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            jump_height: JUMP_HEIGHT,
            turn_step: TURN_STEP,
            collision_shrink: COLLISION_SHRINK,
            half_width: ACTOR_HALF_WIDTH,
            height: ACTOR_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the character, in its local frame
    pub offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::from_array(CAMERA_OFFSET),
        }
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ground: GroundConfig,
    pub obstacles: ObstacleConfig,
    pub trees: TreeConfig,
    pub gifts: GiftConfig,
    pub placement: PlacementConfig,
    pub snow: SnowConfig,
    pub actor: ActorConfig,
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config string
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every invariant before anything is built
    pub fn validate(&self) -> Result<(), SceneError> {
        positive("ground.radius", self.ground.radius)?;

        let o = &self.obstacles;
        positive("obstacles.radius", o.radius)?;
        non_negative("obstacles.min_height", o.min_height)?;
        if !(o.max_height > o.min_height) {
            return Err(SceneError::invalid(
                "obstacles.max_height",
                format!("must exceed min_height ({})", o.min_height),
            ));
        }
        non_negative("obstacles.exclusion_radius", o.exclusion_radius)?;
        if o.count > 0 && o.exclusion_radius >= self.ground.radius {
            return Err(SceneError::invalid(
                "obstacles.exclusion_radius",
                format!("must be smaller than ground.radius ({})", self.ground.radius),
            ));
        }

        let t = &self.trees;
        non_negative("trees.footprint", t.footprint)?;
        positive("trees.scale", t.scale)?;
        if !(t.region_max > t.region_min) {
            return Err(SceneError::invalid(
                "trees.region_max",
                format!("must exceed region_min ({})", t.region_min),
            ));
        }

        let g = &self.gifts;
        positive("gifts.size", g.size)?;
        positive("gifts.region_half_extent", g.region_half_extent)?;
        non_negative("gifts.bob_amplitude", g.bob_amplitude)?;
        finite("gifts.lift", g.lift)?;

        non_negative("placement.margin", self.placement.margin)?;
        if self.placement.max_attempts == 0 {
            return Err(SceneError::invalid("placement.max_attempts", "must be at least 1"));
        }

        let s = &self.snow;
        if s.count == 0 {
            return Err(SceneError::invalid("snow.count", "particle pool cannot be empty"));
        }
        non_negative("snow.max_velocity", s.max_velocity)?;
        positive("snow.fall_speed", s.fall_speed)?;
        if !(s.fade_start > s.fade_end) {
            return Err(SceneError::invalid(
                "snow.fade_start",
                format!("must be above fade_end ({})", s.fade_end),
            ));
        }
        positive("snow.half_width", s.half_width)?;
        positive("snow.top", s.top)?;

        let a = &self.actor;
        if !a.spawn.is_finite() {
            return Err(SceneError::invalid("actor.spawn", "must be finite"));
        }
        positive("actor.move_speed", a.move_speed)?;
        positive("actor.jump_speed", a.jump_speed)?;
        positive("actor.jump_height", a.jump_height)?;
        finite("actor.turn_step", a.turn_step)?;
        non_negative("actor.collision_shrink", a.collision_shrink)?;
        positive("actor.half_width", a.half_width)?;
        positive("actor.height", a.height)?;

        if !self.camera.offset.is_finite() {
            return Err(SceneError::invalid("camera.offset", "must be finite"));
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SceneError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SceneError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(SceneError::invalid(field, format!("cannot be negative, got {value}")));
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), SceneError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(SceneError::invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}
