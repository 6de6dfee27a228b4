//! Scene state and one-time setup
//!
//! Owns every component. Setup seeds the obstacle field, trees and gifts
//! from a single run seed; the snowfall draws from its own RNG stream so
//! placement retries never shift the particle sequence.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::ActorController;
use super::bounds::{BoundsIndex, Obstacle};
use super::collectibles::{Collectible, CollectibleSet};
use super::particles::ParticleField;
use super::placement::{PlacementRequest, PlacementSampler, Region};
use crate::config::{ExhaustionPolicy, SceneConfig};
use crate::error::SceneError;
use crate::rotate_by_yaw;

/// Character animation clips the host mixer cross-fades between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationClip {
    Idle,
    Walking,
    Jump,
}

impl AnimationClip {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationClip::Idle => "Idle",
            AnimationClip::Walking => "Walking",
            AnimationClip::Jump => "Jump",
        }
    }

    /// Cross-fade time when switching into this clip
    pub fn fade_duration(&self) -> f32 {
        use crate::consts::{FADE_IDLE, FADE_JUMP, FADE_WALK};
        match self {
            AnimationClip::Idle => FADE_IDLE,
            AnimationClip::Walking => FADE_WALK,
            AnimationClip::Jump => FADE_JUMP,
        }
    }
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Fade the character mixer to `clip` over `fade` seconds
    Animation { clip: AnimationClip, fade: f32 },
    /// A gift was picked up
    Collected { id: u32, position: Vec3 },
}

/// A decorative tree; blocks placement but not movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub id: u32,
    pub position: Vec3,
    pub scale: f32,
}

/// Follow camera trailing the character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    /// Offset in the character's local frame
    pub offset: Vec3,
}

impl CameraRig {
    pub fn new(offset: Vec3) -> Self {
        Self {
            position: offset,
            target: Vec3::ZERO,
            offset,
        }
    }

    /// Sit at the rotated offset from the target and look at it
    pub fn follow(&mut self, target: Vec3, yaw: f32) {
        self.position = target + rotate_by_yaw(self.offset, yaw);
        self.target = target;
    }
}

/// RNG stream derivation from the run seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub const SETUP_STREAM: u64 = 0;
    pub const SNOW_STREAM: u64 = 1;

    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        if self.stream == 0 {
            Pcg32::seed_from_u64(self.seed)
        } else {
            Pcg32::new(self.seed, self.stream)
        }
    }
}

/// Complete scene
pub struct Scene {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SceneConfig,
    pub bounds: BoundsIndex,
    pub trees: Vec<Tree>,
    pub gifts: CollectibleSet,
    pub snow: ParticleField,
    pub actor: ActorController,
    pub camera: CameraRig,
    /// Seconds since the first tick (drives gift bobbing); f64 so long
    /// sessions keep resolving a single frame delta
    pub elapsed: f64,
    /// Ticks run so far
    pub frame: u64,
    /// Props dropped at setup under [`ExhaustionPolicy::Skip`]
    pub skipped: Vec<&'static str>,
    next_id: u32,
}

impl Scene {
    /// Validate `config` and build the scene for `seed`
    pub fn new(seed: u64, config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let snow = ParticleField::new(
            &config.snow,
            RngState::new(seed, RngState::SNOW_STREAM).to_rng(),
        )?;
        let actor = ActorController::new(&config.actor);
        let mut camera = CameraRig::new(config.camera.offset);
        camera.follow(actor.position, actor.facing);

        let mut scene = Self {
            seed,
            bounds: BoundsIndex::new(),
            trees: Vec::new(),
            gifts: CollectibleSet::new(config.gifts.bob_amplitude),
            snow,
            actor,
            camera,
            elapsed: 0.0,
            frame: 0,
            skipped: Vec::new(),
            next_id: 1,
            config,
        };

        let mut rng = RngState::new(seed, RngState::SETUP_STREAM).to_rng();
        scene.scatter_obstacles(&mut rng)?;
        scene.plant_trees(&mut rng)?;
        scene.place_gifts(&mut rng)?;

        log::info!(
            "Scene ready (seed {}): {} obstacles, {} trees, {} gifts, {} flakes",
            seed,
            scene.bounds.len(),
            scene.trees.len(),
            scene.gifts.len(),
            scene.snow.len()
        );
        Ok(scene)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn scatter_obstacles(&mut self, rng: &mut Pcg32) -> Result<(), SceneError> {
        let cfg = self.config.obstacles.clone();
        let region = Region::Disk {
            radius: self.config.ground.radius,
        };

        for _ in 0..cfg.count {
            let height = rng.random::<f32>() * (cfg.max_height - cfg.min_height) + cfg.min_height;
            let mut request = PlacementRequest::point("obstacle", region, cfg.exclusion_radius);
            if !cfg.allow_overlap {
                request.footprint = cfg.radius * 2.0;
                request.avoid_obstacles = true;
            }

            let Some(p) = self.sample(rng, &request)? else {
                continue;
            };
            let id = self.next_entity_id();
            self.bounds
                .insert(Obstacle::hex_prism(id, p.x, p.y, cfg.radius, height));
        }
        Ok(())
    }

    fn plant_trees(&mut self, rng: &mut Pcg32) -> Result<(), SceneError> {
        let cfg = self.config.trees.clone();
        let request = PlacementRequest::footprint(
            "tree",
            Region::Rect {
                min: Vec2::splat(cfg.region_min),
                max: Vec2::splat(cfg.region_max),
            },
            cfg.footprint,
            self.config.placement.margin,
        )
        .avoiding(self.actor.position);

        for _ in 0..cfg.count {
            let Some(p) = self.sample(rng, &request)? else {
                continue;
            };
            let id = self.next_entity_id();
            self.trees.push(Tree {
                id,
                position: Vec3::new(p.x, 0.0, p.y),
                scale: cfg.scale,
            });
        }
        Ok(())
    }

    fn place_gifts(&mut self, rng: &mut Pcg32) -> Result<(), SceneError> {
        let cfg = self.config.gifts.clone();
        let request = PlacementRequest::footprint(
            "gift",
            Region::Square {
                half_extent: cfg.region_half_extent,
            },
            cfg.size,
            self.config.placement.margin,
        )
        .avoiding(self.actor.position);
        let base_y = cfg.size / 2.0 + cfg.lift;

        for _ in 0..cfg.count {
            let Some(p) = self.sample(rng, &request)? else {
                continue;
            };
            let phase = rng.random::<f32>() * crate::consts::GIFT_PHASE_RANGE;
            let id = self.next_entity_id();
            self.gifts
                .insert(Collectible::new(id, p.x, p.y, cfg.size, base_y, phase));
        }
        Ok(())
    }

    /// Run the sampler and apply the exhaustion policy
    fn sample(
        &mut self,
        rng: &mut Pcg32,
        request: &PlacementRequest,
    ) -> Result<Option<Vec2>, SceneError> {
        let sampler = PlacementSampler::new(&self.bounds, self.config.placement.max_attempts);
        match sampler.sample_position(rng, request) {
            Ok(p) => Ok(Some(p)),
            Err(err @ SceneError::PlacementExhausted { .. }) => {
                let policy = self.config.placement.on_exhausted;
                log::warn!("{err} (on_exhausted = {})", policy.as_str());
                match policy {
                    ExhaustionPolicy::Skip => {
                        self.skipped.push(request.what);
                        Ok(None)
                    }
                    ExhaustionPolicy::Abort => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}
