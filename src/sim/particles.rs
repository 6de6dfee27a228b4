//! Snowfall particle field
//!
//! Fixed-size pool stored as parallel arrays so the host can upload
//! positions and alphas directly. Flakes are never destroyed: once one
//! sinks below the fade band it is respawned somewhere in the top volume.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Advance, TickContext};
use crate::config::SnowConfig;
use crate::error::SceneError;

/// Snapshot of a single flake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Opacity; linear in height inside the fade band, not clamped
    pub alpha: f32,
}

pub struct ParticleField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    alphas: Vec<f32>,
    config: SnowConfig,
    rng: Pcg32,
}

impl ParticleField {
    /// Scatter `config.count` flakes through the volume
    pub fn new(config: &SnowConfig, mut rng: Pcg32) -> Result<Self, SceneError> {
        if config.count == 0 {
            return Err(SceneError::invalid("snow.count", "particle pool cannot be empty"));
        }

        let mut positions = Vec::with_capacity(config.count);
        let mut velocities = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            positions.push(spawn_point(&mut rng, config));
            // vy is kept for the buffer layout but falling uses fall_speed
            velocities.push(Vec3::new(
                (rng.random::<f32>() - 0.5) * config.max_velocity,
                (rng.random::<f32>() - 0.5) * config.max_velocity,
                (rng.random::<f32>() - 0.5) * config.max_velocity,
            ));
        }

        log::debug!("Snowfall pool: {} flakes", config.count);

        Ok(Self {
            positions,
            velocities,
            alphas: vec![1.0; config.count],
            config: config.clone(),
            rng,
        })
    }

    /// Move every flake one step: drift, fall, fade, respawn, bounce
    pub fn advance(&mut self) {
        let cfg = &self.config;
        let half_width = cfg.half_width;
        let fade_span = cfg.fade_start - cfg.fade_end;

        for i in 0..self.positions.len() {
            let pos = &mut self.positions[i];
            let vel = &mut self.velocities[i];

            pos.x += vel.x;
            pos.y -= cfg.fall_speed;
            pos.z += vel.z;

            self.alphas[i] = if pos.y < cfg.fade_start {
                (pos.y - cfg.fade_end) / fade_span
            } else {
                1.0
            };

            if pos.y < cfg.fade_end {
                *pos = spawn_point(&mut self.rng, cfg);
                self.alphas[i] = 1.0;
            }

            // Reflect off the walls; no sub-step, so a flake may sit one step outside
            if pos.x > half_width || pos.x < -half_width {
                vel.x = -vel.x;
            }
            if pos.z > half_width || pos.z < -half_width {
                vel.z = -vel.z;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Positions as tightly packed `f32` xyz triples for vertex upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn alpha_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.alphas)
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            velocity: self.velocities[index],
            alpha: self.alphas[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).filter_map(|i| self.particle(i))
    }
}

impl Advance for ParticleField {
    /// Flakes move a fixed amount per frame regardless of `delta`
    fn advance(&mut self, _delta: f32, _ctx: &mut TickContext<'_>) {
        ParticleField::advance(self);
    }
}

fn spawn_point(rng: &mut Pcg32, config: &SnowConfig) -> Vec3 {
    let w = config.half_width;
    Vec3::new(
        rng.random::<f32>() * 2.0 * w - w,
        rng.random::<f32>() * config.top,
        rng.random::<f32>() * 2.0 * w - w,
    )
}
