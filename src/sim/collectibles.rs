//! Gift boxes the character can pick up
//!
//! Gifts hover and bob in place. Touching one removes it for good.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use super::state::SceneEvent;
use super::{Advance, TickContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    /// Cube center; `y` is rewritten every frame by the bob
    pub position: Vec3,
    /// Cube edge length
    pub size: f32,
    /// Resting height the bob oscillates around
    pub base_y: f32,
    /// Fixed random time offset so gifts bob out of step
    pub phase: f32,
}

impl Collectible {
    pub fn new(id: u32, x: f32, z: f32, size: f32, base_y: f32, phase: f32) -> Self {
        Self {
            id,
            position: Vec3::new(x, base_y, z),
            size,
            base_y,
            phase,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center_half_extents(self.position, Vec3::splat(self.size / 2.0))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectibleSet {
    items: Vec<Collectible>,
    bob_amplitude: f32,
    collected: usize,
}

impl CollectibleSet {
    pub fn new(bob_amplitude: f32) -> Self {
        Self {
            items: Vec::new(),
            bob_amplitude,
            collected: 0,
        }
    }

    pub fn insert(&mut self, item: Collectible) {
        self.items.push(item);
    }

    /// Vertical bob: `base_y + sin(time + phase) * amplitude`
    pub fn update(&mut self, time: f64) {
        for item in &mut self.items {
            let wave = (time + f64::from(item.phase)).sin() as f32;
            item.position.y = item.base_y + wave * self.bob_amplitude;
        }
    }

    /// Remove every gift touching `actor_box` and hand them back
    pub fn prune_collisions(&mut self, actor_box: &BoundingBox) -> Vec<Collectible> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if item.bounds().intersects(actor_box) {
                removed.push(item.clone());
                false
            } else {
                true
            }
        });
        self.collected += removed.len();
        removed
    }

    /// Prune against the character box and report each pickup.
    /// Returns how many gifts were collected.
    pub fn collect(&mut self, actor_box: &BoundingBox, events: &mut Vec<SceneEvent>) -> usize {
        let removed = self.prune_collisions(actor_box);
        for item in &removed {
            log::debug!("Collected gift {} at {:?}", item.id, item.position);
            events.push(SceneEvent::Collected {
                id: item.id,
                position: item.position,
            });
        }
        removed.len()
    }

    /// Live gifts in insertion order
    pub fn live(&self) -> &[Collectible] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total picked up this session
    pub fn collected(&self) -> usize {
        self.collected
    }
}

impl Advance for CollectibleSet {
    /// Cosmetic bob only; pickups go through [`CollectibleSet::collect`]
    fn advance(&mut self, _delta: f32, ctx: &mut TickContext<'_>) {
        self.update(ctx.elapsed);
    }
}
