//! Axis-aligned bounding boxes and the static obstacle index
//!
//! All collision in the scene is AABB vs AABB (or point) with closed
//! intervals, so touching faces count as overlap.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box; `min <= max` on every axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Box spanning two arbitrary corners
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap on all three axes
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && self.max.cmpge(p).all()
    }

    /// Grow (or shrink, for negative `amount`) every face by `amount`.
    ///
    /// Shrinking past zero thickness collapses that axis onto the center.
    pub fn expand_by_scalar(&self, amount: f32) -> Self {
        let min = self.min - Vec3::splat(amount);
        let max = self.max + Vec3::splat(amount);
        let center = self.center();
        let collapsed = min.cmpgt(max);
        Self {
            min: Vec3::select(collapsed, center, min),
            max: Vec3::select(collapsed, center, max),
        }
    }

    #[inline]
    pub fn translate(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// A static hexagonal prism standing on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Center of the prism (half its height above the ground)
    pub position: Vec3,
    pub height: f32,
    /// Circumradius of the hexagonal cross-section
    pub radius: f32,
    bounds: BoundingBox,
}

impl Obstacle {
    /// Six-sided prism whose base sits on `y = 0` at `(x, z)`.
    ///
    /// Vertices sit at multiples of 60° starting on +Z, so the footprint
    /// spans `±r` on z but only `±r·sin 60°` on x.
    pub fn hex_prism(id: u32, x: f32, z: f32, radius: f32, height: f32) -> Self {
        let position = Vec3::new(x, height / 2.0, z);
        let half = Vec3::new(
            radius * std::f32::consts::FRAC_PI_3.sin(),
            height / 2.0,
            radius,
        );
        Self {
            id,
            position,
            height,
            radius,
            bounds: BoundingBox::from_center_half_extents(position, half),
        }
    }

    /// Obstacle with an explicit box (fixtures, imported geometry)
    pub fn from_bounds(id: u32, bounds: BoundingBox) -> Self {
        let size = bounds.size();
        Self {
            id,
            position: bounds.center(),
            height: size.y,
            radius: size.x.max(size.z) / 2.0,
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Height of the walkable top face
    #[inline]
    pub fn top(&self) -> f32 {
        self.bounds.max.y
    }
}

/// Static obstacle boxes for the session. Insert during setup, query afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundsIndex {
    obstacles: Vec<Obstacle>,
}

impl BoundsIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// True if any obstacle box intersects `query`
    pub fn overlaps(&self, query: &BoundingBox) -> bool {
        self.obstacles.iter().any(|o| o.bounds.intersects(query))
    }

    /// First obstacle (in insertion order) whose box contains `p`
    pub fn contains_point(&self, p: Vec3) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.bounds.contains_point(p))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }
}
