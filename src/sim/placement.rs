//! Rejection-sampled placement on the ground plane
//!
//! Candidates are drawn uniformly from a region and thrown away until one
//! clears every rejection rule. The loop is bounded; running out of
//! attempts is reported as [`SceneError::PlacementExhausted`].

use glam::{Vec2, Vec3};
use rand::Rng;

use super::bounds::{BoundingBox, BoundsIndex};
use crate::error::SceneError;
use crate::planar_distance;

/// Where candidates are drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// `[-half_extent, half_extent)` on both axes
    Square { half_extent: f32 },
    /// Uniform over a disk centered on the origin
    Disk { radius: f32 },
    /// `[min, max)` per axis
    Rect { min: Vec2, max: Vec2 },
}

impl Region {
    fn draw<R: Rng>(&self, rng: &mut R) -> Vec2 {
        match *self {
            Region::Square { half_extent } => Vec2::new(
                rng.random::<f32>() * 2.0 * half_extent - half_extent,
                rng.random::<f32>() * 2.0 * half_extent - half_extent,
            ),
            // Square draw plus rejection keeps the disk uniform
            Region::Disk { radius } => Vec2::new(
                rng.random::<f32>() * 2.0 * radius - radius,
                rng.random::<f32>() * 2.0 * radius - radius,
            ),
            Region::Rect { min, max } => Vec2::new(
                min.x + rng.random::<f32>() * (max.x - min.x),
                min.y + rng.random::<f32>() * (max.y - min.y),
            ),
        }
    }

    fn accepts(&self, p: Vec2) -> bool {
        match *self {
            Region::Disk { radius } => planar_distance(p.x, p.y) <= radius,
            Region::Square { .. } | Region::Rect { .. } => true,
        }
    }
}

/// One placement query
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    /// Reported in errors and logs
    pub what: &'static str,
    pub region: Region,
    /// Reject candidates closer than this to the origin
    pub exclusion_radius: f32,
    /// Edge of the square footprint centered on the candidate
    pub footprint: f32,
    /// Extra clearance added to every side of the footprint
    pub margin: f32,
    /// Vertical span of the derived box (`0.0` for a flat footprint)
    pub height: f32,
    /// Reject candidates whose derived box touches a stored obstacle
    pub avoid_obstacles: bool,
    /// Reject candidates whose derived box covers this point
    pub avoid_point: Option<Vec3>,
}

impl PlacementRequest {
    /// Flat square footprint that must clear obstacles
    pub fn footprint(what: &'static str, region: Region, footprint: f32, margin: f32) -> Self {
        Self {
            what,
            region,
            exclusion_radius: 0.0,
            footprint,
            margin,
            height: 0.0,
            avoid_obstacles: true,
            avoid_point: None,
        }
    }

    /// Bare point; only the region and exclusion radius apply
    pub fn point(what: &'static str, region: Region, exclusion_radius: f32) -> Self {
        Self {
            what,
            region,
            exclusion_radius,
            footprint: 0.0,
            margin: 0.0,
            height: 0.0,
            avoid_obstacles: false,
            avoid_point: None,
        }
    }

    pub fn avoiding(mut self, point: Vec3) -> Self {
        self.avoid_point = Some(point);
        self
    }

    pub fn with_exclusion(mut self, radius: f32) -> Self {
        self.exclusion_radius = radius;
        self
    }

    /// Box the rejection rules test for a candidate at `(x, z)`
    pub fn derived_box(&self, x: f32, z: f32) -> BoundingBox {
        let half = self.footprint / 2.0 + self.margin;
        BoundingBox::new(
            Vec3::new(x - half, 0.0, z - half),
            Vec3::new(x + half, self.height, z + half),
        )
    }
}

/// Rejection sampler over a fixed obstacle index
pub struct PlacementSampler<'a> {
    bounds: &'a BoundsIndex,
    max_attempts: u32,
}

impl<'a> PlacementSampler<'a> {
    pub fn new(bounds: &'a BoundsIndex, max_attempts: u32) -> Self {
        Self {
            bounds,
            max_attempts: max_attempts.max(1),
        }
    }

    /// True if a candidate at `(x, z)` breaks any rule in `request`
    pub fn rejects(&self, request: &PlacementRequest, x: f32, z: f32) -> bool {
        let p = Vec2::new(x, z);
        if !request.region.accepts(p) {
            return true;
        }
        if planar_distance(x, z) < request.exclusion_radius {
            return true;
        }
        if !request.avoid_obstacles && request.avoid_point.is_none() {
            return false;
        }

        let bbox = request.derived_box(x, z);
        if request.avoid_obstacles && self.bounds.overlaps(&bbox) {
            return true;
        }
        request.avoid_point.is_some_and(|p| bbox.contains_point(p))
    }

    /// Draw `(x, z)` until a candidate passes, up to `max_attempts` draws
    pub fn sample_position<R: Rng>(
        &self,
        rng: &mut R,
        request: &PlacementRequest,
    ) -> Result<Vec2, SceneError> {
        for attempt in 1..=self.max_attempts {
            let p = request.region.draw(rng);
            if !self.rejects(request, p.x, p.y) {
                if attempt > 1000 {
                    log::debug!("{} placed after {} attempts", request.what, attempt);
                }
                return Ok(p);
            }
        }

        Err(SceneError::PlacementExhausted {
            what: request.what,
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bounds::Obstacle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn single_obstacle() -> BoundsIndex {
        let mut index = BoundsIndex::new();
        index.insert(Obstacle::from_bounds(
            1,
            BoundingBox::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0)),
        ));
        index
    }

    #[test]
    fn test_avoids_obstacle_over_1000_samples() {
        let index = single_obstacle();
        let sampler = PlacementSampler::new(&index, 10_000);
        let request = PlacementRequest::footprint("probe", Region::Disk { radius: 40.0 }, 0.0, 0.1);
        let mut rng = Pcg32::seed_from_u64(2024);

        for _ in 0..1000 {
            let p = sampler.sample_position(&mut rng, &request).unwrap();
            let expanded = request.derived_box(p.x, p.y);
            assert!(!index.overlaps(&expanded), "{p:?} overlaps the obstacle");
            assert!(planar_distance(p.x, p.y) <= 40.0);
        }
    }

    #[test]
    fn test_exclusion_radius_respected() {
        let index = BoundsIndex::new();
        let sampler = PlacementSampler::new(&index, 10_000);
        let request = PlacementRequest::point("hex", Region::Disk { radius: 40.0 }, 3.0);
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..500 {
            let p = sampler.sample_position(&mut rng, &request).unwrap();
            let r = planar_distance(p.x, p.y);
            assert!(r >= 3.0 && r <= 40.0, "radius {r}");
        }
    }

    #[test]
    fn test_avoid_point_rejected() {
        let index = BoundsIndex::new();
        let sampler = PlacementSampler::new(&index, 10_000);
        let request = PlacementRequest::footprint("gift", Region::Square { half_extent: 3.0 }, 4.0, 0.1)
            .avoiding(Vec3::ZERO);
        let mut rng = Pcg32::seed_from_u64(11);

        for _ in 0..200 {
            let p = sampler.sample_position(&mut rng, &request).unwrap();
            assert!(!request.derived_box(p.x, p.y).contains_point(Vec3::ZERO));
        }
    }

    #[test]
    fn test_rect_region_bounds() {
        let index = BoundsIndex::new();
        let sampler = PlacementSampler::new(&index, 10);
        let region = Region::Rect {
            min: Vec2::splat(-40.0),
            max: Vec2::splat(30.0),
        };
        let request = PlacementRequest::point("tree", region, 0.0);
        let mut rng = Pcg32::seed_from_u64(3);

        for _ in 0..500 {
            let p = sampler.sample_position(&mut rng, &request).unwrap();
            assert!(p.x >= -40.0 && p.x < 30.0);
            assert!(p.y >= -40.0 && p.y < 30.0);
        }
    }

    #[test]
    fn test_exhaustion_is_reported() {
        // Obstacle covers the whole region
        let mut index = BoundsIndex::new();
        index.insert(Obstacle::from_bounds(
            1,
            BoundingBox::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 5.0, 10.0)),
        ));
        let sampler = PlacementSampler::new(&index, 50);
        let request = PlacementRequest::footprint("gift", Region::Square { half_extent: 5.0 }, 1.0, 0.1);
        let mut rng = Pcg32::seed_from_u64(1);

        match sampler.sample_position(&mut rng, &request) {
            Err(SceneError::PlacementExhausted { what, attempts }) => {
                assert_eq!(what, "gift");
                assert_eq!(attempts, 50);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let index = single_obstacle();
        let sampler = PlacementSampler::new(&index, 10_000);
        let request = PlacementRequest::footprint("probe", Region::Disk { radius: 40.0 }, 1.0, 0.1);

        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(
                sampler.sample_position(&mut a, &request).unwrap(),
                sampler.sample_position(&mut b, &request).unwrap()
            );
        }
    }

    proptest! {
        #[test]
        fn prop_never_overlaps_or_enters_exclusion(
            seed in any::<u64>(),
            exclusion in 0.0f32..10.0,
            footprint in 0.0f32..4.0,
        ) {
            let mut index = BoundsIndex::new();
            index.insert(Obstacle::hex_prism(1, 12.0, 0.0, 2.0, 3.0));
            index.insert(Obstacle::hex_prism(2, -8.0, 15.0, 2.0, 5.0));
            index.insert(Obstacle::hex_prism(3, 0.0, -20.0, 2.0, 1.5));

            let sampler = PlacementSampler::new(&index, 10_000);
            let request = PlacementRequest::footprint("prop", Region::Disk { radius: 40.0 }, footprint, 0.1)
                .with_exclusion(exclusion);
            let mut rng = Pcg32::seed_from_u64(seed);

            for _ in 0..20 {
                let p = sampler.sample_position(&mut rng, &request).unwrap();
                prop_assert!(!index.overlaps(&request.derived_box(p.x, p.y)));
                prop_assert!(planar_distance(p.x, p.y) >= exclusion);
            }
        }
    }
}
