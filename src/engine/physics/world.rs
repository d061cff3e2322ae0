use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::Cuboid;

/// Handle to identify obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleHandle(usize);

/// A static, tagged box in the scene
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Tag compared by gameplay queries (e.g. "Fence")
    pub tag: String,
    shape: Cuboid,
    position: Isometry<Real>,
}

/// A single ray-query hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub handle: ObstacleHandle,
    /// Distance along the (normalized) ray
    pub distance: f32,
}

/// Static scene geometry answering ray queries
#[derive(Debug, Default)]
pub struct ProbeWorld {
    obstacles: Vec<Obstacle>,
}

impl ProbeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box centered at `center`
    pub fn add_box(&mut self, tag: &str, center: Vec3, half_extents: Vec3) -> ObstacleHandle {
        let handle = ObstacleHandle(self.obstacles.len());
        self.obstacles.push(Obstacle {
            tag: tag.to_string(),
            shape: Cuboid::new(Vector::new(half_extents.x, half_extents.y, half_extents.z)),
            position: Isometry::translation(center.x, center.y, center.z),
        });
        log::debug!(
            "Added obstacle '{}' at {} (half extents {})",
            tag,
            center,
            half_extents
        );
        handle
    }

    /// Add an axis-aligned box spanning `min..max`
    pub fn add_bounds(&mut self, tag: &str, min: Vec3, max: Vec3) -> ObstacleHandle {
        self.add_box(tag, (min + max) * 0.5, (max - min) * 0.5)
    }

    pub fn get(&self, handle: ObstacleHandle) -> Option<&Obstacle> {
        self.obstacles.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Cast a ray and return the nearest hit within `max_distance`
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        self.obstacles
            .iter()
            .enumerate()
            .filter_map(|(index, obstacle)| {
                obstacle
                    .shape
                    .cast_ray(&obstacle.position, &ray, max_distance, true)
                    .map(|distance| RayHit {
                        handle: ObstacleHandle(index),
                        distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
