//! The static collidable set.
//!
//! The world stores every piece of level geometry the player and the
//! creature collide with, and answers ray and bounding-box queries against
//! it. Geometry is appended during setup and never mutated afterwards.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::Ray;
use parry3d::shape::SharedShape;
use parry3d::transformation::try_convex_hull;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::ray::RayHit;
use super::CollisionError;

/// Stable identity of a collidable for the lifetime of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollidableId(pub u32);

/// A piece of static collision geometry.
#[derive(Clone)]
pub struct Collidable {
    /// Identity, assigned in insertion order.
    pub id: CollidableId,
    /// The collision shape in its local frame.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// World-space bounds, cached at insertion.
    bounds: Aabb,
}

impl Collidable {
    fn new(id: CollidableId, shape: SharedShape, transform: Isometry<Real>) -> Self {
        let aabb = shape.compute_aabb(&transform);
        let bounds = Aabb::new(from_point(&aabb.mins), from_point(&aabb.maxs));
        Self {
            id,
            shape,
            transform,
            bounds,
        }
    }

    /// World-space bounding box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Closest ray hit against this collidable alone.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !(max_distance > 0.0) {
            return None;
        }

        let ray = Ray::new(to_point(origin), to_vector(dir));
        let hit = self
            .shape
            .cast_ray_and_get_normal(&self.transform, &ray, max_distance, true)?;

        Some(RayHit {
            collidable: self.id,
            distance: hit.time_of_impact,
            point: origin + dir * hit.time_of_impact,
            normal: from_vector(&hit.normal),
        })
    }
}

impl std::fmt::Debug for Collidable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collidable")
            .field("id", &self.id)
            .field("shape", &self.shape.shape_type())
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// Ordered, append-only set of static collidables.
///
/// Queries take `&self`, so the world can be shared read-only by the player
/// and creature controllers within a tick.
#[derive(Debug, Default, Clone)]
pub struct CollisionWorld {
    collidables: Vec<Collidable>,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            collidables: Vec::new(),
        }
    }

    /// Add an axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) -> CollidableId {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY)
    }

    /// Add a box rotated about its center.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
    ) -> CollidableId {
        let he = half_extents.abs();
        let shape = SharedShape::cuboid(he.x, he.y, he.z);
        self.push(shape, to_isometry(center, rotation))
    }

    /// Add the convex hull of a point cloud, in world coordinates.
    pub fn add_convex_hull(&mut self, points: &[Vec3]) -> Result<CollidableId, CollisionError> {
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| to_point(*p)).collect();

        // parry panics on hulls it cannot build, so try first
        let (vertices, faces) = try_convex_hull(&parry_points)
            .map_err(|_| CollisionError::DegenerateHull(points.len()))?;
        let shape = SharedShape::convex_mesh(vertices, &faces)
            .ok_or(CollisionError::DegenerateHull(points.len()))?;

        Ok(self.push(shape, Isometry::identity()))
    }

    /// Add a triangle mesh, in world coordinates.
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
    ) -> Result<CollidableId, CollisionError> {
        if let Some(&index) = indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertices.len())
        {
            return Err(CollisionError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        if indices.is_empty() {
            return Err(CollisionError::InvalidTriMesh("mesh has no triangles".to_string()));
        }

        let parry_vertices: Vec<Point<Real>> = vertices.iter().map(|v| to_point(*v)).collect();
        let shape = SharedShape::trimesh(parry_vertices, indices.to_vec());

        Ok(self.push(shape, Isometry::identity()))
    }

    /// Number of collidables.
    pub fn len(&self) -> usize {
        self.collidables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collidables.is_empty()
    }

    /// Iterate collidables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Collidable> {
        self.collidables.iter()
    }

    pub fn get(&self, id: CollidableId) -> Option<&Collidable> {
        self.collidables.get(id.0 as usize)
    }

    /// World-space bounds of one collidable.
    pub fn aabb(&self, id: CollidableId) -> Option<Aabb> {
        self.get(id).map(Collidable::bounds)
    }

    /// Closest hit over every collidable.
    ///
    /// `direction` is normalized here; a zero direction never hits.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;

        for collidable in &self.collidables {
            if let Some(hit) = collidable.raycast(origin, direction, max_distance) {
                if closest.map_or(true, |c| hit.distance < c.distance) {
                    closest = Some(hit);
                }
            }
        }

        closest
    }

    /// Closest hit against a single collidable.
    pub fn raycast_collidable(
        &self,
        id: CollidableId,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.get(id)?.raycast(origin, direction, max_distance)
    }

    /// Whether `bounds` overlaps the bounds of any collidable.
    pub fn any_overlap(&self, bounds: &Aabb) -> bool {
        self.collidables.iter().any(|c| c.bounds.overlaps(bounds))
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push(&mut self, shape: SharedShape, transform: Isometry<Real>) -> CollidableId {
        let id = CollidableId(self.collidables.len() as u32);
        self.collidables.push(Collidable::new(id, shape, transform));
        id
    }
}

// ============================================================================
// glam <-> nalgebra
// ============================================================================

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_isometry(translation: Vec3, rotation: Quat) -> Isometry<Real> {
    let q = rotation.normalize();
    Isometry::from_parts(
        Translation3::new(translation.x, translation.y, translation.z),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor, top face at y=0
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));

        // Wall at x=10
        world.add_box(Vec3::new(10.0, 2.5, 0.0), Vec3::new(0.5, 2.5, 10.0));

        world
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let world = create_test_world();
        let ids: Vec<_> = world.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CollidableId(0), CollidableId(1)]);
        assert_eq!(world.len(), 2);
        assert!(!world.is_empty());
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0)
            .expect("should hit the wall");

        assert_eq!(hit.collidable, CollidableId(1));
        assert!((hit.distance - 9.5).abs() < 1e-3);
        assert!((hit.point.x - 9.5).abs() < 1e-3);
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-3);
        assert!(hit.opposes(Vec3::X));
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_X, 100.0).is_none());
        // Out of range
        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 5.0).is_none());
        // Zero direction never hits
        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 100.0).is_none());
    }

    #[test]
    fn test_raycast_picks_closest() {
        let world = create_test_world();

        // Diagonal down toward the wall base hits the floor first
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 100.0)
            .expect("should hit the floor");

        assert_eq!(hit.collidable, CollidableId(0));
        assert!(hit.point.y.abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_raycast_collidable_ignores_others() {
        let world = create_test_world();

        let down = Vec3::NEG_Y;
        assert!(world
            .raycast_collidable(CollidableId(1), Vec3::new(0.0, 1.0, 0.0), down, 10.0)
            .is_none());
        assert!(world
            .raycast_collidable(CollidableId(0), Vec3::new(0.0, 1.0, 0.0), down, 10.0)
            .is_some());
        assert!(world
            .raycast_collidable(CollidableId(7), Vec3::new(0.0, 1.0, 0.0), down, 10.0)
            .is_none());
    }

    #[test]
    fn test_aabb_and_overlap() {
        let world = create_test_world();

        let wall = world.aabb(CollidableId(1)).unwrap();
        assert!((wall.min - Vec3::new(9.5, 0.0, -10.0)).length() < 1e-4);
        assert!((wall.max - Vec3::new(10.5, 5.0, 10.0)).length() < 1e-4);

        let floating = Aabb::from_center_half_extents(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE);
        assert!(!world.any_overlap(&floating));

        let standing = Aabb::from_center_half_extents(Vec3::new(0.0, 0.9, 0.0), Vec3::ONE);
        assert!(world.any_overlap(&standing));
    }

    #[test]
    fn test_oriented_box_bounds_grow() {
        let mut world = CollisionWorld::new();
        let id = world.add_oriented_box(
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 1.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
        );

        let bounds = world.aabb(id).unwrap();
        assert!((bounds.max.x - std::f32::consts::SQRT_2).abs() < 1e-4);
        assert!((bounds.max.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_convex_hull() {
        let mut world = CollisionWorld::new();

        // Wedge ramp rising toward +x
        let id = world
            .add_convex_hull(&[
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(4.0, 0.0, -1.0),
                Vec3::new(4.0, 0.0, 1.0),
                Vec3::new(4.0, 2.0, -1.0),
                Vec3::new(4.0, 2.0, 1.0),
            ])
            .unwrap();

        let hit = world
            .raycast(Vec3::new(2.0, 5.0, 0.0), Vec3::NEG_Y, 10.0)
            .expect("should hit the ramp");
        assert_eq!(hit.collidable, id);
        assert!((hit.point.y - 1.0).abs() < 1e-3);
        assert!(hit.normal.y > 0.0 && hit.normal.x < 0.0);

        assert_eq!(
            world.add_convex_hull(&[Vec3::ZERO]),
            Err(CollisionError::DegenerateHull(1))
        );
    }

    #[test]
    fn test_degenerate_hull_is_an_error() {
        let mut world = CollisionWorld::new();

        assert_eq!(
            world.add_convex_hull(&[]),
            Err(CollisionError::DegenerateHull(0))
        );
        assert_eq!(
            world.add_convex_hull(&[Vec3::ZERO, Vec3::X]),
            Err(CollisionError::DegenerateHull(2))
        );
        assert!(world.is_empty());
    }

    #[test]
    fn test_triangle_mesh() {
        let mut world = CollisionWorld::new();

        let vertices = [
            Vec3::new(-5.0, 1.0, -5.0),
            Vec3::new(5.0, 1.0, -5.0),
            Vec3::new(5.0, 1.0, 5.0),
            Vec3::new(-5.0, 1.0, 5.0),
        ];
        let id = world
            .add_triangle_mesh(&vertices, &[[0, 2, 1], [0, 3, 2]])
            .unwrap();

        let hit = world
            .raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 10.0)
            .expect("should hit the mesh");
        assert_eq!(hit.collidable, id);
        assert!((hit.distance - 2.0).abs() < 1e-3);

        assert_eq!(
            world.add_triangle_mesh(&vertices, &[[0, 1, 9]]),
            Err(CollisionError::IndexOutOfRange {
                index: 9,
                vertex_count: 4
            })
        );
        assert!(matches!(
            world.add_triangle_mesh(&vertices, &[]),
            Err(CollisionError::InvalidTriMesh(_))
        ));
        assert_eq!(world.len(), 1);
    }
}
