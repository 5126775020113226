//! Panel raycasting - intersect pointer rays with the panel's display plane

use canvasui_core::SurfaceUv;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Rays closer to parallel than this never hit.
const PARALLEL_EPSILON: f32 = 1e-4;

/// Half-line in world space. `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a panel raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelHit {
    /// Position where the ray met the plane
    pub position: Vec3,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// Surface UV, `u` left to right, `v` bottom to top
    pub uv: SurfaceUv,
}

/// World-space rectangle the panel surface is displayed on.
///
/// In its local frame the rectangle lies in the XY plane centred on the
/// origin, facing +Z; `rotation` and `center` place it in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPlane {
    pub center: Vec3,
    pub rotation: Quat,
    /// Width and height in world units.
    pub size: Vec2,
}

impl PanelPlane {
    pub fn new(center: Vec3, rotation: Quat, size: Vec2) -> Self {
        Self {
            center,
            rotation,
            size,
        }
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Intersect `ray` with the panel rectangle (either face).
    pub fn raycast(&self, ray: &Ray) -> Option<PanelHit> {
        let normal = self.normal();
        let denom = ray.direction.dot(normal);

        // Ray parallel to plane
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.center - ray.origin).dot(normal) / denom;

        // Intersection behind ray origin
        if t < 0.0 {
            return None;
        }

        let position = ray.at(t);
        let to_hit = position - self.center;
        let half = self.size * 0.5;
        let local = Vec2::new(to_hit.dot(self.right()), to_hit.dot(self.up()));

        if local.x.abs() > half.x || local.y.abs() > half.y {
            return None;
        }

        Some(PanelHit {
            position,
            distance: t,
            uv: SurfaceUv::new((local.x + half.x) / self.size.x, (local.y + half.y) / self.size.y),
        })
    }
}

/// Convert screen coordinates to a ray in world space (mouse pointer).
pub fn screen_to_ray(
    screen_pos: (f32, f32),
    screen_size: (u32, u32),
    view_matrix: &Mat4,
    projection_matrix: &Mat4,
) -> Option<Ray> {
    if screen_size.0 == 0 || screen_size.1 == 0 {
        return None;
    }

    // Normalized device coordinates, y up
    let x = (2.0 * screen_pos.0) / screen_size.0 as f32 - 1.0;
    let y = 1.0 - (2.0 * screen_pos.1) / screen_size.1 as f32;

    let inv_proj = projection_matrix.inverse();
    let eye = inv_proj.project_point3(Vec3::new(x, y, -1.0));
    let eye = Vec3::new(eye.x, eye.y, -1.0);

    let inv_view = view_matrix.inverse();
    Ray::new(
        inv_view.transform_point3(Vec3::ZERO),
        inv_view.transform_vector3(eye),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> PanelPlane {
        PanelPlane::new(Vec3::new(0.0, 0.0, -5.0), Quat::IDENTITY, Vec2::new(2.0, 1.0))
    }

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, direction).expect("non-zero direction")
    }

    #[test]
    fn centre_hit_maps_to_middle_uv() {
        let hit = wall()
            .raycast(&ray(Vec3::ZERO, Vec3::NEG_Z))
            .expect("hit");
        assert!((hit.distance - 5.0).abs() < 0.001);
        assert!((hit.uv.u - 0.5).abs() < 0.001);
        assert!((hit.uv.v - 0.5).abs() < 0.001);
    }

    #[test]
    fn top_left_corner_is_u0_v1() {
        let hit = wall()
            .raycast(&ray(Vec3::new(-0.9, 0.45, 0.0), Vec3::NEG_Z))
            .expect("hit");
        assert!((hit.uv.u - 0.05).abs() < 0.001);
        assert!((hit.uv.v - 0.95).abs() < 0.001);
    }

    #[test]
    fn misses_outside_parallel_and_behind() {
        let plane = wall();
        assert!(plane.raycast(&ray(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z)).is_none());
        assert!(plane.raycast(&ray(Vec3::ZERO, Vec3::X)).is_none());
        assert!(plane.raycast(&ray(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn rotated_plane_uses_its_own_axes() {
        // Facing +X: local right is world -Z.
        let plane = PanelPlane::new(
            Vec3::new(5.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec2::new(2.0, 2.0),
        );
        let hit = plane
            .raycast(&ray(Vec3::new(0.0, 0.0, -0.5), Vec3::X))
            .expect("hit");
        assert!((hit.uv.u - 0.75).abs() < 0.001);
        assert!((hit.uv.v - 0.5).abs() < 0.001);
    }

    #[test]
    fn screen_centre_ray_looks_forward() {
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
        let ray = screen_to_ray((400.0, 300.0), (800, 600), &view, &proj).expect("ray");
        assert!(ray.origin.length() < 1e-4);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-3);
        assert!(screen_to_ray((0.0, 0.0), (0, 600), &view, &proj).is_none());
    }
}
