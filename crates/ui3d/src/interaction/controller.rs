//! Controller poses and the two-pointer raycast adapter.

use canvasui_core::{PointerIndex, RaycastAdapter, SurfaceUv, MAX_POINTERS};
use glam::{Quat, Vec3};

use super::raycaster::{PanelPlane, Ray};

/// Tracked pose of a hand controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl ControllerPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Pointing ray of a controller: from its position along its local -Z.
pub fn controller_ray(pose: &ControllerPose) -> Option<Ray> {
    Ray::new(pose.position, pose.orientation * Vec3::NEG_Z)
}

/// [`RaycastAdapter`] over one panel plane and up to two pointer rays.
///
/// The host updates rays every frame (from controller poses or
/// [`screen_to_ray`](super::screen_to_ray)); a pointer without a ray misses.
#[derive(Debug, Clone)]
pub struct PlaneRaycaster {
    plane: PanelPlane,
    rays: [Option<Ray>; MAX_POINTERS],
}

impl PlaneRaycaster {
    pub fn new(plane: PanelPlane) -> Self {
        Self {
            plane,
            rays: [None; MAX_POINTERS],
        }
    }

    pub fn plane(&self) -> &PanelPlane {
        &self.plane
    }

    /// Move the panel (e.g. when it is re-anchored in the scene).
    pub fn set_plane(&mut self, plane: PanelPlane) {
        self.plane = plane;
    }

    pub fn set_ray(&mut self, pointer: PointerIndex, ray: Option<Ray>) {
        self.rays[pointer.get()] = ray;
    }

    /// Point `pointer` along `pose`, or clear it when the controller is not tracked.
    pub fn set_pose(&mut self, pointer: PointerIndex, pose: Option<ControllerPose>) {
        self.set_ray(pointer, pose.as_ref().and_then(controller_ray));
    }
}

impl RaycastAdapter for PlaneRaycaster {
    fn surface_uv(&mut self, pointer: PointerIndex) -> Option<SurfaceUv> {
        let ray = self.rays[pointer.get()]?;
        let hit = self.plane.raycast(&ray)?;
        tracing::trace!(
            pointer = pointer.get(),
            u = hit.uv.u,
            v = hit.uv.v,
            distance = hit.distance,
            "pointer ray hit panel"
        );
        Some(hit.uv)
    }
}
