//! Scene-side raycasting for canvas panels
//!
//! A panel's surface is displayed on a rectangle in world space. This crate
//! turns controller poses (or a mouse position) into rays, intersects them
//! with that rectangle and reports surface UVs through
//! [`canvasui_core::RaycastAdapter`].
//!
//! # Example
//!
//! ```rust,no_run
//! use canvasui_ui3d::{ControllerPose, PanelPlane, PlaneRaycaster};
//! use canvasui_core::PointerIndex;
//! use glam::{Quat, Vec2, Vec3};
//!
//! let plane = PanelPlane::new(Vec3::new(0.0, 1.5, -2.0), Quat::IDENTITY, Vec2::new(1.6, 1.2));
//! let mut raycaster = PlaneRaycaster::new(plane);
//! raycaster.set_pose(
//!     PointerIndex::PRIMARY,
//!     Some(ControllerPose::new(Vec3::new(0.0, 1.5, 0.0), Quat::IDENTITY)),
//! );
//! // Hand `&mut raycaster` to `Panel::pointer_inputs` each frame.
//! ```

pub mod interaction;

pub use interaction::{
    controller_ray, screen_to_ray, ControllerPose, PanelHit, PanelPlane, PlaneRaycaster, Ray,
};
