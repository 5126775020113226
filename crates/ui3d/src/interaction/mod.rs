//! Ray construction and panel-plane intersection.

mod controller;
mod raycaster;

pub use controller::{controller_ray, ControllerPose, PlaneRaycaster};
pub use raycaster::{screen_to_ray, PanelHit, PanelPlane, Ray};
