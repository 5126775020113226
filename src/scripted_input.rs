use canvasui_core::MAX_POINTERS;
use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::Deserialize;
use std::{fs, path::Path};

use canvasui_ui3d::{ControllerPose, PanelPlane};

#[derive(Debug, Deserialize)]
struct PointerScriptFile {
    #[serde(default)]
    plane: PlaneSpec,
    steps: Vec<ScriptedStep>,
}

/// Where the panel hangs in the scene, for controller-driven steps.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PlaneSpec {
    pub center: [f32; 3],
    pub yaw_degrees: f32,
    pub size: [f32; 2],
}

impl Default for PlaneSpec {
    fn default() -> Self {
        Self {
            center: [0.0, 1.5, -2.0],
            yaw_degrees: 0.0,
            size: [1.6, 1.2],
        }
    }
}

impl PlaneSpec {
    pub fn to_plane(self) -> PanelPlane {
        PanelPlane::new(
            Vec3::from(self.center),
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            Vec2::from(self.size),
        )
    }
}

/// One pointer for the duration of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptedPointer {
    /// Direct surface pixel position.
    Surface {
        x: f32,
        y: f32,
        #[serde(default)]
        pressed: bool,
    },
    /// Tracked controller; its ray is cast against the plane.
    Controller {
        position: [f32; 3],
        #[serde(default)]
        yaw_degrees: f32,
        #[serde(default)]
        pitch_degrees: f32,
        #[serde(default)]
        pressed: bool,
    },
    /// Untracked / pointing elsewhere.
    #[default]
    Away,
}

impl ScriptedPointer {
    pub fn pressed(&self) -> bool {
        match *self {
            ScriptedPointer::Surface { pressed, .. } | ScriptedPointer::Controller { pressed, .. } => {
                pressed
            }
            ScriptedPointer::Away => false,
        }
    }

    pub fn pose(&self) -> Option<ControllerPose> {
        match *self {
            ScriptedPointer::Controller {
                position,
                yaw_degrees,
                pitch_degrees,
                ..
            } => Some(ControllerPose::new(
                Vec3::from(position),
                Quat::from_euler(
                    EulerRot::YXZ,
                    yaw_degrees.to_radians(),
                    pitch_degrees.to_radians(),
                    0.0,
                ),
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptedStep {
    frames: u64,
    #[serde(default)]
    pointers: Vec<ScriptedPointer>,
    /// Content edits applied on the first frame of the step.
    #[serde(default)]
    set_content: Vec<(String, String)>,
}

/// What the script wants for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedFrame {
    pub pointers: [ScriptedPointer; MAX_POINTERS],
    pub set_content: Vec<(String, String)>,
}

/// Plays a pointer script frame by frame, holding the last step once finished.
pub struct PointerScriptPlayer {
    plane: PanelPlane,
    steps: Vec<ScriptedStep>,
    index: usize,
    frame_in_step: u64,
    finished: bool,
}

impl PointerScriptPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> anyhow::Result<Self> {
        let file: PointerScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("pointer script contains no steps");
        }
        if file.steps.iter().any(|step| step.pointers.len() > MAX_POINTERS) {
            anyhow::bail!("pointer script steps may list at most {MAX_POINTERS} pointers");
        }
        Ok(Self {
            plane: file.plane.to_plane(),
            steps: file.steps,
            index: 0,
            frame_in_step: 0,
            finished: false,
        })
    }

    pub fn plane(&self) -> PanelPlane {
        self.plane
    }

    /// Whether every step has run for its full duration.
    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn advance(&mut self) -> ScriptedFrame {
        let Some(step) = self.steps.get(self.index) else {
            return ScriptedFrame::default();
        };

        let mut frame = ScriptedFrame::default();
        for (slot, pointer) in frame.pointers.iter_mut().zip(&step.pointers) {
            *slot = *pointer;
        }
        if self.frame_in_step == 0 && !self.finished {
            frame.set_content = step.set_content.clone();
        }

        self.frame_in_step += 1;
        if self.frame_in_step >= step.frames.max(1) {
            if self.index + 1 < self.steps.len() {
                self.index += 1;
                self.frame_in_step = 0;
            } else {
                self.finished = true;
            }
        }
        frame
    }
}
