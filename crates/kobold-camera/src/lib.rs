//! Camera mode switching for the player rig.
//!
//! The [`CameraRig`] owns one camera per mode, decides which one is enabled,
//! whether the player's possession input and the free-camera controller are
//! live, and whether the HUD is shown. The enabled camera is the viewpoint the
//! LOD ranking pass measures from.

mod mode;
mod rig;

pub use mode::{CameraMode, ParseCameraModeError};
pub use rig::{ActiveCamera, CameraRig, CameraState, HudSlider, PossessionInput};
