//! The player camera rig.

use glam::Vec3;
use kobold_config::CameraConfig;
use kobold_events::{Observers, SubscriptionId};
use kobold_lod::ViewpointSource;
use tracing::debug;

use crate::mode::{CameraMode, ParseCameraModeError};

/// Which physical camera renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActiveCamera {
    FirstPerson,
    ThirdPerson,
    Free,
}

/// Enable state derived from the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraState {
    pub camera: ActiveCamera,
    /// The free camera's fly controller reads input.
    pub free_controller: bool,
    /// The player character reads input.
    pub possession: bool,
    /// The first-person HUD canvas is shown.
    pub hud_visible: bool,
}

impl CameraState {
    pub fn for_mode(mode: CameraMode) -> Self {
        match mode {
            CameraMode::FirstPerson => Self {
                camera: ActiveCamera::FirstPerson,
                free_controller: false,
                possession: true,
                hud_visible: true,
            },
            CameraMode::ThirdPerson => Self {
                camera: ActiveCamera::ThirdPerson,
                free_controller: false,
                possession: true,
                hud_visible: true,
            },
            CameraMode::FreeCam => Self {
                camera: ActiveCamera::Free,
                free_controller: true,
                possession: false,
                hud_visible: false,
            },
            CameraMode::FreeCamLocked => Self {
                camera: ActiveCamera::Free,
                free_controller: false,
                possession: true,
                hud_visible: true,
            },
        }
    }
}

/// Movement input held by the possessed character.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PossessionInput {
    pub direction: Vec3,
    pub jump: bool,
}

/// HUD marker that eases under the current mode's icon.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HudSlider {
    pub x: f32,
}

/// Camera rig with one camera per [`ActiveCamera`] and a current mode.
pub struct CameraRig {
    mode: CameraMode,
    state: CameraState,
    first_person: Option<Vec3>,
    third_person: Option<Vec3>,
    free: Option<Vec3>,
    input: PossessionInput,
    slider: HudSlider,
    slider_spacing: f32,
    slider_speed: f32,
    mode_changed: Observers<CameraMode>,
}

impl CameraRig {
    /// Build a rig in the configured start mode. Cameras start without a
    /// position until the host places them.
    pub fn new(config: &CameraConfig) -> Result<Self, ParseCameraModeError> {
        let start: CameraMode = config.start_mode.parse()?;
        let mut rig = Self {
            mode: start,
            state: CameraState::for_mode(start),
            first_person: None,
            third_person: None,
            free: None,
            input: PossessionInput::default(),
            slider: HudSlider::default(),
            slider_spacing: config.slider_spacing,
            slider_speed: config.slider_speed,
            mode_changed: Observers::new(),
        };
        rig.switch(start);
        Ok(rig)
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Enter `mode`. Entering the unlocked free camera releases possession and
    /// clears the character's held input.
    pub fn switch(&mut self, mode: CameraMode) {
        self.mode = mode;
        self.state = CameraState::for_mode(mode);
        if !self.state.possession {
            self.input = PossessionInput::default();
        }
        debug!(%mode, "camera mode switched");
        self.mode_changed.notify(&mode);
    }

    /// Advance to the next mode in cycling order.
    pub fn cycle(&mut self) {
        self.switch(self.mode.next());
    }

    pub fn first_person(&mut self) {
        self.switch(CameraMode::FirstPerson);
    }

    pub fn third_person(&mut self) {
        self.switch(CameraMode::ThirdPerson);
    }

    pub fn free_camera(&mut self) {
        self.switch(CameraMode::FreeCam);
    }

    pub fn locked_camera(&mut self) {
        self.switch(CameraMode::FreeCamLocked);
    }

    /// Call `callback` after every mode switch.
    pub fn on_mode_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CameraMode) + Send + 'static,
    {
        self.mode_changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.mode_changed.unsubscribe(id)
    }

    /// Place (or remove, with `None`) one of the rig's cameras.
    pub fn set_camera_position(&mut self, camera: ActiveCamera, position: Option<Vec3>) {
        *self.camera_slot(camera) = position;
    }

    pub fn camera_position(&self, camera: ActiveCamera) -> Option<Vec3> {
        match camera {
            ActiveCamera::FirstPerson => self.first_person,
            ActiveCamera::ThirdPerson => self.third_person,
            ActiveCamera::Free => self.free,
        }
    }

    /// Record character input. Ignored while possession is released.
    pub fn set_input(&mut self, input: PossessionInput) {
        if self.state.possession {
            self.input = input;
        }
    }

    pub fn input(&self) -> PossessionInput {
        self.input
    }

    pub fn slider(&self) -> HudSlider {
        self.slider
    }

    /// Where the HUD marker settles for the current mode.
    pub fn slider_target(&self) -> f32 {
        -self.slider_spacing * (self.mode.index() as f32 + 0.5)
    }

    /// Ease the HUD marker toward the current mode's icon.
    pub fn update(&mut self, dt: f32) {
        let t = (dt * self.slider_speed).clamp(0.0, 1.0);
        self.slider.x += (self.slider_target() - self.slider.x) * t;
    }

    fn camera_slot(&mut self, camera: ActiveCamera) -> &mut Option<Vec3> {
        match camera {
            ActiveCamera::FirstPerson => &mut self.first_person,
            ActiveCamera::ThirdPerson => &mut self.third_person,
            ActiveCamera::Free => &mut self.free,
        }
    }
}

impl ViewpointSource for CameraRig {
    /// Position of the enabled camera.
    fn viewpoint(&self) -> Option<Vec3> {
        self.camera_position(self.state.camera)
    }
}
