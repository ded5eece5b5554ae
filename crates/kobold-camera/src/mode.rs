//! Camera modes and their textual names.

use std::fmt;
use std::str::FromStr;

/// The four camera modes, in cycling order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    #[default]
    FirstPerson = 0,
    ThirdPerson = 1,
    FreeCam = 2,
    FreeCamLocked = 3,
}

impl CameraMode {
    pub const ALL: [CameraMode; 4] = [
        CameraMode::FirstPerson,
        CameraMode::ThirdPerson,
        CameraMode::FreeCam,
        CameraMode::FreeCamLocked,
    ];

    /// Position in cycling order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The mode after this one, wrapping back to first person.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            CameraMode::FirstPerson => "first_person",
            CameraMode::ThirdPerson => "third_person",
            CameraMode::FreeCam => "free_cam",
            CameraMode::FreeCamLocked => "free_cam_locked",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no camera mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown camera mode `{0}`")]
pub struct ParseCameraModeError(pub String);

impl FromStr for CameraMode {
    type Err = ParseCameraModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCameraModeError(s.to_string()))
    }
}
