use serde::{Deserialize, Serialize};

/// Device rotation at the moment a picture is taken. The captured frame is
/// remapped so the stored photo is always upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    LandscapeLeft,
    LandscapeRight,
    PortraitUpsideDown,
}

impl Orientation {
    /// Correction angle in degrees, one of {0, -90, 90, 180}.
    pub fn rotation_degrees(self) -> i32 {
        match self {
            Orientation::Portrait => 0,
            Orientation::LandscapeLeft => -90,
            Orientation::LandscapeRight => 90,
            Orientation::PortraitUpsideDown => 180,
        }
    }
}
