#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::InterpolatorMode;

fn default_parts_enabled() -> bool {
    true
}

fn default_send_ground_flag() -> bool {
    true
}

/// Per aircraft interpolation [Setup], may change from one step to the next.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Setup {
    /// Interpolant to use
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: InterpolatorMode,

    /// Always run the complete interpolation: no parked aircraft shortcut,
    /// interpolant recalculated on every step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub force_full_interpolation: bool,

    /// Evaluate (received or guessed) parts
    #[cfg_attr(feature = "serde", serde(default = "default_parts_enabled"))]
    pub parts_enabled: bool,

    /// Pitch (degrees) forced while on ground
    #[cfg_attr(feature = "serde", serde(default))]
    pub pitch_on_ground_deg: Option<f64>,

    /// Remove the scenery offset observed between this aircraft
    /// and the local ground elevation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fix_scenery_offset: bool,

    /// Forward the on ground flag to the host
    #[cfg_attr(feature = "serde", serde(default = "default_send_ground_flag"))]
    pub send_ground_flag: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            mode: InterpolatorMode::default(),
            force_full_interpolation: false,
            parts_enabled: default_parts_enabled(),
            pitch_on_ground_deg: None,
            fix_scenery_offset: false,
            send_ground_flag: default_send_ground_flag(),
        }
    }
}

impl Setup {
    /// Copies and returns [Setup] with updated [InterpolatorMode]
    pub fn with_mode(&self, mode: InterpolatorMode) -> Self {
        let mut s = self.clone();
        s.mode = mode;
        s
    }

    /// Copies and returns [Setup] with forced full interpolation
    pub fn with_full_interpolation(&self) -> Self {
        let mut s = self.clone();
        s.force_full_interpolation = true;
        s
    }

    /// Copies and returns [Setup] with parts evaluation disabled
    pub fn without_parts(&self) -> Self {
        let mut s = self.clone();
        s.parts_enabled = false;
        s
    }

    /// Copies and returns [Setup] with pitch forced on ground
    pub fn with_pitch_on_ground_deg(&self, pitch_deg: f64) -> Self {
        let mut s = self.clone();
        s.pitch_on_ground_deg = Some(pitch_deg);
        s
    }

    /// Copies and returns [Setup] with scenery offset correction
    pub fn with_scenery_offset_fix(&self) -> Self {
        let mut s = self.clone();
        s.fix_scenery_offset = true;
        s
    }

    /// Copies and returns [Setup] that hides the on ground flag
    pub fn without_ground_flag(&self) -> Self {
        let mut s = self.clone();
        s.send_ground_flag = false;
        s
    }
}
