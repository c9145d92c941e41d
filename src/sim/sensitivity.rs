//! Sensitivity model - per-title mouse settings and optics conversions

use serde::{Deserialize, Serialize};

/// Floor applied to every divisor in the sensitivity math
pub const SENS_EPSILON: f32 = 1e-6;

/// Valid ranges for user-edited numeric fields
pub const HIPFIRE_SENS_RANGE: (f32, f32) = (0.001, 400.0);
pub const ADS_SENS_RANGE: (f32, f32) = (0.01, 200.0);
pub const DPI_RANGE: (f32, f32) = (50.0, 6400.0);
pub const YAW_RANGE: (f32, f32) = (0.0001, 1.0);
pub const FOV_H_RANGE: (f32, f32) = (20.0, 179.0);

/// Conversion constants for one FPS title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProfile {
    pub name: String,
    /// Degrees of view rotation per raw input count
    pub yaw: f32,
    pub hipfire_sens: f32,
    pub ads_sens: f32,
    pub dpi: f32,
    pub fov_h_deg: f32,
    /// Title-specific ADS scaling extras (Siege-style non-linear model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_factor: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_modifier: Option<f32>,
}

impl GameProfile {
    /// Effective sensitivity for the current aiming mode.
    ///
    /// Titles carrying the x-factor/scope-modifier extras use a non-linear
    /// ADS model; everything else scales hipfire by the ADS multiplier.
    pub fn effective_sens(&self, ads_held: bool) -> f32 {
        let hip = self.hipfire_sens.max(SENS_EPSILON);

        if !ads_held {
            return hip;
        }

        match (self.x_factor, self.scope_modifier) {
            (Some(x_factor), Some(scope_modifier)) => {
                let ads_modifier = (self.ads_sens * x_factor * scope_modifier).clamp(0.0, 1.0);
                hip * ads_modifier
            }
            _ => hip * self.ads_sens.max(0.01),
        }
    }

    /// Physical mouse-pad centimeters for one full 360 degree turn.
    /// Divisors are floored to epsilon, so this is always finite and positive.
    pub fn cm_per_360(&self, ads_held: bool) -> f32 {
        let dpi = self.dpi.max(SENS_EPSILON);
        let yaw = self.yaw.max(SENS_EPSILON);
        let sens = self.effective_sens(ads_held).max(SENS_EPSILON);
        (360.0 * 2.54) / (dpi * yaw * sens)
    }

    /// Clamp every numeric field to its declared valid range
    pub fn sanitize(&mut self) {
        self.hipfire_sens = self.hipfire_sens.clamp(HIPFIRE_SENS_RANGE.0, HIPFIRE_SENS_RANGE.1);
        self.ads_sens = self.ads_sens.clamp(ADS_SENS_RANGE.0, ADS_SENS_RANGE.1);
        self.dpi = self.dpi.clamp(DPI_RANGE.0, DPI_RANGE.1);
        self.yaw = self.yaw.clamp(YAW_RANGE.0, YAW_RANGE.1);
        self.fov_h_deg = self.fov_h_deg.clamp(FOV_H_RANGE.0, FOV_H_RANGE.1);
    }
}

/// Convert a horizontal FOV to vertical for the given aspect ratio (degrees)
pub fn fov_horizontal_to_vertical(h_deg: f32, aspect: f32) -> f32 {
    let h = h_deg.to_radians();
    let v = 2.0 * ((h / 2.0).tan() / aspect).atan();
    v.to_degrees()
}

/// Convert a vertical FOV to horizontal for the given aspect ratio (degrees)
pub fn fov_vertical_to_horizontal(v_deg: f32, aspect: f32) -> f32 {
    let v = v_deg.to_radians();
    let h = 2.0 * ((v / 2.0).tan() * aspect).atan();
    h.to_degrees()
}
