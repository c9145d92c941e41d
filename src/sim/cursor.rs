//! Arena bounds and raw-input-to-cursor mapping

use super::sensitivity::{GameProfile, SENS_EPSILON};

/// The playable rectangle, derived from the display resolution at startup.
/// Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

/// Player crosshair position, always within the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    /// Cursor at the arena center (run start position)
    pub fn centered(arena: &Arena) -> Self {
        let (x, y) = arena.center();
        Self { x, y }
    }
}

/// Maps raw pointer deltas (device counts) to cursor displacement
pub struct InputMapper;

impl InputMapper {
    /// Screen pixels per degree of view rotation
    pub fn px_per_degree(arena: &Arena, profile: &GameProfile) -> f32 {
        arena.width / profile.fov_h_deg.max(1e-3)
    }

    /// Screen pixels moved per raw input count.
    ///
    /// This is the aim-feel critical path: yaw * sens * px/deg preserves the
    /// monotonic relationship between DPI/yaw/sensitivity and cm/360.
    pub fn px_per_count(arena: &Arena, profile: &GameProfile, ads_held: bool) -> f32 {
        let yaw = profile.yaw.max(SENS_EPSILON);
        yaw * profile.effective_sens(ads_held) * Self::px_per_degree(arena, profile)
    }

    /// Apply one tick of raw pointer movement, clamping to the arena
    pub fn apply_pointer_delta(
        cursor: &mut Cursor,
        arena: &Arena,
        profile: &GameProfile,
        ads_held: bool,
        delta_x: f32,
        delta_y: f32,
    ) {
        let scale = Self::px_per_count(arena, profile, ads_held);
        cursor.x = (cursor.x + delta_x * scale).clamp(0.0, arena.width);
        cursor.y = (cursor.y + delta_y * scale).clamp(0.0, arena.height);
    }
}
