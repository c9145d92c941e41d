//! Procedural target placement with overlap avoidance

use rand::Rng;

use super::cursor::Arena;

/// Inward clamp from the arena edges for spawn points
pub const EDGE_MARGIN: f32 = 36.0;
/// Rejection-sampling attempt budget for non-overlapping placement
pub const MAX_SPAWN_ATTEMPTS: u32 = 60;

/// A circular flick/reaction target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticTarget {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl StaticTarget {
    /// Point-in-circle hit test
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    fn overlaps(&self, other: &StaticTarget, min_gap: f32) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let min_dist = self.radius + other.radius + min_gap;
        dx * dx + dy * dy < min_dist * min_dist
    }
}

/// Spawns targets inside a disk centered on the arena
pub struct TargetSpawner;

impl TargetSpawner {
    /// Draw a uniform-area point inside the spawn disk.
    ///
    /// Disk radius is `cluster_scale * min(width, height)`; the sqrt on the
    /// radial draw keeps the distribution uniform over area, not radius.
    pub fn spawn_point<R: Rng>(rng: &mut R, arena: &Arena, cluster_scale: f32) -> (f32, f32) {
        let (cx, cy) = arena.center();
        let disk_radius = arena.width.min(arena.height) * cluster_scale;

        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen::<f32>().sqrt() * disk_radius;

        // Arenas narrower than twice the margin collapse to the center line
        let margin_x = EDGE_MARGIN.min(arena.width / 2.0);
        let margin_y = EDGE_MARGIN.min(arena.height / 2.0);

        let x = (cx + angle.cos() * dist).clamp(margin_x, arena.width - margin_x);
        let y = (cy + angle.sin() * dist).clamp(margin_y, arena.height - margin_y);
        (x, y)
    }

    pub fn spawn_target<R: Rng>(
        rng: &mut R,
        arena: &Arena,
        radius: f32,
        cluster_scale: f32,
    ) -> StaticTarget {
        let (x, y) = Self::spawn_point(rng, arena, cluster_scale);
        StaticTarget { x, y, radius }
    }

    /// Place a target that keeps at least `min_gap` clearance to every
    /// existing one. Best effort: after the attempt budget is spent the last
    /// candidate is returned unconditionally rather than blocking the run.
    pub fn spawn_non_overlapping<R: Rng>(
        rng: &mut R,
        arena: &Arena,
        existing: &[StaticTarget],
        radius: f32,
        cluster_scale: f32,
        min_gap: f32,
    ) -> StaticTarget {
        Self::spawn_non_overlapping_tracked(rng, arena, existing, radius, cluster_scale, min_gap).0
    }

    /// Same as [`spawn_non_overlapping`](Self::spawn_non_overlapping) but also
    /// reports the attempts consumed, so callers can tell a clean placement
    /// from budget exhaustion.
    pub fn spawn_non_overlapping_tracked<R: Rng>(
        rng: &mut R,
        arena: &Arena,
        existing: &[StaticTarget],
        radius: f32,
        cluster_scale: f32,
        min_gap: f32,
    ) -> (StaticTarget, u32) {
        for attempt in 1..=MAX_SPAWN_ATTEMPTS {
            let candidate = Self::spawn_target(rng, arena, radius, cluster_scale);
            if !existing.iter().any(|t| candidate.overlaps(t, min_gap)) {
                return (candidate, attempt);
            }
        }
        let fallback = Self::spawn_target(rng, arena, radius, cluster_scale);
        (fallback, MAX_SPAWN_ATTEMPTS + 1)
    }
}
