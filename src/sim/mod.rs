//! Training simulation modules

pub mod cursor;
pub mod run;
pub mod sensitivity;
pub mod spawner;
pub mod tracking;

pub use run::{MapKind, RunEvent, RunPhase, SessionStats, TrainingRun};

/// Raw input sampled for a single tick.
///
/// Pointer deltas are in input-device counts, not pixels; the input mapper
/// owns the conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub delta_x: f32,
    pub delta_y: f32,
    /// Primary fire was pressed this tick
    pub fire: bool,
    /// Secondary (aim-down-sights) is held
    pub ads_held: bool,
}
