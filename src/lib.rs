//! Simulation core for an FPS aim-training application.
//!
//! The crate owns everything that defines "aim feel" and training outcomes:
//! - per-title sensitivity and optics conversions ([`sim::sensitivity`])
//! - raw pointer-delta to cursor mapping ([`sim::cursor`])
//! - procedural target placement ([`sim::spawner`])
//! - the moving-target behavior machine ([`sim::tracking`])
//! - run lifecycle, scoring and events ([`sim::run`])
//! - profile and high-score persistence ([`store`])
//!
//! Windowing, rendering, menus and audio are a separate presentation layer:
//! it feeds raw input into [`sim::TrainingRun::tick`], reads the run state
//! back, and reacts to the returned [`sim::RunEvent`]s.

pub mod config;
pub mod sim;
pub mod store;
pub mod util;
