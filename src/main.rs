//! Aim trainer simulation core
//!
//! Headless entry point for the training simulation. It handles:
//! - Sensitivity profile and high score persistence
//! - The fixed-tick run lifecycle for every training map
//! - A scripted input source that drives a demo run per map
//!
//! Windowing, rendering and audio live in a separate presentation layer
//! that consumes the run state and events read-only.

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aim_trainer::config::Config;
use aim_trainer::sim::cursor::{Arena, InputMapper};
use aim_trainer::sim::run::RunSummary;
use aim_trainer::sim::sensitivity::{fov_horizontal_to_vertical, GameProfile};
use aim_trainer::sim::{MapKind, RunPhase, TickInput, TrainingRun};
use aim_trainer::store::{ProfileStore, ScoreStore};
use aim_trainer::util::time::{tick_delta, Timer, SIMULATION_TPS};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting aim trainer core");
    info!(
        arena_width = config.arena_width,
        arena_height = config.arena_height,
        duration = config.run_duration_secs,
        "Simulation configured"
    );

    let arena = Arena::new(config.arena_width, config.arena_height);

    let profile_store = ProfileStore::new(config.profiles_path());
    let profiles = profile_store.load();
    let profile = profiles
        .get("cs2")
        .cloned()
        .context("default profile set is missing cs2")?;
    info!(
        game = %profile.name,
        cm360 = profile.cm_per_360(false),
        fov_h = profile.fov_h_deg,
        fov_v = fov_horizontal_to_vertical(profile.fov_h_deg, arena.aspect()),
        "Active profile loaded"
    );

    let score_store = ScoreStore::new(config.scores_path());
    let mut board = score_store.load();

    for map in MapKind::ALL {
        let timer = Timer::new();
        let summary = play_scripted_run(map, arena, profile.clone(), config.run_duration_secs)?;

        info!(
            map = map.key(),
            score = summary.score,
            hits = summary.hits,
            shots = summary.shots,
            accuracy = summary.accuracy,
            wall_ms = timer.elapsed_ms(),
            "Demo run complete"
        );

        if board.try_promote(&summary) {
            info!(map = map.key(), score = summary.score, "New high score");
            score_store.save(&board)?;
        }
    }

    for map in MapKind::ALL {
        let record = board.record(map);
        info!(
            map = map.display_name(),
            score = record.score,
            accuracy = record.accuracy,
            game = %record.game,
            "High score"
        );
    }

    Ok(())
}

/// Drive one run to completion with the scripted input source
fn play_scripted_run(
    map: MapKind,
    arena: Arena,
    profile: GameProfile,
    duration_secs: u32,
) -> anyhow::Result<RunSummary> {
    let mut run = TrainingRun::new(map, arena, profile, duration_secs, rand::random());
    run.start();

    let dt = tick_delta();
    let tick_budget = (duration_secs as u64 + 10) * SIMULATION_TPS as u64 * 2;

    for tick in 0..tick_budget {
        if run.phase == RunPhase::Summary {
            break;
        }
        let input = scripted_input(tick, &run);
        for event in run.tick(input, dt) {
            debug!(run_id = %run.id, ?event, "Run event");
        }
    }

    run.summary()
        .cloned()
        .context("run ended without a summary")
}

/// Synthetic input: steer toward the active target and fire periodically,
/// so the demo exercises the hit, miss and tracking paths.
fn scripted_input(tick: u64, run: &TrainingRun) -> TickInput {
    let aim = run
        .moving_target
        .as_ref()
        .map(|t| (t.x, t.y))
        .or_else(|| run.targets.first().map(|t| (t.x, t.y)));

    let scale = InputMapper::px_per_count(&run.arena, &run.profile, false).max(1e-3);
    let (delta_x, delta_y) = match aim {
        Some((tx, ty)) => (
            (tx - run.cursor.x) * 0.2 / scale,
            (ty - run.cursor.y) * 0.2 / scale,
        ),
        None => (0.0, 0.0),
    };

    TickInput {
        delta_x,
        delta_y,
        fire: tick % 48 == 0,
        ads_held: false,
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
