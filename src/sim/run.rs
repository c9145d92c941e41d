//! Run state and the per-tick simulation loop

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::cursor::{Arena, Cursor, InputMapper};
use super::sensitivity::GameProfile;
use super::spawner::{StaticTarget, TargetSpawner};
use super::tracking::{MovingTarget, BASE_STRAFE_SPEED};
use super::TickInput;

/// Countdown length before play begins
pub const COUNTDOWN_SECS: f32 = 3.0;
/// Score subtracted on a missed shot (floored at zero)
pub const MISS_PENALTY: f32 = 2.0;
/// Continuous reward while the cursor tracks the moving target (points/sec)
pub const TRACKING_REWARD_PER_SEC: f32 = 6.0;
/// Minimum clearance between static targets at spawn time
pub const MIN_TARGET_GAP: f32 = 12.0;
/// Reaction target size and spawn-delay band
pub const REACTION_TARGET_RADIUS: f32 = 26.0;
pub const REACTION_DELAY_RANGE: (f32, f32) = (0.5, 1.5);
/// Cluster scale used when replacing a hit flick target
const RESPAWN_CLUSTER_SCALE: f32 = 0.24;

/// Training map variants with their per-kind parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    RegularFlick,
    SmallFlick,
    Tracking,
    Reaction,
}

/// Initial placement parameters for the flick maps
#[derive(Debug, Clone, Copy)]
pub struct FlickSpawnParams {
    pub count: usize,
    pub radius: f32,
    pub cluster_scale: f32,
}

impl MapKind {
    pub const ALL: [MapKind; 4] = [
        MapKind::RegularFlick,
        MapKind::SmallFlick,
        MapKind::Tracking,
        MapKind::Reaction,
    ];

    /// Stable key used by the score store
    pub fn key(&self) -> &'static str {
        match self {
            MapKind::RegularFlick => "regular_flick",
            MapKind::SmallFlick => "small_flick",
            MapKind::Tracking => "tracking",
            MapKind::Reaction => "reaction",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MapKind::RegularFlick => "Regular Ball Flick",
            MapKind::SmallFlick => "Small Ball Flick",
            MapKind::Tracking => "Tracking",
            MapKind::Reaction => "Reaction",
        }
    }

    /// Score awarded for a discrete hit on this map
    pub fn hit_reward(&self) -> f32 {
        match self {
            MapKind::RegularFlick | MapKind::SmallFlick => 10.0,
            MapKind::Tracking => 5.0,
            MapKind::Reaction => 15.0,
        }
    }

    /// Initial static-target layout, for the flick maps only
    pub fn flick_spawn_params(&self) -> Option<FlickSpawnParams> {
        match self {
            MapKind::RegularFlick => Some(FlickSpawnParams {
                count: 3,
                radius: 30.0,
                cluster_scale: 0.10,
            }),
            MapKind::SmallFlick => Some(FlickSpawnParams {
                count: 3,
                radius: 16.0,
                cluster_scale: 0.24,
            }),
            MapKind::Tracking | MapKind::Reaction => None,
        }
    }
}

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No run in progress
    Idle,
    /// Fixed countdown before play; cursor tracks input, fire is ignored
    Countdown,
    /// Run in progress
    Active,
    /// Run finished, summary available
    Summary,
}

/// Per-run scoring accumulator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub score: f32,
    pub shots: u32,
    pub hits: u32,
    /// Reaction-map hit latencies in milliseconds
    pub reaction_samples: Vec<f32>,
}

impl SessionStats {
    pub fn register_shot(&mut self) {
        self.shots += 1;
    }

    pub fn register_hit(&mut self, reward: f32) {
        self.hits += 1;
        self.score += reward;
    }

    pub fn register_miss(&mut self) {
        self.score = (self.score - MISS_PENALTY).max(0.0);
    }

    /// Hit percentage; zero when no shots were fired
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots as f32 * 100.0
        }
    }

    pub fn mean_reaction_ms(&self) -> Option<f32> {
        if self.reaction_samples.is_empty() {
            return None;
        }
        Some(self.reaction_samples.iter().sum::<f32>() / self.reaction_samples.len() as f32)
    }
}

/// Read-only result of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub map: MapKind,
    pub game: String,
    pub duration_secs: u32,
    pub shots: u32,
    pub hits: u32,
    pub accuracy: f32,
    pub score: f32,
    pub mean_reaction_ms: Option<f32>,
}

/// Discrete events emitted by the tick loop. Feedback layers (audio cues,
/// presentation) subscribe to these; the simulation expects nothing back.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    ShotFired,
    TargetHit { reward: f32 },
    ReactionTargetSpawned,
    RunFinished,
}

/// One training run: owns the cursor, targets, stats and RNG for its
/// duration, so every per-tick mutation is single-owner and synchronous.
pub struct TrainingRun {
    pub id: Uuid,
    pub map: MapKind,
    pub phase: RunPhase,
    pub arena: Arena,
    pub profile: GameProfile,
    pub cursor: Cursor,
    pub stats: SessionStats,
    pub targets: Vec<StaticTarget>,
    pub moving_target: Option<MovingTarget>,
    pub ads_held: bool,
    pub duration_secs: u32,
    pub time_left: f32,
    pub countdown_left: f32,
    /// Seconds since run start, accumulated from explicit dt
    pub clock: f32,
    rng: ChaCha8Rng,
    reaction_waiting: bool,
    reaction_spawn_at: f32,
    target_speed: f32,
    summary: Option<RunSummary>,
}

impl TrainingRun {
    pub fn new(
        map: MapKind,
        arena: Arena,
        profile: GameProfile,
        duration_secs: u32,
        seed: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            map,
            phase: RunPhase::Idle,
            arena,
            profile,
            cursor: Cursor::centered(&arena),
            stats: SessionStats::default(),
            targets: Vec::new(),
            moving_target: None,
            ads_held: false,
            duration_secs,
            time_left: 0.0,
            countdown_left: 0.0,
            clock: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            reaction_waiting: false,
            reaction_spawn_at: 0.0,
            target_speed: BASE_STRAFE_SPEED,
            summary: None,
        }
    }

    /// Override the tracking target's strafe speed (per-title pacing)
    pub fn set_target_speed(&mut self, speed: f32) {
        self.target_speed = speed;
    }

    /// Start (or restart) the run: reset stats and enter the countdown
    pub fn start(&mut self) {
        self.stats = SessionStats::default();
        self.cursor = Cursor::centered(&self.arena);
        self.ads_held = false;
        self.clock = 0.0;
        self.time_left = self.duration_secs as f32;
        self.countdown_left = COUNTDOWN_SECS;
        self.summary = None;
        self.init_map();
        self.phase = RunPhase::Countdown;

        info!(
            run_id = %self.id,
            map = self.map.key(),
            game = %self.profile.name,
            duration = self.duration_secs,
            "Run started"
        );
    }

    /// Abandon the run without finalizing a high score
    pub fn abandon(&mut self) {
        info!(run_id = %self.id, map = self.map.key(), "Run abandoned");
        self.phase = RunPhase::Idle;
        self.summary = None;
    }

    /// Summary of the last finished run, once in `Summary` phase
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Place the map's initial targets
    fn init_map(&mut self) {
        self.targets.clear();
        self.moving_target = None;
        self.reaction_waiting = false;

        match self.map {
            MapKind::RegularFlick | MapKind::SmallFlick => {
                if let Some(params) = self.map.flick_spawn_params() {
                    for _ in 0..params.count {
                        let target = TargetSpawner::spawn_non_overlapping(
                            &mut self.rng,
                            &self.arena,
                            &self.targets,
                            params.radius,
                            params.cluster_scale,
                            MIN_TARGET_GAP,
                        );
                        self.targets.push(target);
                    }
                }
            }
            MapKind::Reaction => {
                self.reaction_waiting = true;
                self.reaction_spawn_at = self.clock
                    + self
                        .rng
                        .gen_range(REACTION_DELAY_RANGE.0..REACTION_DELAY_RANGE.1);
            }
            MapKind::Tracking => {
                self.moving_target = Some(MovingTarget::spawn(
                    &mut self.rng,
                    &self.arena,
                    self.target_speed,
                ));
            }
        }
    }

    /// Advance the run by one tick of input and elapsed time
    pub fn tick(&mut self, input: TickInput, dt: f32) -> Vec<RunEvent> {
        let mut events = Vec::new();

        match self.phase {
            RunPhase::Idle | RunPhase::Summary => {}
            RunPhase::Countdown => {
                // Aim is live during the countdown so the player is ready at go,
                // but fire is not processed
                self.apply_aim_input(&input);
                self.countdown_left = (self.countdown_left - dt).max(0.0);
                if self.countdown_left <= 0.0 {
                    self.phase = RunPhase::Active;
                    debug!(run_id = %self.id, "Countdown finished, run active");
                }
            }
            RunPhase::Active => {
                self.clock += dt;
                self.apply_aim_input(&input);

                if input.fire {
                    events.extend(self.handle_shot());
                }

                if self.reaction_waiting && self.clock >= self.reaction_spawn_at {
                    self.targets = vec![TargetSpawner::spawn_target(
                        &mut self.rng,
                        &self.arena,
                        REACTION_TARGET_RADIUS,
                        RESPAWN_CLUSTER_SCALE,
                    )];
                    self.reaction_waiting = false;
                    self.reaction_spawn_at = self.clock;
                    events.push(RunEvent::ReactionTargetSpawned);
                }

                if let Some(target) = self.moving_target.as_mut() {
                    target.update(&mut self.rng, &self.arena, dt);
                    if target.contains(self.cursor.x, self.cursor.y) {
                        self.stats.score += TRACKING_REWARD_PER_SEC * dt;
                    }
                }

                self.time_left = (self.time_left - dt).max(0.0);
                if self.time_left <= 0.0 {
                    self.finish();
                    events.push(RunEvent::RunFinished);
                }
            }
        }

        events
    }

    fn apply_aim_input(&mut self, input: &TickInput) {
        self.ads_held = input.ads_held;
        InputMapper::apply_pointer_delta(
            &mut self.cursor,
            &self.arena,
            &self.profile,
            self.ads_held,
            input.delta_x,
            input.delta_y,
        );
    }

    /// Evaluate one fire press against the map's active target source
    fn handle_shot(&mut self) -> Vec<RunEvent> {
        let mut events = vec![RunEvent::ShotFired];
        self.stats.register_shot();

        let reward = self.map.hit_reward();
        let hit = match self.map {
            MapKind::RegularFlick | MapKind::SmallFlick => self.handle_flick_shot(),
            MapKind::Reaction => self.handle_reaction_shot(),
            MapKind::Tracking => self
                .moving_target
                .as_ref()
                .is_some_and(|t| t.contains(self.cursor.x, self.cursor.y)),
        };

        if hit {
            self.stats.register_hit(reward);
            events.push(RunEvent::TargetHit { reward });
        } else {
            self.stats.register_miss();
        }

        events
    }

    /// Flick hit replaces only the struck target, spawned clear of the rest
    fn handle_flick_shot(&mut self) -> bool {
        let hit_index = self
            .targets
            .iter()
            .position(|t| t.contains(self.cursor.x, self.cursor.y));

        let Some(index) = hit_index else {
            return false;
        };

        let radius = self.targets[index].radius;
        let others: Vec<StaticTarget> = self
            .targets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, t)| *t)
            .collect();

        self.targets[index] = TargetSpawner::spawn_non_overlapping(
            &mut self.rng,
            &self.arena,
            &others,
            radius,
            RESPAWN_CLUSTER_SCALE,
            MIN_TARGET_GAP,
        );
        true
    }

    /// Reaction hit records the latency and schedules the next appearance
    fn handle_reaction_shot(&mut self) -> bool {
        let Some(target) = self.targets.first() else {
            return false;
        };
        if !target.contains(self.cursor.x, self.cursor.y) {
            return false;
        }

        let sample_ms = (self.clock - self.reaction_spawn_at) * 1000.0;
        self.stats.reaction_samples.push(sample_ms);
        self.targets.clear();
        self.reaction_waiting = true;
        self.reaction_spawn_at = self.clock
            + self
                .rng
                .gen_range(REACTION_DELAY_RANGE.0..REACTION_DELAY_RANGE.1);
        true
    }

    fn finish(&mut self) {
        let summary = RunSummary {
            map: self.map,
            game: self.profile.name.clone(),
            duration_secs: self.duration_secs,
            shots: self.stats.shots,
            hits: self.stats.hits,
            accuracy: self.stats.accuracy(),
            score: self.stats.score,
            mean_reaction_ms: self.stats.mean_reaction_ms(),
        };

        info!(
            run_id = %self.id,
            map = self.map.key(),
            score = summary.score,
            hits = summary.hits,
            shots = summary.shots,
            accuracy = summary.accuracy,
            "Run finished"
        );

        self.summary = Some(summary);
        self.phase = RunPhase::Summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 240.0;

    fn profile() -> GameProfile {
        GameProfile {
            name: "Counter-Strike 2".to_string(),
            yaw: 0.022,
            hipfire_sens: 1.5,
            ads_sens: 1.0,
            dpi: 800.0,
            fov_h_deg: 103.0,
            x_factor: None,
            scope_modifier: None,
        }
    }

    fn run(map: MapKind) -> TrainingRun {
        TrainingRun::new(map, Arena::new(1920.0, 1080.0), profile(), 30, 99)
    }

    fn still() -> TickInput {
        TickInput::default()
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..TickInput::default()
        }
    }

    /// Drive the countdown to completion with no pointer movement
    fn skip_countdown(r: &mut TrainingRun) {
        while r.phase == RunPhase::Countdown {
            r.tick(still(), 0.1);
        }
        assert_eq!(r.phase, RunPhase::Active);
    }

    /// Park the cursor exactly on a target center
    fn aim_at(r: &mut TrainingRun, x: f32, y: f32) {
        r.cursor.x = x;
        r.cursor.y = y;
    }

    #[test]
    fn countdown_holds_for_three_seconds_and_ignores_fire() {
        let mut r = run(MapKind::RegularFlick);
        r.start();
        assert_eq!(r.phase, RunPhase::Countdown);

        let mut elapsed = 0.0;
        while r.phase == RunPhase::Countdown {
            r.tick(fire(), DT);
            elapsed += DT;
        }
        assert!((elapsed - COUNTDOWN_SECS).abs() < 0.05);
        assert_eq!(r.stats.shots, 0, "countdown must not process fire");
    }

    #[test]
    fn countdown_still_tracks_the_cursor() {
        let mut r = run(MapKind::RegularFlick);
        r.start();
        let before = r.cursor;
        r.tick(
            TickInput {
                delta_x: 200.0,
                delta_y: 120.0,
                ..TickInput::default()
            },
            DT,
        );
        assert_ne!(r.cursor, before);
    }

    #[test]
    fn flick_hit_rewards_and_replaces_only_the_struck_target() {
        let mut r = run(MapKind::RegularFlick);
        r.start();
        skip_countdown(&mut r);
        assert_eq!(r.targets.len(), 3);

        let untouched = [r.targets[1], r.targets[2]];
        let struck = r.targets[0];
        aim_at(&mut r, struck.x, struck.y);

        let events = r.tick(fire(), DT);
        assert!(events.contains(&RunEvent::ShotFired));
        assert!(events.contains(&RunEvent::TargetHit { reward: 10.0 }));
        assert_eq!(r.stats.hits, 1);
        assert_eq!(r.stats.shots, 1);
        assert!((r.stats.score - 10.0).abs() < 1e-5);

        assert_eq!(r.targets.len(), 3);
        assert_eq!(r.targets[1], untouched[0]);
        assert_eq!(r.targets[2], untouched[1]);
        assert_ne!(r.targets[0], struck);
    }

    #[test]
    fn misses_cost_two_points_with_a_floor_at_zero() {
        let mut r = run(MapKind::RegularFlick);
        r.start();
        skip_countdown(&mut r);

        // Guaranteed miss: outside the spawn disk
        aim_at(&mut r, 1.0, 1.0);
        r.tick(fire(), DT);
        assert_eq!(r.stats.shots, 1);
        assert_eq!(r.stats.hits, 0);
        assert_eq!(r.stats.score, 0.0, "penalty is clamped at zero");

        // Hit then miss: 10 - 2 = 8
        let t = r.targets[0];
        aim_at(&mut r, t.x, t.y);
        r.tick(fire(), DT);
        aim_at(&mut r, 1.0, 1.0);
        r.tick(fire(), DT);
        assert!((r.stats.score - 8.0).abs() < 1e-5);
        assert_eq!(r.stats.shots, 3);
        assert_eq!(r.stats.hits, 1);
    }

    #[test]
    fn scoring_matches_closed_form_over_a_shot_sequence() {
        let mut r = run(MapKind::SmallFlick);
        r.start();
        skip_countdown(&mut r);

        let mut hits = 0u32;
        let mut expected = 0.0f32;
        for i in 0..10 {
            if i % 2 == 0 {
                let t = r.targets[0];
                aim_at(&mut r, t.x, t.y);
                hits += 1;
                expected += 10.0;
            } else {
                aim_at(&mut r, 1.0, 1.0);
                expected = (expected - MISS_PENALTY).max(0.0);
            }
            r.tick(fire(), DT);
        }
        assert_eq!(r.stats.shots, 10);
        assert_eq!(r.stats.hits, hits);
        assert!((r.stats.score - expected).abs() < 1e-4);
    }

    #[test]
    fn reaction_sample_records_spawn_to_hit_delay() {
        let mut r = run(MapKind::Reaction);
        r.start();
        skip_countdown(&mut r);
        assert!(r.targets.is_empty());

        // Let the scheduled spawn elapse
        let mut spawned = false;
        for _ in 0..(240 * 2) {
            if r.tick(still(), DT)
                .contains(&RunEvent::ReactionTargetSpawned)
            {
                spawned = true;
                break;
            }
        }
        assert!(spawned);
        assert_eq!(r.targets.len(), 1);

        // Hit after exactly 120 ticks = 0.5 s
        for _ in 0..119 {
            r.tick(still(), DT);
        }
        let t = r.targets[0];
        aim_at(&mut r, t.x, t.y);
        let events = r.tick(fire(), DT);

        assert!(events.contains(&RunEvent::TargetHit { reward: 15.0 }));
        assert_eq!(r.stats.reaction_samples.len(), 1);
        let sample = r.stats.reaction_samples[0];
        assert!((sample - 500.0).abs() < 5.0, "sample {sample} ms");
        assert!(r.targets.is_empty(), "target is consumed by the hit");
    }

    #[test]
    fn tracking_accrues_continuous_reward_while_on_target() {
        let mut r = run(MapKind::Tracking);
        r.start();
        skip_countdown(&mut r);

        // Pin the cursor to the target each tick for one second
        for _ in 0..240 {
            let (x, y) = {
                let t = r.moving_target.as_ref().unwrap();
                (t.x, t.y)
            };
            aim_at(&mut r, x, y);
            r.tick(still(), DT);
        }
        let on_target = r.stats.score;
        assert!((on_target - TRACKING_REWARD_PER_SEC).abs() < 0.1);

        // Off target: no accrual
        aim_at(&mut r, 1.0, 1.0);
        for _ in 0..240 {
            r.tick(still(), DT);
        }
        assert!((r.stats.score - on_target).abs() < 1e-3);
    }

    #[test]
    fn tracking_discrete_hit_pays_flat_reward() {
        let mut r = run(MapKind::Tracking);
        r.start();
        skip_countdown(&mut r);

        aim_at(&mut r, 1.0, 1.0);
        let before = r.stats.score;
        let (x, y) = {
            let t = r.moving_target.as_ref().unwrap();
            (t.x, t.y)
        };
        aim_at(&mut r, x, y);
        let events = r.tick(fire(), DT);
        assert!(events.contains(&RunEvent::TargetHit { reward: 5.0 }));
        // 5.0 discrete plus one tick of continuous reward
        let gained = r.stats.score - before;
        assert!((gained - (5.0 + TRACKING_REWARD_PER_SEC * DT)).abs() < 1e-3);
    }

    #[test]
    fn run_finishes_after_the_configured_duration() {
        let mut r = TrainingRun::new(
            MapKind::RegularFlick,
            Arena::new(1920.0, 1080.0),
            profile(),
            1,
            5,
        );
        r.start();
        skip_countdown(&mut r);

        let mut finished = false;
        for _ in 0..(240 * 2) {
            if r.tick(still(), DT).contains(&RunEvent::RunFinished) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(r.phase, RunPhase::Summary);
        let summary = r.summary().unwrap();
        assert_eq!(summary.duration_secs, 1);
        assert_eq!(summary.shots, 0);
        assert_eq!(summary.accuracy, 0.0);
    }

    #[test]
    fn abandon_returns_to_idle_without_a_summary() {
        let mut r = run(MapKind::RegularFlick);
        r.start();
        skip_countdown(&mut r);
        r.abandon();
        assert_eq!(r.phase, RunPhase::Idle);
        assert!(r.summary().is_none());
        // Ticks do nothing while idle
        assert!(r.tick(fire(), DT).is_empty());
        assert_eq!(r.stats.shots, 0);
    }

    #[test]
    fn fixed_seed_replays_identically() {
        let play = |seed: u64| {
            let mut r =
                TrainingRun::new(MapKind::Tracking, Arena::new(1920.0, 1080.0), profile(), 2, seed);
            r.start();
            skip_countdown(&mut r);
            for i in 0..400 {
                let input = TickInput {
                    delta_x: (i % 7) as f32 - 3.0,
                    delta_y: (i % 5) as f32 - 2.0,
                    fire: i % 60 == 0,
                    ads_held: false,
                };
                r.tick(input, DT);
            }
            let t = r.moving_target.as_ref().unwrap();
            (r.stats.clone(), t.x, t.y)
        };

        assert_eq!(play(1234), play(1234));
    }
}
