//! Session state and round rules
//!
//! All state needed to replay or resume a game lives here. Viewport-derived
//! metrics are computed once per session into [`RoundConfig`] and passed to
//! every component explicitly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::balloon::{BalloonArena, BalloonId};
use super::collision::CollisionOutcome;
use super::pig::Pig;
use super::scenery::{Cloud, PopEffect};
use super::spawn::SpawnScheduler;
use super::timers::{DeferredAction, TimerOwner, TimerQueue};
use super::trajectory::TrajectoryState;
use crate::consts::*;

/// Stream id separating cosmetic rolls from gameplay rolls
const SCENERY_STREAM: u64 = 0x5ce7_e47;

/// Current stage of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStage {
    /// Title screen, no pig
    Menu,
    /// Pig placed, waiting for the start signal
    Ready,
    /// Active round
    InGame,
    /// Round over, waiting out the end delay
    EndGame,
}

/// Things that happened during a tick, for audio/persistence/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    BalloonPopped { id: BalloonId, pitch: f32 },
    BalloonMissed { id: BalloonId },
    /// Score reached a bonus multiple
    AllowanceBonus { miss_allowance: u32 },
    GameOver { score: u32, pitch: f32 },
    /// Written to storage by the driver
    BestScoreImproved { best: u32 },
    ReturnedToReady,
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Metrics derived from the viewport, fixed for the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub viewport: Viewport,
    pub balloon_size: Vec2,
    pub pig_size: Vec2,
    /// Speed at round start
    pub base_speed: f32,
    /// Speed added per pop
    pub speed_gain: f32,
    /// Scrolled distance between spawns
    pub spawn_spacing: f32,
}

impl RoundConfig {
    pub fn from_viewport(viewport: Viewport) -> Self {
        let balloon_height = viewport.height * BALLOON_HEIGHT_RATIO;
        let balloon_width = balloon_height * BALLOON_ASPECT;
        let pig_height = viewport.height * PIG_HEIGHT_RATIO;
        Self {
            viewport,
            balloon_size: Vec2::new(balloon_width, balloon_height),
            pig_size: Vec2::new(pig_height * PIG_ASPECT, pig_height),
            base_speed: BASE_SPEED * (balloon_width / REFERENCE_BALLOON_WIDTH),
            speed_gain: balloon_width * SPEED_GAIN_PER_WIDTH,
            spawn_spacing: balloon_width * SPAWN_SPACING_WIDTHS,
        }
    }
}

/// HUD indicators driven by the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudState {
    /// Allowance counter flashes after a bonus
    pub allowance_flash: bool,
    /// Current score beats the stored best
    pub record_broken: bool,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (balloon stream, variants)
    rng: Pcg32,
    /// Cosmetic RNG (pitches, clouds)
    scenery_rng: Pcg32,
    pub config: RoundConfig,
    pub stage: GameStage,
    pub score: u32,
    pub miss_count: u32,
    pub miss_allowance: u32,
    /// Balloon speed in pixels per tick; zero once the round is over
    pub speed: f32,
    pub best_score: u32,
    /// Bonus multiples already paid out this round
    bonus_paid: u32,
    pub hud: HudState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub pig: Option<Pig>,
    pub balloons: BalloonArena,
    pub trajectory: TrajectoryState,
    pub spawner: SpawnScheduler,
    pub timers: TimerQueue,
    pub pops: Vec<PopEffect>,
    pub clouds: Vec<Cloud>,
    /// Events raised since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next cosmetic entity ID
    next_id: u32,
}

impl GameState {
    /// New session on the title screen
    pub fn new(seed: u64, viewport: Viewport, best_score: u32) -> Self {
        let config = RoundConfig::from_viewport(viewport);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scenery_rng: Pcg32::new(seed, SCENERY_STREAM),
            trajectory: TrajectoryState::new(viewport.height),
            config,
            stage: GameStage::Menu,
            score: 0,
            miss_count: 0,
            miss_allowance: BASE_MISS_ALLOWANCE,
            speed: 0.0,
            best_score,
            bonus_paid: 0,
            hud: HudState::default(),
            time_ticks: 0,
            pig: None,
            balloons: BalloonArena::new(),
            spawner: SpawnScheduler::default(),
            timers: TimerQueue::new(),
            pops: Vec::new(),
            clouds: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new cosmetic entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    /// Whether the start signal is accepted
    pub fn can_start(&self) -> bool {
        matches!(self.stage, GameStage::Menu | GameStage::Ready)
    }

    /// Reset counters and stream state and begin a round
    pub fn start_round(&mut self) {
        if !self.can_start() {
            return;
        }
        self.score = 0;
        self.miss_count = 0;
        self.miss_allowance = BASE_MISS_ALLOWANCE;
        self.speed = self.config.base_speed;
        self.bonus_paid = 0;
        self.hud = HudState::default();
        self.trajectory = TrajectoryState::new(self.config.viewport.height);
        self.spawner.reset();
        self.clear_balloons();
        self.pig = Some(Pig::spawn(&self.config));
        self.stage = GameStage::InGame;
        self.events.push(GameEvent::RoundStarted);
        log::info!(
            "Round started (speed {:.2}, best {})",
            self.speed,
            self.best_score
        );
    }

    /// Spawn the next balloon of the stream just off the right edge
    pub fn spawn_balloon(&mut self) -> BalloonId {
        let y = self.trajectory.next_spawn_y(
            self.config.balloon_size.y,
            self.config.viewport.height,
            &mut self.rng,
        );
        let variant = self.rng.random_range(0..BALLOON_VARIANTS);
        self.place_balloon(Vec2::new(self.config.viewport.width, y), variant)
    }

    /// Insert a balloon at an explicit position
    pub fn place_balloon(&mut self, pos: Vec2, variant: u8) -> BalloonId {
        self.balloons.insert(pos, self.config.balloon_size, variant)
    }

    /// Remove a balloon and cancel anything it still had scheduled
    pub fn remove_balloon(&mut self, id: BalloonId) -> bool {
        let removed = self.balloons.remove(id).is_some();
        if removed {
            self.timers.cancel_owner(TimerOwner::Balloon(id));
        }
        removed
    }

    fn clear_balloons(&mut self) {
        for id in self.balloons.ids() {
            self.remove_balloon(id);
        }
    }

    /// Apply one tick's hits and misses
    pub fn apply_outcome(&mut self, outcome: &CollisionOutcome) {
        for &id in &outcome.hits {
            let Some(balloon) = self.balloons.get(id).map(|b| b.bounds()) else {
                continue;
            };
            self.remove_balloon(id);
            self.score += 1;
            self.speed += self.config.speed_gain;

            let pop_id = self.next_entity_id();
            self.pops.push(PopEffect::for_balloon(pop_id, balloon));
            self.timers.schedule(
                self.time_ticks,
                POP_EFFECT_TICKS,
                TimerOwner::Effect(pop_id),
                DeferredAction::ExpireEffect(pop_id),
            );

            let pitch = self.roll_pitch();
            self.events.push(GameEvent::BalloonPopped { id, pitch });
        }

        for &id in &outcome.misses {
            if self.remove_balloon(id) {
                self.miss_count += 1;
                self.events.push(GameEvent::BalloonMissed { id });
                log::debug!("Missed ({}/{})", self.miss_count, self.miss_allowance);
            }
        }

        if self.score > self.best_score {
            self.hud.record_broken = true;
        }
    }

    /// Grant extra misses once for every bonus multiple the score has passed
    pub fn check_bonus(&mut self) {
        let earned = self.score / BONUS_SCORE_INTERVAL;
        if self.bonus_paid >= earned {
            return;
        }
        while self.bonus_paid < earned {
            self.bonus_paid += 1;
            self.miss_allowance += BONUS_MISS_ALLOWANCE;
            self.events.push(GameEvent::AllowanceBonus {
                miss_allowance: self.miss_allowance,
            });
        }
        self.hud.allowance_flash = true;
        self.timers.schedule(
            self.time_ticks,
            ALLOWANCE_FLASH_TICKS,
            TimerOwner::Session,
            DeferredAction::EndAllowanceFlash,
        );
        log::info!(
            "Bonus at {} points: {} misses allowed",
            self.score,
            self.miss_allowance
        );
    }

    /// Out of misses, or the pig has left the playfield
    pub fn is_terminal(&self) -> bool {
        if self.miss_count >= self.miss_allowance {
            return true;
        }
        self.pig
            .as_ref()
            .is_some_and(|pig| pig.is_out_of_bounds(self.config.viewport.height))
    }

    /// Stop the round, record the best score and queue the teardown
    pub fn end_round(&mut self) {
        if self.stage != GameStage::InGame {
            return;
        }
        self.speed = 0.0;
        self.stage = GameStage::EndGame;

        let pitch = self.roll_pitch();
        self.events.push(GameEvent::GameOver {
            score: self.score,
            pitch,
        });
        if self.score > self.best_score {
            self.best_score = self.score;
            self.events.push(GameEvent::BestScoreImproved {
                best: self.best_score,
            });
        }
        log::info!(
            "Game over: {} popped, {}/{} missed (best {})",
            self.score,
            self.miss_count,
            self.miss_allowance,
            self.best_score
        );

        if let Some(pig) = self.pig.take() {
            let burst_id = self.next_entity_id();
            self.pops.push(PopEffect::for_pig(burst_id, pig.bounds()));
            self.timers.schedule(
                self.time_ticks,
                POP_EFFECT_TICKS,
                TimerOwner::Effect(burst_id),
                DeferredAction::ExpireEffect(burst_id),
            );
        }

        for id in self.balloons.ids() {
            self.timers.schedule(
                self.time_ticks,
                BALLOON_CLEANUP_DELAY_TICKS,
                TimerOwner::Balloon(id),
                DeferredAction::DespawnBalloon(id),
            );
        }
        self.timers.schedule(
            self.time_ticks,
            END_GAME_DELAY_TICKS,
            TimerOwner::Session,
            DeferredAction::ReturnToReady,
        );
    }

    /// Run a fired timer
    pub fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::DespawnBalloon(id) => {
                self.remove_balloon(id);
            }
            DeferredAction::ExpireEffect(id) => {
                self.pops.retain(|p| p.id != id);
            }
            DeferredAction::EndAllowanceFlash => {
                self.hud.allowance_flash = false;
            }
            DeferredAction::ReturnToReady => self.return_to_ready(),
        }
    }

    fn return_to_ready(&mut self) {
        if self.stage != GameStage::EndGame {
            return;
        }
        self.clear_balloons();
        self.pig = Some(Pig::spawn(&self.config));
        self.stage = GameStage::Ready;
        self.events.push(GameEvent::ReturnedToReady);
        log::debug!("Ready for next round");
    }

    /// Advance pop bursts and clouds; spawn clouds on their interval
    pub fn update_scenery(&mut self) {
        for pop in &mut self.pops {
            pop.advance(self.speed);
        }

        if self.time_ticks % CLOUD_SPAWN_INTERVAL_TICKS == 0 {
            let id = self.next_entity_id();
            let cloud = Cloud::roll(id, &self.config, &mut self.scenery_rng);
            self.clouds.push(cloud);
        }
        for cloud in &mut self.clouds {
            cloud.advance(self.speed);
        }
        self.clouds.retain(|c| !c.is_gone());
    }

    /// Sound pitch in 0.8..=2.0, stepped by 0.1
    fn roll_pitch(&mut self) -> f32 {
        self.scenery_rng.random_range(8..=20) as f32 / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::trajectory::Heading;

    fn state() -> GameState {
        GameState::new(42, Viewport::new(800.0, 600.0), 0)
    }

    #[test]
    fn test_round_config_proportions() {
        let config = RoundConfig::from_viewport(Viewport::new(800.0, 600.0));
        let balloon_h = 600.0 * 0.0693;
        let balloon_w = balloon_h * 87.0 / 103.0;
        assert!((config.balloon_size.y - balloon_h).abs() < 1e-3);
        assert!((config.balloon_size.x - balloon_w).abs() < 1e-3);
        assert!((config.base_speed - 5.0 * balloon_w / 48.467).abs() < 1e-4);
        assert!((config.speed_gain - balloon_w * 0.00025).abs() < 1e-6);
        assert!((config.spawn_spacing - balloon_w * 1.2).abs() < 1e-3);
    }

    #[test]
    fn test_new_session_is_menu() {
        let state = state();
        assert_eq!(state.stage, GameStage::Menu);
        assert!(state.pig.is_none());
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.miss_allowance, BASE_MISS_ALLOWANCE);
    }

    #[test]
    fn test_start_round_resets_everything() {
        let mut state = state();
        state.score = 12;
        state.miss_count = 4;
        state.miss_allowance = 30;
        state.spawner.distance_since_last_spawn = 9.0;
        state.trajectory.heading = Heading::Up;
        state.place_balloon(Vec2::new(100.0, 100.0), 0);

        state.start_round();

        assert_eq!(state.stage, GameStage::InGame);
        assert_eq!(state.score, 0);
        assert_eq!(state.miss_count, 0);
        assert_eq!(state.miss_allowance, BASE_MISS_ALLOWANCE);
        assert_eq!(state.speed, state.config.base_speed);
        assert_eq!(state.spawner.distance_since_last_spawn, 0.0);
        assert_eq!(state.trajectory, TrajectoryState::new(600.0));
        assert!(state.balloons.is_empty());
        assert!(state.pig.is_some());
        assert_eq!(state.events, vec![GameEvent::RoundStarted]);
    }

    #[test]
    fn test_start_ignored_mid_round() {
        let mut state = state();
        state.start_round();
        state.score = 3;
        state.start_round();
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_spawned_balloon_enters_at_right_edge() {
        let mut state = state();
        state.start_round();
        let id = state.spawn_balloon();
        let balloon = state.balloons.get(id).unwrap();
        assert_eq!(balloon.pos.x, 800.0);
        assert_eq!(balloon.pos.y, 300.0);
        assert_eq!(balloon.size, state.config.balloon_size);
        assert!(balloon.variant < BALLOON_VARIANTS);
    }

    #[test]
    fn test_hit_scores_and_speeds_up() {
        let mut state = state();
        state.start_round();
        let s0 = state.speed;
        let id = state.place_balloon(Vec2::new(50.0, 300.0), 0);
        state.apply_outcome(&CollisionOutcome {
            hits: vec![id],
            misses: vec![],
        });
        assert_eq!(state.score, 1);
        assert!((state.speed - (s0 + state.config.balloon_size.x * 0.00025)).abs() < 1e-6);
        assert!(!state.balloons.contains(id));
        assert_eq!(state.pops.len(), 1);
        assert!(state.hud.record_broken);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::BalloonPopped { pitch, .. }) if (0.8..=2.0).contains(pitch)
        ));
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let mut state = state();
        state.start_round();
        let id = state.place_balloon(Vec2::new(-100.0, 300.0), 0);
        let outcome = CollisionOutcome {
            hits: vec![],
            misses: vec![id],
        };
        state.apply_outcome(&outcome);
        state.apply_outcome(&outcome);
        assert_eq!(state.miss_count, 1);
    }

    #[test]
    fn test_bonus_paid_once_per_multiple() {
        let mut state = state();
        state.start_round();
        state.score = 50;
        state.check_bonus();
        assert_eq!(state.miss_allowance, 20);
        assert!(state.hud.allowance_flash);
        state.check_bonus();
        assert_eq!(state.miss_allowance, 20);

        state.score = 51;
        state.check_bonus();
        state.score = 100;
        state.check_bonus();
        assert_eq!(state.miss_allowance, 30);
    }

    #[test]
    fn test_bonus_catches_up_on_skipped_multiples() {
        let mut state = state();
        state.start_round();
        state.score = 101;
        state.check_bonus();
        assert_eq!(state.miss_allowance, BASE_MISS_ALLOWANCE + 20);
        let bonuses = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::AllowanceBonus { .. }))
            .count();
        assert_eq!(bonuses, 2);

        // A new round pays out from scratch
        state.end_round();
        state.stage = GameStage::Ready;
        state.start_round();
        state.score = 50;
        state.check_bonus();
        assert_eq!(state.miss_allowance, BASE_MISS_ALLOWANCE + 10);
    }

    #[test]
    fn test_terminal_on_equal_misses() {
        let mut state = state();
        state.start_round();
        state.miss_count = 9;
        assert!(!state.is_terminal());
        state.miss_count = 10;
        assert!(state.is_terminal());
    }

    #[test]
    fn test_end_round_persists_only_improvements() {
        let mut state = GameState::new(1, Viewport::new(800.0, 600.0), 20);
        state.start_round();
        state.score = 15;
        state.end_round();
        assert_eq!(state.best_score, 20);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::BestScoreImproved { .. }))
        );

        let mut state = GameState::new(1, Viewport::new(800.0, 600.0), 20);
        state.start_round();
        state.score = 21;
        state.end_round();
        assert_eq!(state.best_score, 21);
        assert!(
            state
                .events
                .contains(&GameEvent::BestScoreImproved { best: 21 })
        );
    }

    #[test]
    fn test_end_round_schedules_teardown() {
        let mut state = state();
        state.start_round();
        let a = state.place_balloon(Vec2::new(400.0, 300.0), 0);
        let b = state.place_balloon(Vec2::new(500.0, 300.0), 0);
        state.end_round();

        assert_eq!(state.stage, GameStage::EndGame);
        assert_eq!(state.speed, 0.0);
        assert!(state.pig.is_none());
        assert!(state.timers.is_pending(TimerOwner::Balloon(a)));
        assert!(state.timers.is_pending(TimerOwner::Balloon(b)));

        // Removing a balloon early cancels its despawn
        state.remove_balloon(a);
        assert!(!state.timers.is_pending(TimerOwner::Balloon(a)));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = state();
        state.start_round();
        state.spawn_balloon();
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.stage, GameStage::InGame);
        assert_eq!(restored.balloons.len(), 1);
        assert_eq!(restored.spawn_balloon(), state.spawn_balloon());
        assert_eq!(restored.trajectory, state.trajectory);
    }
}
