//! The game simulation: modes, scoring, round timer
//!
//! `GameSimulation` owns every entity and counter. Hosts drive it with
//! `advance` once per tick, forward input between ticks, and read entity
//! slices back for rendering.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::hit::{hit_test, pop_reward};
use super::spawn::{particle_burst, should_spawn, spawn_balloon};
use super::state::{
    Balloon, FloatingText, GameEvent, GameMode, Particle, Rgb, RoundStats, RoundSummary,
};
use super::tick::{seconds_remaining, step_balloons, step_particles, step_texts};
use crate::consts::*;
use crate::highscores::{HighScoreStore, load_or_zero};
use crate::settings::{Difficulty, GameConfig};

/// Complete game state plus its high score store
pub struct GameSimulation<R: Rng = Pcg32> {
    config: GameConfig,
    rng: R,
    store: Box<dyn HighScoreStore>,
    mode: GameMode,
    difficulty: Difficulty,
    balloons: Vec<Balloon>,
    particles: Vec<Particle>,
    texts: Vec<FloatingText>,
    stats: RoundStats,
    seconds_remaining: u32,
    round_start_ms: u64,
    /// Frame time fed to `advance` this round
    play_time: f32,
    high_score: u64,
    new_record: bool,
    events: Vec<GameEvent>,
}

impl GameSimulation<Pcg32> {
    /// Create a simulation with a seeded PCG generator
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>, seed: u64) -> Self {
        Self::with_rng(config, store, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSimulation<R> {
    /// Create a simulation with any random source
    ///
    /// The high score is read from `store` once, here.
    pub fn with_rng(config: GameConfig, store: Box<dyn HighScoreStore>, rng: R) -> Self {
        let config = config.validate();
        let high_score = load_or_zero(&*store);
        let seconds_remaining = config.round_seconds;
        Self {
            config,
            rng,
            store,
            mode: GameMode::Menu,
            difficulty: Difficulty::default(),
            balloons: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            stats: RoundStats::default(),
            seconds_remaining,
            round_start_ms: 0,
            play_time: 0.0,
            high_score,
            new_record: false,
            events: Vec::new(),
        }
    }

    // === Mode transitions ===

    /// Menu -> Playing with the chosen difficulty; the round clock starts at `now_ms`
    pub fn select_difficulty(&mut self, level: Difficulty, now_ms: u64) -> bool {
        if self.mode != GameMode::Menu {
            return false;
        }
        self.difficulty = level;
        self.start_round(now_ms);
        true
    }

    /// GameOver -> Playing with the same difficulty
    pub fn replay(&mut self, now_ms: u64) -> bool {
        if self.mode != GameMode::GameOver {
            return false;
        }
        self.start_round(now_ms);
        true
    }

    /// GameOver -> Menu
    pub fn return_to_menu(&mut self) -> bool {
        if self.mode != GameMode::GameOver {
            return false;
        }
        log::info!("Returning to menu");
        self.mode = GameMode::Menu;
        true
    }

    /// Back to the menu from any mode, discarding the round
    ///
    /// The high score is kept.
    pub fn reset(&mut self) {
        self.clear_round();
        self.mode = GameMode::Menu;
        log::info!("Simulation reset");
    }

    fn clear_round(&mut self) {
        self.balloons.clear();
        self.particles.clear();
        self.texts.clear();
        self.stats = RoundStats::default();
        self.seconds_remaining = self.config.round_seconds;
        self.play_time = 0.0;
        self.new_record = false;
    }

    fn start_round(&mut self, now_ms: u64) {
        self.clear_round();
        self.round_start_ms = now_ms;
        self.mode = GameMode::Playing;
        self.events.push(GameEvent::RoundStarted {
            difficulty: self.difficulty,
        });
        log::info!(
            "Round started ({}, {}s)",
            self.difficulty,
            self.config.round_seconds
        );
    }

    fn end_round(&mut self) {
        self.mode = GameMode::GameOver;
        self.stats.combo = 0;
        self.new_record = self.stats.score > self.high_score;
        if self.new_record {
            self.high_score = self.stats.score;
            if let Err(e) = self.store.save(self.high_score) {
                log::warn!("Failed to save high score {}: {}", self.high_score, e);
            }
        }
        self.events.push(GameEvent::RoundOver {
            score: self.stats.score,
            new_record: self.new_record,
        });
        log::info!(
            "Round over: score {} (best {}), {} pops, {} misses, max combo {}",
            self.stats.score,
            self.high_score,
            self.stats.pop_count,
            self.stats.miss_count,
            self.stats.max_combo
        );
    }

    // === Per-tick update ===

    /// Advance one tick; `now_ms` is the host's monotonic clock
    ///
    /// Only active while playing. Entity timers count ticks, so `dt` only
    /// feeds the play time shown in the summary.
    pub fn advance(&mut self, dt: f32, now_ms: u64) {
        if self.mode != GameMode::Playing {
            return;
        }
        if dt.is_finite() && dt > 0.0 {
            self.play_time += dt;
        }

        let remaining = seconds_remaining(self.round_start_ms, now_ms, self.config.round_seconds);
        // Never count back up if the host clock jitters backwards
        self.seconds_remaining = remaining.min(self.seconds_remaining);

        if should_spawn(&mut self.rng, &self.config) {
            let balloon = spawn_balloon(&mut self.rng, &self.config);
            self.balloons.push(balloon);
        }

        let step = step_balloons(&mut self.balloons);
        for x in step.escaped {
            self.register_miss(x);
        }

        step_particles(&mut self.particles);
        step_texts(&mut self.texts);

        if self.seconds_remaining == 0 {
            self.end_round();
        }
    }

    fn register_miss(&mut self, x: f32) {
        self.stats.miss_count += 1;
        self.stats.combo = 0;
        if self.config.miss_text {
            self.texts.push(FloatingText::new(
                Vec2::new(x, OFFSCREEN_MARGIN),
                "MISS!",
                Rgb::RED,
                MISS_TEXT_LIFE,
            ));
        }
        self.events.push(GameEvent::BalloonMissed { x });
        log::debug!("Balloon escaped at x={}, combo reset", x);
    }

    // === Input ===

    /// Pop the first balloon under `point`; returns the reward if one popped
    ///
    /// A tap on empty space changes nothing.
    pub fn handle_tap(&mut self, point: Vec2) -> Option<u64> {
        if self.mode != GameMode::Playing {
            return None;
        }
        let idx = hit_test(point, &self.balloons)?;
        Some(self.pop_balloon(idx))
    }

    /// Pop every unpopped balloon; returns how many popped
    ///
    /// Does nothing when the balloon list is empty. Combo grows through the
    /// sweep, so later balloons score more.
    pub fn activate_special_power(&mut self) -> u32 {
        if self.mode != GameMode::Playing || self.balloons.is_empty() {
            return 0;
        }
        self.stats.special_power_uses += 1;

        let mut popped = 0;
        for idx in 0..self.balloons.len() {
            if !self.balloons[idx].popped {
                self.pop_balloon(idx);
                popped += 1;
            }
        }

        let uses = self.stats.special_power_uses;
        self.texts.push(FloatingText::new(
            self.config.center(),
            format!("PRIVILEGE x{uses}"),
            Rgb::MAGENTA,
            POWER_TEXT_LIFE,
        ));
        self.events.push(GameEvent::SpecialPowerUsed { uses, popped });
        log::debug!("Special power #{} popped {} balloons", uses, popped);
        popped
    }

    fn pop_balloon(&mut self, idx: usize) -> u64 {
        let reward = pop_reward(self.stats.combo);
        let balloon = &mut self.balloons[idx];
        balloon.popped = true;
        balloon.pop_age = 0;
        let (pos, color) = (balloon.pos, balloon.color);

        self.stats.score += reward;
        self.stats.pop_count += 1;
        self.stats.combo += 1;
        self.stats.max_combo = self.stats.max_combo.max(self.stats.combo);

        self.particles.extend(particle_burst(&mut self.rng, pos, color));
        self.texts.push(FloatingText::new(
            pos,
            format!("+{reward}"),
            Rgb::GOLD,
            POP_TEXT_LIFE,
        ));
        self.events.push(GameEvent::BalloonPopped {
            pos,
            reward,
            combo: self.stats.combo,
        });
        log::debug!(
            "Popped balloon at ({:.0}, {:.0}) for {} (combo {})",
            pos.x,
            pos.y,
            reward,
            self.stats.combo
        );
        reward
    }

    /// Place a specific balloon (scripted scenes, tutorials, tests)
    pub fn spawn_balloon_at(&mut self, pos: Vec2, radius: u32, color: Rgb, vy: f32) -> bool {
        if self.mode != GameMode::Playing {
            return false;
        }
        self.balloons.push(Balloon::new(pos, radius, color, vy));
        true
    }

    /// Take queued events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Read-only views ===

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn floating_texts(&self) -> &[FloatingText] {
        &self.texts
    }

    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    pub fn score(&self) -> u64 {
        self.stats.score
    }

    pub fn combo(&self) -> u32 {
        self.stats.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.stats.max_combo
    }

    pub fn pop_count(&self) -> u32 {
        self.stats.pop_count
    }

    pub fn miss_count(&self) -> u32 {
        self.stats.miss_count
    }

    pub fn special_power_uses(&self) -> u32 {
        self.stats.special_power_uses
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Game over screen data, only once the round has ended
    pub fn summary(&self) -> Option<RoundSummary> {
        if self.mode != GameMode::GameOver {
            return None;
        }
        Some(RoundSummary {
            difficulty: self.difficulty,
            score: self.stats.score,
            high_score: self.high_score,
            new_record: self.new_record,
            max_combo: self.stats.max_combo,
            pop_count: self.stats.pop_count,
            miss_count: self.stats.miss_count,
            special_power_uses: self.stats.special_power_uses,
            accuracy: RoundSummary::accuracy_of(self.stats.pop_count, self.stats.miss_count),
            play_time: self.play_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{HighScoreError, MemoryHighScoreStore};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const T0: u64 = 10_000;

    fn quiet_config() -> GameConfig {
        GameConfig {
            spawn_chance: 0.0,
            ..Default::default()
        }
    }

    fn new_sim(config: GameConfig) -> GameSimulation {
        GameSimulation::new(config, Box::new(MemoryHighScoreStore::new()), 42)
    }

    fn playing_sim() -> GameSimulation {
        let mut sim = new_sim(quiet_config());
        assert!(sim.select_difficulty(Difficulty::Normal, T0));
        sim
    }

    /// Store whose contents stay visible to the test after the sim takes it
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryHighScoreStore>>);

    impl HighScoreStore for SharedStore {
        fn load(&self) -> Result<u64, HighScoreError> {
            self.0.borrow().load()
        }
        fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
            self.0.borrow_mut().save(score)
        }
    }

    struct FailingStore;

    impl HighScoreStore for FailingStore {
        fn load(&self) -> Result<u64, HighScoreError> {
            Ok(5)
        }
        fn save(&mut self, _score: u64) -> Result<(), HighScoreError> {
            Err(HighScoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_select_difficulty_starts_round() {
        let mut sim = new_sim(quiet_config());
        assert_eq!(sim.mode(), GameMode::Menu);

        assert!(sim.select_difficulty(Difficulty::Normal, T0));
        assert_eq!(sim.mode(), GameMode::Playing);
        assert_eq!(sim.difficulty(), Difficulty::Normal);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.combo(), 0);
        assert_eq!(sim.seconds_remaining(), 60);
        assert_eq!(
            sim.drain_events(),
            vec![GameEvent::RoundStarted {
                difficulty: Difficulty::Normal
            }]
        );

        // Not valid while playing
        assert!(!sim.select_difficulty(Difficulty::Hard, T0));
        assert_eq!(sim.difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_tap_pops_balloon() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);

        assert_eq!(sim.handle_tap(Vec2::new(505.0, 305.0)), Some(10));
        assert!(sim.balloons()[0].popped);
        assert_eq!(sim.score(), 10);
        assert_eq!(sim.combo(), 1);
        assert_eq!(sim.max_combo(), 1);
        assert_eq!(sim.pop_count(), 1);
        assert_eq!(sim.particles().len(), 12);
        assert!(sim.particles().iter().all(|p| p.color == Rgb::RED));
        assert_eq!(sim.floating_texts().len(), 1);
        assert_eq!(sim.floating_texts()[0].text, "+10");
        assert_eq!(sim.floating_texts()[0].life, POP_TEXT_LIFE);
        assert_eq!(sim.floating_texts()[0].pos, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_tap_pops_only_one_of_overlapping() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.spawn_balloon_at(Vec2::new(510.0, 300.0), 30, Rgb::GOLD, -2.0);

        assert_eq!(sim.handle_tap(Vec2::new(505.0, 300.0)), Some(10));
        assert!(sim.balloons()[0].popped);
        assert!(!sim.balloons()[1].popped);

        // Second tap finds the remaining balloon and earns the combo bonus
        assert_eq!(sim.handle_tap(Vec2::new(505.0, 300.0)), Some(12));
        assert_eq!(sim.score(), 22);
        assert_eq!(sim.combo(), 2);
    }

    #[test]
    fn test_tap_on_empty_space_is_noop() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(505.0, 305.0));

        assert_eq!(sim.handle_tap(Vec2::new(10.0, 10.0)), None);
        assert_eq!(sim.combo(), 1);
        assert_eq!(sim.score(), 10);
        assert_eq!(sim.miss_count(), 0);
    }

    #[test]
    fn test_input_ignored_outside_playing() {
        let mut sim = new_sim(quiet_config());
        assert_eq!(sim.handle_tap(Vec2::new(500.0, 300.0)), None);
        assert_eq!(sim.activate_special_power(), 0);
        assert!(!sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0));
        sim.advance(SIM_DT, T0 + 100_000);
        assert_eq!(sim.mode(), GameMode::Menu);
        assert!(!sim.replay(T0));
        assert!(!sim.return_to_menu());
    }

    #[test]
    fn test_special_power_sweeps_with_growing_combo() {
        let mut sim = playing_sim();
        for x in [200.0, 400.0, 600.0] {
            sim.spawn_balloon_at(Vec2::new(x, 300.0), 25, Rgb::RED, -2.0);
        }

        assert_eq!(sim.activate_special_power(), 3);
        assert!(sim.balloons().iter().all(|b| b.popped));
        assert_eq!(sim.score(), 10 + 12 + 14);
        assert_eq!(sim.combo(), 3);
        assert_eq!(sim.max_combo(), 3);
        assert_eq!(sim.special_power_uses(), 1);
        assert_eq!(sim.particles().len(), 36);

        let texts: Vec<&str> = sim.floating_texts().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["+10", "+12", "+14", "PRIVILEGE x1"]);
        let announcement = &sim.floating_texts()[3];
        assert_eq!(announcement.life, POWER_TEXT_LIFE);
        assert_eq!(announcement.pos, sim.config().center());
    }

    #[test]
    fn test_special_power_with_no_balloons_is_noop() {
        let mut sim = playing_sim();
        sim.drain_events();
        assert_eq!(sim.activate_special_power(), 0);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.combo(), 0);
        assert_eq!(sim.pop_count(), 0);
        assert_eq!(sim.special_power_uses(), 0);
        assert!(sim.floating_texts().is_empty());
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_special_power_with_only_popped_balloons_still_counts() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));

        assert_eq!(sim.activate_special_power(), 0);
        assert_eq!(sim.special_power_uses(), 1);
        assert_eq!(sim.score(), 10);
        assert_eq!(sim.floating_texts().last().unwrap().text, "PRIVILEGE x1");
    }

    #[test]
    fn test_escape_resets_combo() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(300.0, 300.0), 30, Rgb::RED, -2.0);
        sim.spawn_balloon_at(Vec2::new(600.0, -49.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(300.0, 300.0));
        assert_eq!(sim.combo(), 1);

        sim.advance(SIM_DT, T0 + 16);
        assert_eq!(sim.combo(), 0);
        assert_eq!(sim.max_combo(), 1);
        assert_eq!(sim.miss_count(), 1);
        assert_eq!(sim.score(), 10);
        assert!(sim.balloons().iter().all(|b| b.popped));
        // No miss text unless configured
        assert!(sim.floating_texts().iter().all(|t| t.text != "MISS!"));
    }

    #[test]
    fn test_miss_text_variant() {
        let mut sim = new_sim(GameConfig {
            miss_text: true,
            ..quiet_config()
        });
        sim.select_difficulty(Difficulty::Easy, T0);
        sim.spawn_balloon_at(Vec2::new(600.0, -49.0), 30, Rgb::RED, -2.0);
        sim.advance(SIM_DT, T0);

        let texts = sim.floating_texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "MISS!");
        assert_eq!(texts[0].pos.x, 600.0);
    }

    #[test]
    fn test_popped_balloon_removed_after_eleven_ticks() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));

        for i in 0..10 {
            sim.advance(SIM_DT, T0 + i * 16);
        }
        assert_eq!(sim.balloons().len(), 1);
        assert_eq!(sim.balloons()[0].pop_age, 10);

        sim.advance(SIM_DT, T0 + 200);
        assert!(sim.balloons().is_empty());
    }

    #[test]
    fn test_round_ends_exactly_at_sixty_seconds() {
        let mut sim = playing_sim();
        sim.advance(SIM_DT, T0 + 999);
        assert_eq!(sim.seconds_remaining(), 60);
        sim.advance(SIM_DT, T0 + 1_000);
        assert_eq!(sim.seconds_remaining(), 59);
        sim.advance(SIM_DT, T0 + 59_999);
        assert_eq!(sim.seconds_remaining(), 1);
        assert_eq!(sim.mode(), GameMode::Playing);

        sim.advance(SIM_DT, T0 + 60_000);
        assert_eq!(sim.seconds_remaining(), 0);
        assert_eq!(sim.mode(), GameMode::GameOver);
    }

    #[test]
    fn test_round_end_clears_combo_keeps_max() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.spawn_balloon_at(Vec2::new(200.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));
        sim.handle_tap(Vec2::new(200.0, 300.0));
        assert_eq!(sim.combo(), 2);

        sim.advance(SIM_DT, T0 + 60_000);
        assert_eq!(sim.mode(), GameMode::GameOver);
        assert_eq!(sim.combo(), 0);
        assert_eq!(sim.max_combo(), 2);
        assert_eq!(sim.summary().unwrap().max_combo, 2);
    }

    #[test]
    fn test_seconds_never_count_back_up() {
        let mut sim = playing_sim();
        sim.advance(SIM_DT, T0 + 5_000);
        assert_eq!(sim.seconds_remaining(), 55);
        sim.advance(SIM_DT, T0 + 1_000);
        assert_eq!(sim.seconds_remaining(), 55);
    }

    #[test]
    fn test_new_record_is_saved_once() {
        let store = SharedStore::default();
        let mut sim = GameSimulation::new(quiet_config(), Box::new(store.clone()), 1);
        assert_eq!(sim.high_score(), 0);
        sim.select_difficulty(Difficulty::Hard, T0);
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));
        sim.advance(SIM_DT, T0 + 60_000);

        assert_eq!(sim.mode(), GameMode::GameOver);
        assert_eq!(sim.high_score(), 10);
        assert_eq!(store.0.borrow().contents(), Some("10"));

        let summary = sim.summary().unwrap();
        assert!(summary.new_record);
        assert_eq!(summary.score, 10);
        assert_eq!(summary.difficulty, Difficulty::Hard);
        assert_eq!(summary.accuracy, 1.0);

        // Ticks after game over change nothing
        sim.advance(SIM_DT, T0 + 120_000);
        assert_eq!(sim.mode(), GameMode::GameOver);

        // A worse round does not overwrite the record
        assert!(sim.replay(T0 + 200_000));
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.difficulty(), Difficulty::Hard);
        sim.advance(SIM_DT, T0 + 260_000);
        let summary = sim.summary().unwrap();
        assert!(!summary.new_record);
        assert_eq!(summary.high_score, 10);
        assert_eq!(store.0.borrow().contents(), Some("10"));
    }

    #[test]
    fn test_high_score_roundtrip_between_instances() {
        let store = SharedStore::default();
        store.0.borrow_mut().save(250).unwrap();
        let sim = GameSimulation::new(quiet_config(), Box::new(store.clone()), 1);
        assert_eq!(sim.high_score(), 250);

        let corrupt = MemoryHighScoreStore::with_contents("garbage");
        let sim = GameSimulation::new(quiet_config(), Box::new(corrupt), 1);
        assert_eq!(sim.high_score(), 0);
    }

    #[test]
    fn test_failed_save_is_not_fatal() {
        let mut sim = GameSimulation::new(quiet_config(), Box::new(FailingStore), 1);
        assert_eq!(sim.high_score(), 5);
        sim.select_difficulty(Difficulty::Normal, T0);
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));
        sim.advance(SIM_DT, T0 + 60_000);

        assert_eq!(sim.mode(), GameMode::GameOver);
        assert_eq!(sim.high_score(), 10);
    }

    #[test]
    fn test_return_to_menu_and_reset() {
        let mut sim = playing_sim();
        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));
        sim.advance(SIM_DT, T0 + 60_000);

        assert!(sim.return_to_menu());
        assert_eq!(sim.mode(), GameMode::Menu);
        // Menu keeps the last round on display until a new one starts
        assert_eq!(sim.score(), 10);
        assert!(sim.summary().is_none());

        assert!(sim.select_difficulty(Difficulty::Easy, T0 + 70_000));
        assert_eq!(sim.score(), 0);
        assert!(sim.balloons().is_empty());
        assert!(sim.particles().is_empty());

        sim.spawn_balloon_at(Vec2::new(500.0, 300.0), 30, Rgb::RED, -2.0);
        sim.handle_tap(Vec2::new(500.0, 300.0));
        sim.reset();
        assert_eq!(sim.mode(), GameMode::Menu);
        assert_eq!(sim.stats(), &RoundStats::default());
        assert!(sim.balloons().is_empty());
        assert!(sim.floating_texts().is_empty());
        assert_eq!(sim.seconds_remaining(), 60);
        assert_eq!(sim.high_score(), 10);
    }

    #[test]
    fn test_spawning_is_seed_deterministic() {
        let config = GameConfig {
            spawn_chance: 0.5,
            ..Default::default()
        };
        let mut a = new_sim(config.clone());
        let mut b = new_sim(config);
        a.select_difficulty(Difficulty::Normal, T0);
        b.select_difficulty(Difficulty::Normal, T0);

        for i in 0..200 {
            a.advance(SIM_DT, T0 + i * 16);
            b.advance(SIM_DT, T0 + i * 16);
        }
        assert!(!a.balloons().is_empty());
        assert_eq!(a.balloons().len(), b.balloons().len());
        for (x, y) in a.balloons().iter().zip(b.balloons()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.radius, y.radius);
            assert_eq!(x.color, y.color);
        }
    }

    #[derive(Debug, Clone)]
    enum Action {
        Advance(u64),
        Tap(f32, f32),
        Power,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (0u64..400).prop_map(Action::Advance),
            3 => (0.0f32..1000.0, -60.0f32..760.0).prop_map(|(x, y)| Action::Tap(x, y)),
            1 => Just(Action::Power),
        ]
    }

    proptest! {
        #[test]
        fn prop_round_invariants(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..300)) {
            let config = GameConfig { spawn_chance: 0.3, ..Default::default() };
            let mut sim = GameSimulation::new(config, Box::new(MemoryHighScoreStore::new()), seed);
            sim.select_difficulty(Difficulty::Normal, 0);

            let mut now = 0;
            let mut last_score = 0;
            let mut last_max_combo = 0;
            let mut last_seconds = sim.seconds_remaining();
            let mut peak_combo = 0;

            for action in actions {
                let combo_before = sim.combo();
                let score_before = sim.score();
                match action {
                    Action::Advance(ms) => {
                        now += ms;
                        sim.advance(SIM_DT, now);
                    }
                    Action::Tap(x, y) => {
                        if let Some(reward) = sim.handle_tap(Vec2::new(x, y)) {
                            prop_assert_eq!(reward, 10 + 2 * combo_before as u64);
                            prop_assert_eq!(sim.score(), score_before + reward);
                        } else {
                            prop_assert_eq!(sim.combo(), combo_before);
                        }
                    }
                    Action::Power => {
                        sim.activate_special_power();
                    }
                }

                peak_combo = peak_combo.max(sim.combo());
                prop_assert!(sim.combo() <= sim.max_combo());
                prop_assert!(sim.score() >= last_score);
                prop_assert!(sim.max_combo() >= last_max_combo);
                prop_assert_eq!(sim.max_combo(), peak_combo);
                if sim.mode() == GameMode::Playing {
                    prop_assert!(sim.seconds_remaining() <= last_seconds);
                }
                prop_assert!(sim.balloons().iter().all(|b| !b.faded() && !b.escaped()));
                prop_assert!(sim.particles().iter().all(|p| p.life > 0));
                prop_assert!(sim.floating_texts().iter().all(|t| t.life > 0));

                last_score = sim.score();
                last_max_combo = sim.max_combo();
                last_seconds = sim.seconds_remaining();
            }
        }
    }
}
