//! Balloon Pop headless host
//!
//! Drives the simulation with a synthetic frame clock and the demo
//! autoplayer, persists the high score to a file and prints each round's
//! summary.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use balloon_pop::consts::SIM_DT;
    use balloon_pop::platform::{FileHighScoreStore, FixedStep};
    use balloon_pop::sim::{AutoPlayer, GameEvent, GameMode, RoundSummary};
    use balloon_pop::{Difficulty, GameConfig, GameSimulation};

    /// Highest host frame rate accepted on the command line
    const MAX_FPS: f32 = 1000.0;

    #[derive(Parser, Debug)]
    #[command(name = "balloon-pop")]
    #[command(about = "Play headless Balloon Pop rounds and keep the high score")]
    struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,

        /// easy, normal or hard
        #[arg(short, long, default_value = "normal")]
        difficulty: Difficulty,

        /// Number of rounds to play
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,

        /// File holding the best score
        #[arg(long, default_value = "highscore.txt")]
        high_score_file: PathBuf,

        /// JSON config overriding the defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host frame rate; ticks stay at the fixed simulation rate
        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        /// Print round summaries as JSON lines
        #[arg(long)]
        json: bool,

        /// Let balloons drift by without any input
        #[arg(long)]
        no_autoplay: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let fps = check_fps(args.fps)?;

        let config = match &args.config {
            Some(path) => GameConfig::load_from(path),
            None => GameConfig::default(),
        };
        let seed = match args.seed {
            Some(seed) => seed,
            None => std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .context("system clock before 1970")?
                .as_millis() as u64,
        };
        log::info!("Balloon Pop (headless) starting, seed {}", seed);

        let store = FileHighScoreStore::new(&args.high_score_file);
        let mut sim = GameSimulation::new(config, Box::new(store), seed);
        let mut clock = FixedStep::default();
        let mut player = AutoPlayer::default();
        let frame_dt = 1.0 / fps;
        let mut now_ms = 0.0f64;

        for round in 1..=args.rounds {
            let started = if round == 1 {
                sim.select_difficulty(args.difficulty, now_ms as u64)
            } else {
                sim.replay(now_ms as u64)
            };
            if !started {
                bail!("could not start round {} from {:?}", round, sim.mode());
            }
            clock.reset();

            while sim.mode() == GameMode::Playing {
                now_ms += frame_dt as f64 * 1000.0;
                for _ in 0..clock.push(frame_dt) {
                    if !args.no_autoplay {
                        player.play(&mut sim);
                    }
                    sim.advance(SIM_DT, now_ms as u64);
                }
                log_events(sim.drain_events());
            }

            let summary = sim
                .summary()
                .context("round ended without a summary")?;
            print_summary(round, &summary, args.json)?;
        }

        sim.return_to_menu();
        Ok(())
    }

    fn check_fps(fps: f32) -> Result<f32> {
        if !(fps.is_finite() && fps > 0.0 && fps <= MAX_FPS) {
            bail!("--fps must be in (0, {}], got {}", MAX_FPS, fps);
        }
        Ok(fps)
    }

    fn log_events(events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::BalloonPopped { reward, combo, .. } => {
                    log::debug!("pop +{} (combo {})", reward, combo)
                }
                GameEvent::BalloonMissed { x } => log::debug!("miss at x={:.0}", x),
                GameEvent::SpecialPowerUsed { uses, popped } => {
                    log::debug!("special power #{} popped {}", uses, popped)
                }
                GameEvent::RoundStarted { difficulty } => {
                    log::debug!("round started on {}", difficulty)
                }
                GameEvent::RoundOver { score, new_record } => {
                    log::debug!("round over with {} (record: {})", score, new_record)
                }
            }
        }
    }

    fn print_summary(round: u32, summary: &RoundSummary, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string(summary)?);
            return Ok(());
        }
        println!();
        println!("=== ROUND {} ({}) ===", round, summary.difficulty);
        println!("  Score:      {}", summary.score);
        println!(
            "  Best:       {}{}",
            summary.high_score,
            if summary.new_record { "  NEW RECORD!" } else { "" }
        );
        println!("  Max combo:  {}", summary.max_combo);
        println!("  Pops:       {}", summary.pop_count);
        println!("  Misses:     {}", summary.miss_count);
        println!("  Accuracy:   {:.0}%", summary.accuracy * 100.0);
        println!("  Privilege:  {}", summary.special_power_uses);
        println!("  Play time:  {:.1}s", summary.play_time);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
