//! Popper Pig entry point
//!
//! Native builds run headless: the pig flies itself for a number of rounds
//! and the results are logged. Set `RUST_LOG=debug` to follow every pop.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use clap::Parser;

    use popper_pig::Settings;
    use popper_pig::audio::LogSink;
    use popper_pig::consts::SIM_DT;
    use popper_pig::game::Game;
    use popper_pig::persistence::JsonFileStore;
    use popper_pig::platform::HeadlessSurface;

    /// Give up on a round that runs longer than this (10 minutes of play)
    const MAX_ROUND_TICKS: u32 = 60 * 60 * 10;

    #[derive(Parser, Debug, Clone)]
    #[command(name = "popper-pig")]
    #[command(about = "Headless Popper Pig: the pig flies itself and the results are logged", long_about = None)]
    struct Args {
        /// Rounds to play
        #[arg(long, default_value_t = 3)]
        rounds: u32,

        /// Session seed (overrides the settings file; random when neither is set)
        #[arg(long)]
        seed: Option<u64>,

        /// Settings file
        #[arg(long, default_value = Settings::DEFAULT_FILE)]
        settings: String,
    }

    pub fn run() {
        env_logger::init();
        let args = Args::parse();

        let settings = Settings::load(Path::new(&args.settings));
        let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
        log::info!("Popper Pig (headless) starting, seed {}", seed);

        let mut game = Game::new(
            seed,
            settings.viewport(),
            &settings,
            HeadlessSurface::new(),
            LogSink,
            JsonFileStore::new(JsonFileStore::DEFAULT_FILE),
        );
        game.set_autopilot(true);

        for round in 1..=args.rounds {
            let Some(report) = game.play_round(MAX_ROUND_TICKS) else {
                log::warn!("Round {} did not start (stage {:?})", round, game.state().stage);
                break;
            };
            if report.timed_out {
                log::warn!("Round {} cut off after {} ticks", round, report.ticks);
            }
            log::info!(
                "Round {}: {} popped, {} missed in {:.1}s (best {})",
                round,
                report.score,
                report.miss_count,
                report.ticks as f32 * SIM_DT,
                report.best_score
            );
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build is driven through the library, this is just to satisfy the compiler
}
