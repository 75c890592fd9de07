//! No Hit Mania headless runner
//!
//! Drives the simulation with the idle autopilot at a fixed frame rate and
//! reports how the rounds went. Useful for balance checks and for watching
//! spawn/level logs (`RUST_LOG=debug`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;
    use glam::Vec2;

    use no_hit_mania::audio::{AudioSettings, LogAudio};
    use no_hit_mania::format_survival_time;
    use no_hit_mania::sim::{GameState, HazardKind, TickInput, tick};
    use no_hit_mania::tuning::Tuning;

    /// Portrait phone viewport the grid is laid out in
    const VIEWPORT: Vec2 = Vec2::new(1080.0, 1920.0);

    #[derive(Parser, Debug)]
    #[command(name = "no-hit-mania")]
    #[command(about = "Headless No Hit Mania run driven by the idle autopilot")]
    struct Cli {
        /// Run seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Simulated wall time to run for
        #[arg(long, default_value_t = 60.0)]
        seconds: f64,
        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Balance overrides (JSON)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Wall time at which to pause
        #[arg(long)]
        pause_at: Option<f64>,
        /// How long the pause lasts
        #[arg(long, default_value_t = 0.0)]
        pause_for: f64,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        if cli.fps == 0 {
            return Err(anyhow!("fps must be > 0"));
        }
        if cli.seconds.is_nan() || cli.seconds <= 0.0 {
            return Err(anyhow!("seconds must be > 0"));
        }

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("failed to load tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        log::info!("No Hit Mania (headless) seed={} fps={}", cli.seed, cli.fps);

        let mut state = GameState::new(cli.seed, tuning, VIEWPORT);
        let mut audio = LogAudio::new(AudioSettings::default());
        let dt = 1.0 / cli.fps as f64;
        let frames = (cli.seconds * cli.fps as f64).ceil() as u64;
        let pause_window = cli.pause_at.map(|at| (at, at + cli.pause_for.max(0.0)));

        let mut paused = false;
        for frame in 0..=frames {
            let now = frame as f64 * dt;
            let mut input = TickInput {
                idle_mode: true,
                ..Default::default()
            };
            if let Some((start, end)) = pause_window {
                let inside = now >= start && now < end;
                if inside != paused {
                    input.pause = true;
                    paused = inside;
                }
            }
            tick(&mut state, &input, now, &mut audio);
        }

        let session = &state.session;
        println!("rounds finished: {}", session.rounds_played());
        match session.longest() {
            Some(best) => println!(
                "longest round:   {} (level {}, {:?})",
                format_survival_time(best.survival_time),
                best.level,
                best.hazard
            ),
            None => println!("longest round:   none"),
        }
        if let Some(mean) = session.mean_survival() {
            println!("mean survival:   {}", format_survival_time(mean));
        }
        for hazard in [HazardKind::Zap, HazardKind::Laser, HazardKind::Boulder] {
            println!("deaths by {:<8} {}", format!("{hazard:?}:"), session.deaths_by(hazard));
        }
        println!(
            "current round:   {} at level {}",
            format_survival_time(state.survival_time(frames as f64 * dt)),
            state.level.level()
        );
        println!("highest level:   {}", session.peak_level().max(state.level.level()));
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the web host directly
}
