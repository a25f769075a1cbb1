//! Realm Runner headless runner
//!
//! Plays the levels with a simple autopilot on a fixed timestep and reports
//! completions. Rendering and real input live outside this crate.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use realm_runner::consts::{MAX_SUBSTEPS, SIM_DT};
    use realm_runner::sim::{
        GameEvent, GameState, InputEvent, Key, LevelCompletion, TickInput, can_jump, tick,
    };
    use realm_runner::{
        HighScores, LevelCatalog, LevelDirectory, LevelSource, LoadError, LogSink, QualityPreset,
        ScoreSink, Settings,
    };

    /// Wall-clock step fed to the accumulator; two sim ticks per frame
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// How far ahead the autopilot looks for walls, gaps and hazards
    const LOOKAHEAD: f32 = 36.0;
    /// Horizontal distance at which a checkpoint counts as reached
    const ARRIVE_DISTANCE: f32 = 4.0;

    struct Args {
        settings: Option<PathBuf>,
        levels: Option<PathBuf>,
        scores: Option<PathBuf>,
        quality: Option<QualityPreset>,
        frames: u32,
    }

    impl Args {
        fn parse() -> Result<Self, String> {
            let mut args = Args {
                settings: None,
                levels: None,
                scores: None,
                quality: None,
                frames: 3600,
            };
            let mut iter = std::env::args().skip(1);
            while let Some(flag) = iter.next() {
                let mut value = || {
                    iter.next()
                        .ok_or_else(|| format!("missing value for {flag}"))
                };
                match flag.as_str() {
                    "--settings" => args.settings = Some(PathBuf::from(value()?)),
                    "--levels" => args.levels = Some(PathBuf::from(value()?)),
                    "--scores" => args.scores = Some(PathBuf::from(value()?)),
                    "--quality" => {
                        let raw = value()?;
                        args.quality = Some(
                            QualityPreset::parse(&raw)
                                .ok_or_else(|| format!("unknown quality preset: {raw}"))?,
                        );
                    }
                    "--frames" => {
                        let raw = value()?;
                        args.frames = raw
                            .parse()
                            .map_err(|_| format!("invalid frame count: {raw}"))?;
                    }
                    other => return Err(format!("unknown argument: {other}")),
                }
            }
            Ok(args)
        }
    }

    /// Walks toward the nearest unclaimed checkpoint and hops over whatever
    /// is in the way
    #[derive(Debug, Default)]
    struct Autopilot {
        held: Option<Key>,
    }

    impl Autopilot {
        fn steer(&mut self, state: &GameState, input: &mut TickInput) {
            let player = &state.player;
            let x = player.position().x;
            let target = state
                .level
                .checkpoints
                .iter()
                .filter(|c| !c.claimed)
                .map(|c| c.position().x - x)
                .min_by(|a, b| a.abs().total_cmp(&b.abs()));
            let want = match target {
                Some(dx) if dx > ARRIVE_DISTANCE => Some(Key::Right),
                Some(dx) if dx < -ARRIVE_DISTANCE => Some(Key::Left),
                _ => None,
            };
            if want != self.held {
                if let Some(key) = self.held {
                    input.push(InputEvent::Released(key));
                }
                if let Some(key) = want {
                    input.push(InputEvent::Pressed(key));
                }
                self.held = want;
            }

            let dir = match want {
                Some(Key::Right) => 1.0,
                Some(Key::Left) => -1.0,
                _ => return,
            };
            let walls = &state.level.walls;
            if !can_jump(player, walls) {
                return;
            }
            let mut ahead = player.clone();
            ahead.body.center.x += dir * LOOKAHEAD;
            let blocked = walls.iter().any(|w| ahead.body.overlaps(w));
            let gap = !can_jump(&ahead, walls);
            let hazard = state
                .level
                .hazards
                .iter()
                .any(|h| ahead.body.overlaps(&h.rect));
            if blocked || gap || hazard {
                input.push(InputEvent::Pressed(Key::Jump));
            }
        }
    }

    /// Game instance driven by a frame clock
    struct Runner {
        state: GameState,
        levels: Box<dyn LevelSource>,
        accumulator: f32,
        input: TickInput,
        autopilot: Autopilot,
        log_sink: LogSink,
        high_scores: HighScores,
        completions: Vec<LevelCompletion>,
    }

    impl Runner {
        fn new(
            settings: Settings,
            levels: Box<dyn LevelSource>,
            high_scores: HighScores,
        ) -> Result<Self, LoadError> {
            let state = GameState::new(settings, levels.as_ref(), 0)?;
            Ok(Self {
                state,
                levels,
                accumulator: 0.0,
                input: TickInput::default(),
                autopilot: Autopilot::default(),
                log_sink: LogSink,
                high_scores,
                completions: Vec::new(),
            })
        }

        /// Run simulation ticks. Events from the failing tick are still
        /// forwarded before a reload error is returned.
        fn update(&mut self, dt: f32) -> Result<(), LoadError> {
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.autopilot.steer(&self.state, &mut self.input);
                let result = tick(&mut self.state, self.levels.as_ref(), &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Presses are one-shot
                self.input.clear();
                self.forward_events();
                result?;
            }
            Ok(())
        }

        fn forward_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::LevelCompleted(completion) => {
                        self.log_sink.record(&completion);
                        self.high_scores.record(&completion);
                        self.completions.push(completion);
                    }
                    GameEvent::Respawned { cause, at } => {
                        log::debug!("Respawned ({cause:?}) at ({:.1}, {:.1})", at.x, at.y);
                    }
                    _ => {}
                }
            }
        }

        fn summary(&self) -> serde_json::Value {
            let position = self.state.player.position();
            serde_json::json!({
                "ticks": self.state.time_ticks,
                "level_index": self.state.level_index,
                "level_name": self.state.level.name,
                "realm": self.state.player.realm.as_str(),
                "player": [position.x, position.y],
                "collected": self.state.progress.collected,
                "checkpoints_claimed": self.state.level.claimed_count(),
                "completions": self.completions,
                "top_score": self.high_scores.top_score(),
            })
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Realm Runner (headless) starting...");

        let args = match Args::parse() {
            Ok(args) => args,
            Err(e) => {
                eprintln!("{e}");
                eprintln!(
                    "usage: realm-runner [--settings PATH] [--levels DIR] [--scores PATH] [--quality low|medium|high] [--frames N]"
                );
                return ExitCode::FAILURE;
            }
        };

        let mut settings = match &args.settings {
            Some(path) => match Settings::load(path) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            },
            None => Settings::default(),
        };
        if let Some(quality) = args.quality {
            settings.quality = quality;
        }
        log::info!("Effects quality: {}", settings.quality.as_str());

        let levels: Box<dyn LevelSource> = match &args.levels {
            Some(dir) => {
                log::info!("Loading levels from {}", dir.display());
                Box::new(LevelDirectory::new(dir))
            }
            None => match LevelCatalog::builtin() {
                Ok(catalog) => Box::new(catalog),
                Err(e) => {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            },
        };

        let high_scores = args
            .scores
            .as_deref()
            .map(HighScores::load)
            .unwrap_or_default();

        let mut runner = match Runner::new(settings, levels, high_scores) {
            Ok(runner) => runner,
            Err(e) => {
                log::error!("Failed to load first level: {e}");
                return ExitCode::FAILURE;
            }
        };

        let mut status = ExitCode::SUCCESS;
        for _ in 0..args.frames {
            if let Err(e) = runner.update(FRAME_DT) {
                // Running past the last level ends the session
                match e {
                    LoadError::NotFound { index } => {
                        log::info!("No level {index}; all levels finished");
                    }
                    e => {
                        log::error!("Level reload failed: {e}");
                        status = ExitCode::FAILURE;
                    }
                }
                break;
            }
        }

        if let Some(path) = &args.scores {
            if let Err(e) = runner.high_scores.save(path) {
                log::warn!("Failed to save high scores: {e}");
            }
        }

        match serde_json::to_string_pretty(&runner.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to encode summary: {e}"),
        }
        status
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use realm_runner::LevelDesc;
        use realm_runner::level::CheckpointDesc;
        use realm_runner::sim::Rect;
        use glam::Vec2;

        fn runner(levels: Box<dyn LevelSource>) -> Runner {
            Runner::new(Settings::default(), levels, HighScores::new()).expect("level 0")
        }

        #[test]
        fn test_autopilot_completes_first_builtin_level() {
            let levels = LevelCatalog::builtin().expect("builtin levels");
            let mut runner = runner(Box::new(levels));

            for _ in 0..1500 {
                runner.update(FRAME_DT).expect("update");
                if !runner.completions.is_empty() {
                    break;
                }
            }

            assert_eq!(runner.completions.len(), 1);
            assert_eq!(runner.completions[0].level_index, 0);
            assert_eq!(runner.state.level_index, 1);
            assert!(runner.high_scores.top_score().is_some());
        }

        #[test]
        fn test_last_level_completion_reaches_sinks() {
            let level = LevelDesc {
                name: "only".to_string(),
                player_start: Vec2::new(500.0, 375.0),
                walls: vec![Rect::from_corner(Vec2::ZERO, Vec2::new(1000.0, 63.0))],
                coins: Vec::new(),
                hazards: Vec::new(),
                checkpoints: vec![CheckpointDesc {
                    id: 0,
                    rect: Rect::new(Vec2::new(500.0, 81.0), Vec2::splat(18.0)),
                }],
                start_checkpoint: Some(0),
            };
            let mut runner = runner(Box::new(LevelCatalog::new(vec![level])));

            let mut result = Ok(());
            for _ in 0..60 {
                result = runner.update(FRAME_DT);
                if result.is_err() {
                    break;
                }
            }

            assert!(matches!(result, Err(LoadError::NotFound { index: 1 })));
            assert_eq!(runner.completions.len(), 1);
            assert_eq!(runner.completions[0].level_index, 0);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on the web
}
