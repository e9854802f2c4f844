//! Tilt Maze entry point
//!
//! Headless driver: loads settings and levels, then plays a scripted session
//! standing in for the host engine (frame clock, tilt sensor and contact
//! reports). Level errors are fatal.

use std::path::PathBuf;
use std::process::ExitCode;

use glam::Vec2;

use tilt_maze::Settings;
use tilt_maze::consts::*;
use tilt_maze::sim::{
    DirLevelSource, GameEvent, GameState, LevelError, ObjectId, ObjectKind, TickInput, TouchEvent,
    handle_contact, tick,
};

/// Scripted host: fixed-timestep loop plus canned input and contacts
struct Session {
    settings: Settings,
    source: DirLevelSource,
    state: GameState,
    accumulator: f32,
}

impl Session {
    fn new(settings: Settings) -> Result<Self, LevelError> {
        let source = DirLevelSource::new(&settings.levels_dir);
        let state = GameState::new(&source, settings.start_level)?;
        log::info!(
            "Level {} ready: {} objects, input mode {}",
            state.level,
            state.objects.len(),
            settings.input_mode.as_str()
        );
        Ok(Self {
            settings,
            source,
            state,
            accumulator: 0.0,
        })
    }

    /// Run simulation ticks for one rendered frame
    fn frame(&mut self, frame_dt: f32, input: &TickInput) {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        let mut input = input.clone();
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &input, self.settings.input_mode, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            // Touch changes are one-shot
            input.touch = None;
        }
    }

    /// Frame input for frame `n`: a slow tilt sweep or a drag toward the finish
    fn scripted_input(&self, n: u32) -> TickInput {
        let angle = n as f32 * 0.05;
        let touch = self.first_of(ObjectKind::Finish).and_then(|id| self.state.objects.get(id));
        TickInput {
            touch: match (n, touch) {
                (0, Some(finish)) => Some(TouchEvent::Began(finish.pos)),
                _ => None,
            },
            accelerometer: Some(Vec2::new(angle.cos(), angle.sin()) * 0.3),
        }
    }

    fn first_of(&self, kind: ObjectKind) -> Option<ObjectId> {
        self.state.objects.iter().find(|o| o.kind == kind).map(|o| o.id)
    }

    /// Report a player contact the way a physics engine would
    fn touch(&mut self, other: ObjectId) -> Result<(), LevelError> {
        if let Some(player) = self.state.player {
            handle_contact(&mut self.state, player, other, &self.source)?;
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), LevelError> {
        let frames = self.settings.demo_ticks;

        for n in 0..frames {
            let input = self.scripted_input(n);
            self.frame(SIM_DT, &input);

            // Pick up one star every 10 frames
            if n % 10 == 0 {
                if let Some(star) = self.first_of(ObjectKind::Star) {
                    self.touch(star)?;
                }
            }
            // Halfway through, fall into a vortex
            if n == frames / 2 {
                if let Some(vortex) = self.first_of(ObjectKind::Vortex) {
                    self.touch(vortex)?;
                }
            }
            self.log_events();
        }

        // Reach the finish once the respawn has settled
        for _ in 0..60 {
            self.frame(SIM_DT, &TickInput::default());
        }
        if let Some(finish) = self.first_of(ObjectKind::Finish) {
            self.touch(finish)?;
        }
        self.log_events();

        log::info!(
            "Session over: level {}, {}",
            self.state.level,
            self.state.score_label_text().unwrap_or("no score label")
        );
        Ok(())
    }

    fn log_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged { text, .. } => log::info!("{}", text),
                other => log::debug!("{:?}", other),
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tilt Maze (headless) starting...");

    let settings = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(Settings::ENV_VAR).map(PathBuf::from))
        .map(|path| Settings::load(&path))
        .unwrap_or_default();

    let result = Session::new(settings).and_then(|mut session| session.run());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {}", e);
            eprintln!("tilt-maze: {}", e);
            ExitCode::FAILURE
        }
    }
}
