/// Detector-callback orchestrator.
///
/// Owns the simulation state, the control mapper and the RNG.  The host calls
/// `on_detector_frame` once per detector result; that call maps controls,
/// applies the face-loss policy, fires missiles on the mouth edge and runs one
/// tick.  Nothing here runs on a timer.

use rand::Rng;
use tracing::{info, warn};

use crate::compute;
use crate::config::{FaceLossPolicy, GameConfig, Viewport};
use crate::control::{ControlMapper, ControlSignal, FaceLandmarks};
use crate::entities::{ControlState, GameState, GameStatus};
use crate::error::Result;
use crate::progression;
use crate::snapshot::{build_snapshot, RenderSnapshot};

pub struct GameSession<R: Rng> {
    config: GameConfig,
    state: GameState,
    mapper: ControlMapper,
    face_missing: bool,
    rng: R,
}

impl<R: Rng> GameSession<R> {
    /// Fails with `Error::Config` if the tunables cannot drive a run.
    pub fn new(config: GameConfig, viewport: Viewport, rng: R) -> Result<Self> {
        config.validate()?;
        let state = compute::init_state(&config, viewport, 0);
        let mapper = ControlMapper::new(&config);
        Ok(Self {
            config,
            state,
            mapper,
            face_missing: false,
            rng,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that need to stage a scene.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn control(&self) -> &ControlState {
        self.mapper.state()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_face_missing(&self) -> bool {
        self.face_missing
    }

    pub fn sensitivity(&self) -> f32 {
        self.mapper.sensitivity()
    }

    /// Clamp into the configured bounds and return the applied gain.
    pub fn set_sensitivity(&mut self, value: f32) -> f32 {
        let applied = self.mapper.set_sensitivity(value);
        info!(requested = value, applied, "sensitivity changed");
        applied
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    /// Throw away the current run and start playing from zero.
    pub fn restart(&mut self) {
        let high_score = self.state.progression.high_score;
        self.state = compute::new_run(&self.config, self.state.viewport, high_score);
        info!(high_score, "new run started");
    }

    /// Handle one detector result: `None` means no face in frame.
    pub fn on_detector_frame(&mut self, face: Option<&FaceLandmarks>) -> &GameState {
        self.state.events.clear();

        let viewport = self.state.viewport;
        let signal = match self.mapper.update(face, &viewport) {
            Ok(signal) => signal,
            Err(err) => {
                warn!(%err, "unusable landmark frame, treating as no face");
                // `None` cannot fail.
                self.mapper
                    .update(None, &viewport)
                    .unwrap_or(ControlSignal::FaceMissing)
            }
        };

        let control = match signal {
            ControlSignal::FaceMissing => {
                self.face_lost();
                return &self.state;
            }
            ControlSignal::Tracking(control) => control,
        };

        if self.face_missing {
            self.face_returned();
        }
        if self.state.status == GameStatus::Start {
            info!("face detected, starting");
            self.restart();
        }

        if self.state.status == GameStatus::Playing {
            self.state = compute::player_shoot(&self.state, &control, &self.config);
            self.state = compute::tick(&self.state, &control, &self.config, &mut self.rng);
        }
        &self.state
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        build_snapshot(&self.state, self.mapper.state(), self.face_missing, &self.config)
    }

    fn face_lost(&mut self) {
        if self.face_missing {
            return;
        }
        self.face_missing = true;
        info!(status = ?self.state.status, "face lost, simulation paused");
        if self.config.face_loss_policy == FaceLossPolicy::Restart {
            progression::end_run(&mut self.state);
        }
    }

    fn face_returned(&mut self) {
        self.face_missing = false;
        match self.config.face_loss_policy {
            FaceLossPolicy::Restart => {
                info!("face back, restarting from zero");
                self.restart();
            }
            // A finished run still restarts on return; only live runs resume.
            FaceLossPolicy::Pause if self.state.status == GameStatus::GameOver => {
                info!("face back after game over, restarting from zero");
                self.restart();
            }
            FaceLossPolicy::Pause => info!("face back, resuming"),
        }
    }
}
