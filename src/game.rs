//! Fixed timestep driver
//!
//! `Game` owns a [`GameState`] and the collaborators the simulation talks to
//! only through events: a render surface, an audio sink and a best score
//! store. Each frame it runs whole ticks out of the accumulated real time,
//! forwards the events those ticks raised, then brings the render surface in
//! line with the live entities.

use std::collections::HashSet;

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::consts::*;
use crate::persistence::BestScoreStore;
use crate::platform::{EntityId, RenderSurface, Sprite, SpriteKind};
use crate::settings::Settings;
use crate::sim::{ControlSignal, GameEvent, GameStage, GameState, TickInput, Viewport, tick};

/// How a round played by [`Game::play_round`] went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub score: u32,
    pub miss_count: u32,
    pub best_score: u32,
    /// Ticks spent in play
    pub ticks: u32,
    /// Round was cut off at the tick limit
    pub timed_out: bool,
}

/// Game instance holding the session and its collaborators
pub struct Game<R: RenderSurface, A: AudioSink, S: BestScoreStore> {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    render: R,
    audio: AudioManager<A>,
    store: S,
    /// Entities currently on the render surface
    placed: HashSet<EntityId>,
}

impl<R: RenderSurface, A: AudioSink, S: BestScoreStore> Game<R, A, S> {
    pub fn new(
        seed: u64,
        viewport: Viewport,
        settings: &Settings,
        render: R,
        sink: A,
        store: S,
    ) -> Self {
        let best = store.load_best_score().unwrap_or_else(|e| {
            log::warn!("Could not read best score, starting from 0: {}", e);
            0
        });
        let mut game = Self {
            state: GameState::new(seed, viewport, best),
            input: TickInput {
                autopilot: settings.autopilot,
                ..TickInput::default()
            },
            accumulator: 0.0,
            render,
            audio: AudioManager::from_settings(sink, settings),
            store,
            placed: HashSet::new(),
        };
        game.sync_render();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Held or released control
    pub fn set_control(&mut self, control: ControlSignal) {
        self.input.control = control;
    }

    /// Start signal; consumed by the next tick
    pub fn press_start(&mut self) {
        self.input.start = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Run simulation ticks for `dt` seconds of real time.
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;

            self.dispatch_events();
        }

        self.sync_render();
        substeps
    }

    /// Play one whole round in fixed ticks, ending it after `max_ticks`.
    ///
    /// Returns `None` if the round could not be started.
    pub fn play_round(&mut self, max_ticks: u32) -> Option<RoundReport> {
        while self.state.stage == GameStage::EndGame {
            self.update(SIM_DT);
        }
        self.press_start();
        self.update(SIM_DT);
        if self.state.stage != GameStage::InGame {
            return None;
        }

        let mut ticks = 0;
        while self.state.stage == GameStage::InGame && ticks < max_ticks {
            self.update(SIM_DT);
            ticks += 1;
        }
        let timed_out = self.state.stage == GameStage::InGame;
        if timed_out {
            self.state.end_round();
            self.dispatch_events();
            self.sync_render();
        }

        Some(RoundReport {
            score: self.state.score,
            miss_count: self.state.miss_count,
            best_score: self.state.best_score,
            ticks,
            timed_out,
        })
    }

    /// Forward drained events to audio and storage
    fn dispatch_events(&mut self) {
        for event in std::mem::take(&mut self.state.events) {
            match event {
                GameEvent::BalloonPopped { pitch, .. } => {
                    self.audio.play(SoundEffect::Pop, 1.0, pitch);
                }
                GameEvent::BalloonMissed { .. } => {
                    self.audio.play(SoundEffect::Miss, 1.0, 1.0);
                }
                GameEvent::AllowanceBonus { .. } => {
                    self.audio.play(SoundEffect::Bonus, 1.0, 1.0);
                }
                GameEvent::GameOver { pitch, .. } => {
                    self.audio.play(SoundEffect::Pop, GAME_OVER_VOLUME, pitch);
                }
                GameEvent::BestScoreImproved { best } => {
                    if let Err(e) = self.store.save_best_score(best) {
                        log::error!("Failed to save best score {}: {}", best, e);
                    }
                }
                GameEvent::RoundStarted | GameEvent::ReturnedToReady => {}
            }
        }
    }

    /// Place every live entity and remove sprites of vanished ones
    fn sync_render(&mut self) {
        let mut live = HashSet::with_capacity(self.placed.len());

        if let Some(pig) = &self.state.pig {
            self.render
                .place(EntityId::Pig, Sprite::new(SpriteKind::Pig, pig.bounds()));
            live.insert(EntityId::Pig);
        }
        for cloud in &self.state.clouds {
            let id = EntityId::Cloud(cloud.id);
            let sprite = Sprite::new(SpriteKind::Cloud, cloud.bounds())
                .with_variant(cloud.variant)
                .with_opacity(cloud.opacity);
            self.render.place(id, sprite);
            live.insert(id);
        }
        for balloon in self.state.balloons.iter() {
            let id = EntityId::Balloon(balloon.id);
            let sprite =
                Sprite::new(SpriteKind::Balloon, balloon.bounds()).with_variant(balloon.variant);
            self.render.place(id, sprite);
            live.insert(id);
        }
        for pop in &self.state.pops {
            let id = EntityId::Pop(pop.id);
            self.render
                .place(id, Sprite::new(SpriteKind::Pop, pop.bounds()));
            live.insert(id);
        }

        for &gone in self.placed.difference(&live) {
            self.render.remove(gone);
        }
        self.placed = live;
    }
}
