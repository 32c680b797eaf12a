//! Board State
//!
//! `BoardState` owns everything one tactics board needs at runtime: the live
//! entity positions, display settings, the recorder, the playback scheduler and
//! the persistence adapter.
//!
//! ## Data flow
//! ```text
//! move/drag ──▶ entities ──▶ store (persist)
//!                   └──────▶ recorder.observe
//! stop_recording ──▶ squash ──▶ Play ──▶ store.append
//! select_play ──▶ scheduler.load ──▶ frame 0 ──▶ entities
//! timer firing ──▶ scheduler ──▶ frame ──▶ entities ──▶ store / recorder
//! ```
//!
//! Frames applied by playback are persisted and observed exactly like manual moves.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::BoardConfig;
use crate::error::Result;
use crate::models::{default_442, Entity, EntitySet, FieldSize, Play, Position, Team};
use crate::replay::{
    seek_index, FrameSink, ManualTimer, PlaybackControl, PlaybackScheduler, PlaybackStatus,
    Recorder, TimerHandle, TimerHost,
};
use crate::settings::Settings;
use crate::store::{BoardStore, KeyValueStore, PlayStore};

/// Prompt shown before every play is deleted
pub const DELETE_ALL_PROMPT: &str =
    "Are you sure you want to delete all plays? This action cannot be undone.";

/// Runtime board
#[derive(Debug)]
pub struct BoardState<K: KeyValueStore, T: TimerHost, C: Clock = SystemClock> {
    store: BoardStore<K>,
    entities: EntitySet,
    settings: Settings,
    field: FieldSize,
    recorder: Recorder<C>,
    scheduler: PlaybackScheduler<T>,
    /// Id of the play loaded into the scheduler
    selected: Option<String>,
    /// Last id handed out, keeps ids unique within a millisecond
    last_play_id: i64,
    /// Recorded play whose save failed, retried by the next stop
    unsaved: Option<Play>,
    config: BoardConfig,
}

/// Applies playback frames to the board and remembers whether one arrived.
struct BoardSink<'a> {
    entities: &'a mut EntitySet,
    applied: bool,
}

impl FrameSink for BoardSink<'_> {
    fn apply_frame(&mut self, home: &[Position], away: &[Position], ball: Position) {
        self.entities.apply_frame(home, away, ball);
        self.applied = true;
    }
}

impl<K: KeyValueStore, T: TimerHost, C: Clock> BoardState<K, T, C> {
    /// Restore the board from `kv`; anything missing takes its default.
    pub fn open(kv: K, timer: T, clock: C, config: BoardConfig) -> Self {
        let store = BoardStore::new(kv, config.storage.clone());
        let entities = store.load_entities();
        let settings = store.load_settings();

        let mut scheduler =
            PlaybackScheduler::with_frame_duration(timer, config.playback.frame_duration());
        scheduler.set_speed(config.playback.default_speed);

        let mut recorder = Recorder::with_clock(clock);
        recorder.observe(&entities);

        let last_play_id = store
            .list()
            .iter()
            .filter_map(|play| play.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        debug!(
            home = entities.home_team.len(),
            away = entities.away_team.len(),
            "board opened"
        );

        Self {
            store,
            entities,
            settings,
            field: FieldSize::default(),
            recorder,
            scheduler,
            selected: None,
            last_play_id,
            unsaved: None,
            config,
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn field(&self) -> FieldSize {
        self.field
    }

    pub fn store(&self) -> &BoardStore<K> {
        &self.store
    }

    pub fn scheduler(&self) -> &PlaybackScheduler<T> {
        &self.scheduler
    }

    pub fn timer_mut(&mut self) -> &mut T {
        self.scheduler.timer_mut()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn recorder(&self) -> &Recorder<C> {
        &self.recorder
    }

    pub fn selected_play_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn plays(&self) -> Vec<Play> {
        self.store.list()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.scheduler.status()
    }

    // ========================
    // Positions
    // ========================

    /// Move one player. Returns `false` when the index is outside the roster.
    pub fn move_player(&mut self, team: Team, index: usize, pos: Position) -> Result<bool> {
        let entity = match team {
            Team::Home => Entity::Home(index),
            Team::Away => Entity::Away(index),
        };
        self.move_entity(entity, pos)
    }

    pub fn move_ball(&mut self, pos: Position) -> Result<()> {
        self.move_entity(Entity::Ball, pos).map(|_| ())
    }

    pub fn move_entity(&mut self, entity: Entity, pos: Position) -> Result<bool> {
        if !self.entities.set(entity, pos) {
            debug!(?entity, "move ignored: no such entity");
            return Ok(false);
        }

        match entity {
            Entity::Home(_) => self.store.save_home(&self.entities.home_team)?,
            Entity::Away(_) => self.store.save_away(&self.entities.away_team)?,
            Entity::Ball => self.store.save_ball(self.entities.ball_position)?,
        }
        self.recorder.observe(&self.entities);
        Ok(true)
    }

    /// Rendered field size, used to convert drag offsets.
    pub fn set_field_size(&mut self, field: FieldSize) {
        self.field = field;
    }

    /// Drag a player to a pixel offset from the field center.
    pub fn drag_player(&mut self, team: Team, index: usize, px: f64, py: f64) -> Result<bool> {
        let pos = self.field.to_relative(px, py);
        self.move_player(team, index, pos)
    }

    pub fn drag_ball(&mut self, px: f64, py: f64) -> Result<()> {
        let pos = self.field.to_relative(px, py);
        self.move_ball(pos)
    }

    // ========================
    // Settings
    // ========================

    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.store.save_settings(&settings)?;
        self.settings = settings;
        Ok(())
    }

    /// Default settings, ball on the spot, both sides back in the 4-4-2.
    pub fn restore_defaults(&mut self) -> Result<()> {
        info!("restoring defaults");
        self.update_settings(Settings::default())?;
        self.entities = default_442();
        self.commit_entities()
    }

    // ========================
    // Recording
    // ========================

    pub fn start_recording(&mut self) {
        if let Some(play) = self.unsaved.take() {
            warn!(id = %play.id, "discarding unsaved play");
        }
        self.recorder.start_recording(&self.entities);
    }

    /// Stop recording and store the result as a new play.
    ///
    /// Returns `None` when no recording was running. If the save fails the play is
    /// kept and the next call retries it.
    pub fn stop_recording(&mut self) -> Result<Option<Play>> {
        let play = match self.unsaved.take() {
            Some(play) => play,
            None if self.recorder.is_recording() => self.build_play(),
            None => {
                debug!("stop ignored: not recording");
                return Ok(None);
            }
        };

        if let Err(err) = self.store.append(play.clone()) {
            warn!(id = %play.id, error = %err, "play not saved, keeping it for a retry");
            self.unsaved = Some(play);
            return Err(err.into());
        }
        info!(id = %play.id, frames = play.frame_count(), "play saved");
        Ok(Some(play))
    }

    /// The recorded play not yet saved, if its save failed.
    pub fn unsaved_play(&self) -> Option<&Play> {
        self.unsaved.as_ref()
    }

    fn build_play(&mut self) -> Play {
        let track = self.recorder.stop_recording();
        let created_ms = self.next_play_id();
        let number = self.store.len() + 1;

        let start = track
            .frame(0)
            .map(|frame| frame.to_entity_set())
            .unwrap_or_else(|| self.entities.clone());

        Play {
            id: created_ms.to_string(),
            name: format!("Play {}", number),
            description: format!("Recorded on {}", format_local(created_ms)),
            home_team: start.home_team,
            away_team: start.away_team,
            ball_position: start.ball_position,
            movements: Some(track),
        }
    }

    fn next_play_id(&mut self) -> i64 {
        let now = self.recorder.clock().now_ms();
        self.last_play_id = now.max(self.last_play_id + 1);
        self.last_play_id
    }

    // ========================
    // Plays
    // ========================

    /// Load a play for playback and show its first frame.
    ///
    /// Returns `false` when no play has that id.
    pub fn select_play(&mut self, id: &str) -> Result<bool> {
        let Some(play) = self.store.find(id) else {
            debug!(id, "select ignored: no such play");
            return Ok(false);
        };

        let track = play.playable_track().cloned();
        self.entities = match track.as_ref().and_then(|t| t.frame(0)) {
            Some(frame) => frame.to_entity_set(),
            None => play.snapshot(),
        };
        self.entities.clamp_all();

        self.scheduler.load(track);
        self.selected = Some(play.id);
        self.commit_entities()?;
        Ok(true)
    }

    pub fn delete_play(&mut self, id: &str) -> Result<bool> {
        let removed = self.store.remove(id)?;
        if removed && self.selected.as_deref() == Some(id) {
            self.deselect();
        }
        Ok(removed)
    }

    /// Delete every play once `confirm` accepts [`DELETE_ALL_PROMPT`].
    ///
    /// Returns whether the store was cleared.
    pub fn delete_all_plays(&mut self, confirm: impl FnOnce(&str) -> bool) -> Result<bool> {
        if !confirm(DELETE_ALL_PROMPT) {
            debug!("delete all cancelled");
            return Ok(false);
        }
        self.store.clear()?;
        self.deselect();
        Ok(true)
    }

    fn deselect(&mut self) {
        self.selected = None;
        self.scheduler.load(None);
    }

    // ========================
    // Playback
    // ========================

    pub fn playback_control(&mut self, control: PlaybackControl) -> Result<()> {
        match control {
            PlaybackControl::Play => self.drive(|s, sink| s.start_playback(sink)),
            PlaybackControl::Pause => {
                self.scheduler.pause_playback();
                Ok(())
            }
            PlaybackControl::Stop => {
                self.scheduler.stop_playback();
                Ok(())
            }
            PlaybackControl::Seek(value) => {
                let index = seek_index(value);
                self.drive(|s, sink| s.seek_to(index, sink))
            }
            PlaybackControl::Speed(multiplier) => {
                self.scheduler.set_speed(multiplier);
                Ok(())
            }
        }
    }

    /// Deliver a host timer firing.
    pub fn fire_timer(&mut self, handle: TimerHandle) -> Result<()> {
        self.drive(|s, sink| s.on_timer(handle, sink))
    }

    fn drive<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(&mut PlaybackScheduler<T>, &mut BoardSink<'_>),
    {
        let mut sink = BoardSink { entities: &mut self.entities, applied: false };
        op(&mut self.scheduler, &mut sink);
        if sink.applied {
            self.commit_entities()?;
        }
        Ok(())
    }

    /// Persist the whole entity set and report it to the recorder.
    fn commit_entities(&mut self) -> Result<()> {
        self.store.save_entities(&self.entities)?;
        self.recorder.observe(&self.entities);
        Ok(())
    }
}

impl<K: KeyValueStore, C: Clock> BoardState<K, ManualTimer, C> {
    /// Move virtual time forward, applying every frame that falls due.
    pub fn advance_clock(&mut self, by: Duration) -> Result<()> {
        let until = self.scheduler.timer().now().saturating_add(by);
        while let Some(handle) = self.scheduler.timer_mut().pop_due(until) {
            self.fire_timer(handle)?;
        }
        self.scheduler.timer_mut().set_now(until);
        Ok(())
    }

    /// Fire pending timers until playback settles. Returns the firings delivered.
    pub fn run_playback(&mut self) -> Result<usize> {
        let mut fired = 0;
        while let Some(handle) = self.scheduler.timer_mut().pop_next() {
            self.fire_timer(handle)?;
            fired += 1;
        }
        Ok(fired)
    }
}

fn format_local(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}
