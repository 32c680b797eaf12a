//! Playback scheduler
//!
//! Replays a squashed [`MovementTrack`] one frame at a time through a host timer.
//!
//! ## State machine
//! ```text
//!          start            pause
//!   Idle ─────────▶ Playing ◀──────▶ Paused
//!    ▲                 │      start
//!    │ stop (any)      │ last frame reached
//!    └──────────── Stopped
//! ```
//!
//! ## Timer discipline
//! - At most one advance is pending, tracked in a single slot
//! - Every control operation cancels and clears that slot first
//! - A firing whose handle is not the pending one is ignored, so a stale callback
//!   never applies a frame
//!
//! Frames advance on a fixed base duration (40 ms by default). The wall-clock delay
//! between advances is `frame_duration / speed`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::MovementTrack;

use super::frame::FrameSink;
use super::timer::{ManualTimer, TimerHandle, TimerHost};

// ============================================================================
// Constants
// ============================================================================

/// Base duration of one frame (milliseconds)
pub const DEFAULT_FRAME_DURATION_MS: u64 = 40;

/// Speed multiplier on a fresh scheduler
pub const DEFAULT_SPEED: f64 = 1.0;

// ============================================================================
// Data Structures
// ============================================================================

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    /// Reached the last frame
    Stopped,
}

/// Transient playback position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCursor {
    pub frame_index: usize,
    pub is_playing: bool,
    pub speed_multiplier: f64,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self { frame_index: 0, is_playing: false, speed_multiplier: DEFAULT_SPEED }
    }
}

/// Read-out for a progress bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub frame_index: usize,
    pub frame_count: usize,
    pub speed: f64,
    /// `frame_duration * frame_index` (milliseconds)
    pub current_time_ms: u64,
    /// `frame_duration * (F - 1)` (milliseconds)
    pub duration_ms: u64,
}

impl PlaybackStatus {
    pub fn current_clock(&self) -> String {
        format_clock(self.current_time_ms)
    }

    pub fn duration_clock(&self) -> String {
        format_clock(self.duration_ms)
    }
}

/// `m:ss` for a millisecond duration.
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Scheduler
// ============================================================================

/// Deterministic frame-by-frame player
#[derive(Debug)]
pub struct PlaybackScheduler<T: TimerHost> {
    timer: T,
    frame_duration: Duration,
    track: Option<MovementTrack>,
    state: PlaybackState,
    cursor: PlaybackCursor,
    /// Single in-flight advance
    pending: Option<TimerHandle>,
    /// A seek happened since the last stop/completion: start resumes at the cursor
    resume_at_cursor: bool,
}

impl<T: TimerHost> PlaybackScheduler<T> {
    pub fn new(timer: T) -> Self {
        Self::with_frame_duration(timer, Duration::from_millis(DEFAULT_FRAME_DURATION_MS))
    }

    pub fn with_frame_duration(timer: T, frame_duration: Duration) -> Self {
        Self {
            timer,
            frame_duration,
            track: None,
            state: PlaybackState::Idle,
            cursor: PlaybackCursor::default(),
            pending: None,
            resume_at_cursor: false,
        }
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn frame_index(&self) -> usize {
        self.cursor.frame_index
    }

    pub fn speed(&self) -> f64 {
        self.cursor.speed_multiplier
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn track(&self) -> Option<&MovementTrack> {
        self.track.as_ref()
    }

    /// Frames in the loaded track, 0 when nothing is loaded.
    pub fn frame_count(&self) -> usize {
        self.track.as_ref().and_then(MovementTrack::frame_count).unwrap_or(0)
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn status(&self) -> PlaybackStatus {
        let frame_ms = u64::try_from(self.frame_duration.as_millis()).unwrap_or(u64::MAX);
        let frame_count = self.frame_count();
        PlaybackStatus {
            state: self.state,
            frame_index: self.cursor.frame_index,
            frame_count,
            speed: self.cursor.speed_multiplier,
            current_time_ms: frame_ms.saturating_mul(self.cursor.frame_index as u64),
            duration_ms: frame_ms.saturating_mul(frame_count.saturating_sub(1) as u64),
        }
    }

    // ========================================
    // Control operations
    // ========================================

    /// Select a track (or nothing). Always ends in `Idle` with the cursor at 0.
    ///
    /// A track that is not playable is treated as no track.
    pub fn load(&mut self, track: Option<MovementTrack>) {
        self.cancel_pending();

        self.track = match track {
            Some(t) if t.is_playable() => Some(t),
            Some(_) => {
                warn!("selected track is malformed or empty, playback disabled");
                None
            }
            None => None,
        };

        self.set_state(PlaybackState::Idle);
        self.cursor.frame_index = 0;
        self.resume_at_cursor = false;
    }

    pub fn start_playback<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        if self.track.is_none() {
            debug!("start ignored: no playable track selected");
            return;
        }
        self.cancel_pending();

        if self.state != PlaybackState::Paused && !self.resume_at_cursor {
            self.cursor.frame_index = 0;
        }
        self.resume_at_cursor = false;

        self.set_state(PlaybackState::Playing);
        info!(
            frame = self.cursor.frame_index,
            frames = self.frame_count(),
            speed = self.cursor.speed_multiplier,
            "playback started"
        );

        self.emit_current(sink);
        self.arm();
    }

    pub fn pause_playback(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!(state = ?self.state, "pause ignored: not playing");
            return;
        }
        self.cancel_pending();
        self.set_state(PlaybackState::Paused);
        debug!(frame = self.cursor.frame_index, "playback paused");
    }

    /// Stop from any state. The cursor stays where it is.
    pub fn stop_playback(&mut self) {
        self.cancel_pending();
        self.set_state(PlaybackState::Idle);
        self.resume_at_cursor = false;
        debug!(frame = self.cursor.frame_index, "playback stopped");
    }

    /// Jump to `frame_index` (clamped) and emit it, whatever the state.
    pub fn seek_to<S: FrameSink + ?Sized>(&mut self, frame_index: usize, sink: &mut S) {
        let frame_count = self.frame_count();
        if frame_count == 0 {
            debug!("seek ignored: no playable track selected");
            return;
        }
        self.cancel_pending();

        self.cursor.frame_index = frame_index.min(frame_count - 1);
        self.resume_at_cursor = true;
        self.emit_current(sink);

        if self.state == PlaybackState::Playing {
            self.arm();
        }
    }

    /// Change the speed multiplier. Non-positive or non-finite values are ignored.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            debug!(multiplier, "speed ignored: must be positive and finite");
            return;
        }
        self.cancel_pending();
        self.cursor.speed_multiplier = multiplier;

        if self.state == PlaybackState::Playing {
            self.arm();
        }
    }

    /// Deliver a timer firing.
    pub fn on_timer<S: FrameSink + ?Sized>(&mut self, handle: TimerHandle, sink: &mut S) {
        if self.pending != Some(handle) {
            debug!(?handle, "stale timer ignored");
            return;
        }
        self.pending = None;

        if self.state != PlaybackState::Playing {
            return;
        }
        self.advance(sink);
    }

    // ========================================
    // Internals
    // ========================================

    fn advance<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        let last = self.frame_count().saturating_sub(1);
        if self.cursor.frame_index >= last {
            self.set_state(PlaybackState::Stopped);
            self.resume_at_cursor = false;
            info!(frames = last + 1, "playback finished");
            return;
        }

        self.cursor.frame_index += 1;
        self.emit_current(sink);
        self.arm();
    }

    fn emit_current<S: FrameSink + ?Sized>(&self, sink: &mut S) {
        if let Some(frame) = self.track.as_ref().and_then(|t| t.frame(self.cursor.frame_index)) {
            sink.apply(frame);
        }
    }

    fn arm(&mut self) {
        self.cancel_pending();
        let delay = self.advance_delay();
        self.pending = Some(self.timer.schedule(delay));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
    }

    fn advance_delay(&self) -> Duration {
        let secs = self.frame_duration.as_secs_f64() / self.cursor.speed_multiplier;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
        self.cursor.is_playing = state == PlaybackState::Playing;
    }
}

impl PlaybackScheduler<ManualTimer> {
    /// Move virtual time forward by `by`, delivering every firing that falls due.
    pub fn advance_clock<S: FrameSink + ?Sized>(&mut self, by: Duration, sink: &mut S) {
        let until = self.timer.now().saturating_add(by);
        while let Some(handle) = self.timer.pop_due(until) {
            self.on_timer(handle, sink);
        }
        self.timer.set_now(until);
    }

    /// Deliver firings until nothing is pending. Returns the number delivered.
    pub fn run_to_end<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let mut fired = 0;
        while let Some(handle) = self.timer.pop_next() {
            self.on_timer(handle, sink);
            fired += 1;
        }
        fired
    }
}
