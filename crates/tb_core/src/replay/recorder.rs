//! Recorder - sample board changes into a log, squash on stop
//!
//! The recorder has no timer. The board reports the full [`EntitySet`] after every
//! committed move and the recorder appends a [`Sample`] only when the values differ
//! from the last one it stored.

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::models::{default_442, EntitySet, MovementTrack};

use super::sample::Sample;
use super::squash::squash;

/// Movement recorder for one board
#[derive(Debug)]
pub struct Recorder<C: Clock = SystemClock> {
    clock: C,
    samples: Vec<Sample>,
    active: bool,
    /// Roster sizes fixed at session start
    counts: (usize, usize),
    /// Most recent snapshot seen, recording or not
    last_seen: Option<EntitySet>,
    /// Result of the last stop, returned again on a repeated stop
    last_track: Option<MovementTrack>,
}

impl Default for Recorder<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Recorder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            samples: Vec::new(),
            active: false,
            counts: (0, 0),
            last_seen: None,
            last_track: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active
    }

    /// Samples captured in the current (or last) session
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begin a session from `initial`, discarding any previous log.
    pub fn start_recording(&mut self, initial: &EntitySet) {
        self.samples.clear();
        self.last_track = None;
        self.counts = initial.counts();
        self.samples.push(Sample::capture(initial, self.clock.now_ms()));
        self.last_seen = Some(initial.clone());
        self.active = true;

        info!(home = self.counts.0, away = self.counts.1, "recording started");
    }

    /// Report the current board. Returns `true` when a sample was appended.
    pub fn observe(&mut self, current: &EntitySet) -> bool {
        if !self.active {
            self.last_seen = Some(current.clone());
            return false;
        }

        if current.counts() != self.counts {
            warn!(
                expected = ?self.counts,
                got = ?current.counts(),
                "roster size changed mid-recording, snapshot rejected"
            );
            return false;
        }

        self.last_seen = Some(current.clone());

        if self.samples.last().is_some_and(|last| last.same_positions(current)) {
            return false;
        }

        self.samples.push(Sample::capture(current, self.clock.now_ms()));
        debug!(samples = self.samples.len(), "sample recorded");
        true
    }

    /// End the session and return the squashed track.
    ///
    /// Calling it again without a new start returns the same track. With no usable
    /// log the result is a single frame of the latest known snapshot (or the default
    /// formation).
    pub fn stop_recording(&mut self) -> MovementTrack {
        if !self.active {
            if let Some(track) = &self.last_track {
                return track.clone();
            }
        }
        self.active = false;

        let track = if self.samples.is_empty() {
            let fallback = self.last_seen.clone().unwrap_or_else(default_442);
            MovementTrack::single_frame(&fallback)
        } else {
            squash(&self.samples, self.counts.0, self.counts.1)
        };

        info!(
            samples = self.samples.len(),
            frames = track.frame_count().unwrap_or(0),
            "recording stopped"
        );

        self.last_track = Some(track.clone());
        track
    }
}
