//! Playback control surface
//!
//! Hosts translate their widgets (buttons, slider, speed picker) into a
//! [`PlaybackControl`] and hand it to the board.

use serde::{Deserialize, Serialize};

/// One control request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "lowercase")]
pub enum PlaybackControl {
    Play,
    Pause,
    Stop,
    /// Slider value; floored, negative and NaN become frame 0
    Seek(f64),
    Speed(f64),
}

impl PlaybackControl {
    /// Parse an action name plus its optional numeric argument.
    ///
    /// `seek` and `speed` need a value; unknown actions return `None`.
    pub fn from_action(action: &str, value: Option<f64>) -> Option<Self> {
        match action.trim().to_ascii_lowercase().as_str() {
            "play" | "start" => Some(PlaybackControl::Play),
            "pause" => Some(PlaybackControl::Pause),
            "stop" => Some(PlaybackControl::Stop),
            "seek" => value.map(PlaybackControl::Seek),
            "speed" => value.map(PlaybackControl::Speed),
            _ => None,
        }
    }
}

/// Slider value to frame index.
pub fn seek_index(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at usize::MAX; the scheduler clamps to the track
    value.floor() as usize
}
