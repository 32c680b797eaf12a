//! Recording and playback
//!
//! - [`recorder`]: samples board changes, squashes on stop
//! - [`squash`]: sample log to frame-major keyframe tracks
//! - [`scheduler`]: timer-driven deterministic playback
//! - [`timer`]: host timer contract plus a virtual-clock implementation

pub mod control;
pub mod frame;
pub mod recorder;
pub mod sample;
pub mod scheduler;
pub mod squash;
pub mod timer;

pub use control::{seek_index, PlaybackControl};
pub use frame::{FrameLog, FrameSink};
pub use recorder::Recorder;
pub use sample::Sample;
pub use scheduler::{
    format_clock, PlaybackCursor, PlaybackScheduler, PlaybackState, PlaybackStatus,
    DEFAULT_FRAME_DURATION_MS, DEFAULT_SPEED,
};
pub use squash::squash;
pub use timer::{ManualTimer, TimerHandle, TimerHost};
