//! Command implementations, written against any `Write` so they can be tested.

use std::io::Write;
use std::path::Path;
use std::thread;

use anyhow::{bail, Context, Result};
use tracing::warn;

use tb_core::{
    format_clock, BoardConfig, BoardState, Clock, JsonFileStore, ManualClock, ManualTimer, Play,
    PlaybackControl, PlaybackState, SystemClock,
};

use crate::script::Script;

pub type Board = BoardState<JsonFileStore, ManualTimer, ManualClock>;

/// Open the board stored under `data_dir`.
///
/// Time is virtual: the clock starts at the current wall time and only moves when
/// a command advances it.
pub fn open_board(data_dir: &Path, config: BoardConfig) -> (Board, ManualClock) {
    let clock = ManualClock::new(SystemClock.now_ms());
    let board = BoardState::open(
        JsonFileStore::new(data_dir),
        ManualTimer::new(),
        clock.clone(),
        config,
    );
    (board, clock)
}

pub fn record<W: Write>(
    board: &mut Board,
    clock: &ManualClock,
    script: &Script,
    out: &mut W,
) -> Result<Play> {
    board.start_recording();
    for (i, step) in script.moves.iter().enumerate() {
        clock.advance(step.after_ms.max(0));
        if !board.move_entity(step.entity, step.position())? {
            warn!(step = i, entity = ?step.entity, "script move targets a missing entity");
        }
    }

    let play = board
        .stop_recording()?
        .context("recording did not produce a play")?;

    writeln!(
        out,
        "Saved {} ({}) with {} frame(s) from {} move(s)",
        play.name,
        play.id,
        play.frame_count(),
        script.moves.len()
    )?;
    Ok(play)
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub speed: Option<f64>,
    pub seek: Option<f64>,
    /// Sleep between frames instead of running in virtual time
    pub realtime: bool,
}

/// Replay a play to its end, printing one line per emitted frame.
///
/// Returns the number of frames shown.
pub fn replay<W: Write>(
    board: &mut Board,
    id: &str,
    options: &ReplayOptions,
    out: &mut W,
) -> Result<usize> {
    if !board.select_play(id)? {
        bail!("no play with id {}", id);
    }
    if board.scheduler().track().is_none() {
        writeln!(out, "Play {} has no recorded movements", id)?;
        return Ok(0);
    }

    if let Some(speed) = options.speed {
        board.playback_control(PlaybackControl::Speed(speed))?;
    }
    if let Some(seek) = options.seek {
        board.playback_control(PlaybackControl::Seek(seek))?;
    }

    board.playback_control(PlaybackControl::Play)?;
    print_frame(board, out)?;
    let mut shown = 1;

    loop {
        let timer = board.timer_mut();
        let Some(deadline) = timer.next_deadline() else {
            break;
        };
        if options.realtime {
            thread::sleep(deadline.saturating_sub(timer.now()));
        }
        let Some(handle) = timer.pop_next() else {
            break;
        };

        board.fire_timer(handle)?;
        if board.status().state == PlaybackState::Playing {
            print_frame(board, out)?;
            shown += 1;
        }
    }

    let status = board.status();
    writeln!(out, "Finished at frame {} of {}", status.frame_index + 1, status.frame_count)?;
    Ok(shown)
}

fn print_frame<W: Write>(board: &Board, out: &mut W) -> Result<()> {
    let status = board.status();
    let ball = board.entities().ball_position;
    writeln!(
        out,
        "[{} / {}] frame {:>4}/{}  ball ({:+.3}, {:+.3})",
        status.current_clock(),
        status.duration_clock(),
        status.frame_index,
        status.frame_count.saturating_sub(1),
        ball.x,
        ball.y
    )?;
    Ok(())
}

pub fn list<W: Write>(board: &Board, out: &mut W) -> Result<()> {
    let frame_duration_ms = board.config().playback.frame_duration_ms;
    let plays = board.plays();
    if plays.is_empty() {
        writeln!(out, "No plays recorded")?;
        return Ok(());
    }

    for play in plays {
        let frames = play.frame_count();
        let duration = frame_duration_ms.saturating_mul(frames.saturating_sub(1) as u64);
        writeln!(
            out,
            "{:<15} {:<10} {:>5} frames  {:>6}  {}",
            play.id,
            play.name,
            frames,
            format_clock(duration),
            play.description
        )?;
    }
    Ok(())
}

pub fn show<W: Write>(board: &Board, id: &str, out: &mut W) -> Result<()> {
    let play = board
        .plays()
        .into_iter()
        .find(|p| p.id == id)
        .with_context(|| format!("no play with id {}", id))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&play)?)?;
    Ok(())
}

pub fn delete<W: Write>(board: &mut Board, id: &str, out: &mut W) -> Result<()> {
    if !board.delete_play(id)? {
        bail!("no play with id {}", id);
    }
    writeln!(out, "Deleted {}", id)?;
    Ok(())
}

/// Delete every play after `confirm` accepts the prompt.
pub fn clear<W: Write>(
    board: &mut Board,
    confirm: impl FnOnce(&str) -> bool,
    out: &mut W,
) -> Result<bool> {
    let cleared = board.delete_all_plays(confirm)?;
    if cleared {
        writeln!(out, "All plays deleted")?;
    } else {
        writeln!(out, "Nothing deleted")?;
    }
    Ok(cleared)
}

pub fn reset<W: Write>(board: &mut Board, out: &mut W) -> Result<()> {
    board.restore_defaults()?;
    writeln!(out, "Board restored to the default 4-4-2")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_core::{Entity, Position};
    use tempfile::TempDir;

    fn script() -> Script {
        Script::parse(
            r#"{"moves":[
                {"entity":{"home":0},"x":0.1,"y":0.1},
                {"entity":"ball","x":0.2,"y":0.0},
                {"entity":"ball","x":0.3,"y":0.0}
            ]}"#,
        )
        .unwrap()
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_record_then_replay() {
        let dir = TempDir::new().unwrap();
        let (mut board, clock) = open_board(dir.path(), BoardConfig::default());

        let mut buf = Vec::new();
        let play = record(&mut board, &clock, &script(), &mut buf).unwrap();
        assert!(output(buf).contains("Saved Play 1"));
        assert_eq!(play.frame_count(), 3);

        let mut buf = Vec::new();
        let shown = replay(&mut board, &play.id, &ReplayOptions::default(), &mut buf).unwrap();
        let text = output(buf);

        assert_eq!(shown, 3);
        assert!(text.contains("Finished at frame 3 of 3"));
        assert_eq!(board.entities().ball_position, Position::new(0.3, 0.0));
        assert_eq!(board.entities().get(Entity::Home(0)), Some(Position::new(0.1, 0.1)));
    }

    #[test]
    fn test_replay_from_seek() {
        let dir = TempDir::new().unwrap();
        let (mut board, clock) = open_board(dir.path(), BoardConfig::default());
        let play = record(&mut board, &clock, &script(), &mut Vec::new()).unwrap();

        let options = ReplayOptions { seek: Some(1.0), speed: Some(4.0), realtime: false };
        let shown = replay(&mut board, &play.id, &options, &mut Vec::new()).unwrap();
        assert_eq!(shown, 2);
    }

    #[test]
    fn test_replay_unknown_id() {
        let dir = TempDir::new().unwrap();
        let (mut board, _) = open_board(dir.path(), BoardConfig::default());
        assert!(replay(&mut board, "missing", &ReplayOptions::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn test_list_show_delete() {
        let dir = TempDir::new().unwrap();
        let (mut board, clock) = open_board(dir.path(), BoardConfig::default());

        let mut buf = Vec::new();
        list(&board, &mut buf).unwrap();
        assert!(output(buf).contains("No plays recorded"));

        let play = record(&mut board, &clock, &script(), &mut Vec::new()).unwrap();

        let mut buf = Vec::new();
        list(&board, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains(&play.id));
        assert!(text.contains("3 frames"));

        let mut buf = Vec::new();
        show(&board, &play.id, &mut buf).unwrap();
        assert!(output(buf).contains("\"ballPosition\""));

        delete(&mut board, &play.id, &mut Vec::new()).unwrap();
        assert!(board.plays().is_empty());
        assert!(delete(&mut board, &play.id, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_list_with_huge_frame_duration() {
        let dir = TempDir::new().unwrap();
        let mut config = BoardConfig::default();
        config.playback.frame_duration_ms = u64::MAX;
        let (mut board, clock) = open_board(dir.path(), config);
        record(&mut board, &clock, &script(), &mut Vec::new()).unwrap();

        let mut buf = Vec::new();
        list(&board, &mut buf).unwrap();
        assert!(output(buf).contains("3 frames"));
    }

    #[test]
    fn test_clear_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let (mut board, clock) = open_board(dir.path(), BoardConfig::default());
        record(&mut board, &clock, &script(), &mut Vec::new()).unwrap();

        assert!(!clear(&mut board, |_| false, &mut Vec::new()).unwrap());
        assert_eq!(board.plays().len(), 1);

        assert!(clear(&mut board, |_| true, &mut Vec::new()).unwrap());
        assert!(board.plays().is_empty());
    }

    #[test]
    fn test_state_persists_between_invocations() {
        let dir = TempDir::new().unwrap();
        {
            let (mut board, clock) = open_board(dir.path(), BoardConfig::default());
            record(&mut board, &clock, &script(), &mut Vec::new()).unwrap();
        }
        let (mut board, _) = open_board(dir.path(), BoardConfig::default());
        assert_eq!(board.entities().ball_position, Position::new(0.3, 0.0));

        reset(&mut board, &mut Vec::new()).unwrap();
        let (board, _) = open_board(dir.path(), BoardConfig::default());
        assert_eq!(board.entities().ball_position, Position::CENTER);
        assert_eq!(board.plays().len(), 1);
    }
}
