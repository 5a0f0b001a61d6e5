//! One lane of notes running against its own clock.

use log::debug;
use serde::Serialize;

use super::geometry::Rect;
use super::note::{Note, NoteView};
use crate::config::{TrackConfig, Tuning};
use crate::error::FrameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    Idle,
    Running,
}

/// Result of rendering a track for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Render {
    /// The foremost live note. Only this one is drawn.
    Note(NoteView),
    /// The last note was culled; the track went idle this tick.
    Finished,
    /// Nothing to draw.
    Empty,
}

/// A lane with fixed geometry, a replaceable configuration and a clock.
///
/// Lifecycle: `Idle` until [`Track::start`] succeeds, `Running` until every
/// note has been culled, then `Idle` again. Starting a running track discards
/// its notes and clock and begins from zero.
#[derive(Debug, Clone)]
pub struct Track {
    id: usize,
    frame: Rect,
    tuning: Tuning,
    target_x: f64,
    drawable_width: f64,
    config: Option<TrackConfig>,
    t: f64,
    t_max: f64,
    notes: Vec<Note>,
    state: TrackState,
    visible: bool,
}

impl Track {
    pub fn new(id: usize, frame: Rect, tuning: Tuning) -> Self {
        Self {
            id,
            frame,
            tuning,
            target_x: frame.x + (frame.width * tuning.target_fraction).floor(),
            drawable_width: frame.width,
            config: None,
            t: 0.0,
            t_max: 0.0,
            notes: Vec::new(),
            state: TrackState::Idle,
            visible: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Replace the configuration. Live notes are untouched until the next start.
    pub fn set_config(&mut self, config: TrackConfig) {
        self.config = Some(config);
    }

    pub fn config(&self) -> Option<&TrackConfig> {
        self.config.as_ref()
    }

    /// Build notes from the current configuration and run from zero.
    ///
    /// Fails without touching the clock, notes or visibility if no
    /// configuration was set, the range list is empty, or any range has an
    /// invalid endpoint.
    pub fn start(&mut self) -> Result<(), FrameError> {
        let config = self
            .config
            .as_ref()
            .ok_or(FrameError::NotConfigured { track: self.id })?;

        if config.ranges.is_empty() {
            return Err(FrameError::EmptyRanges { track: self.id });
        }

        let spans = config
            .ranges
            .iter()
            .enumerate()
            .map(|(index, range)| {
                range.bounds().ok_or(FrameError::InvalidRange {
                    track: self.id,
                    index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let offset = config.offset;
        let speed = config.scroll_speed;
        let drawable_width = if config.gutter {
            self.frame.width
        } else {
            (self.frame.width * self.tuning.target_fraction).floor()
        };

        let t_max = spans
            .iter()
            .map(|&(_, end)| end + offset + self.tuning.trailing_buffer)
            .fold(f64::NEG_INFINITY, f64::max);

        let notes: Vec<Note> = spans
            .iter()
            .enumerate()
            .map(|(id, &(start, end))| {
                let (start, end) = (start + offset, end + offset);
                // trailing edge meets the target at `end`
                let rect = Rect::new(
                    self.target_x - speed * end,
                    self.frame.y,
                    (end - start) * speed,
                    self.frame.height,
                );
                Note::new(id, rect, speed, end)
            })
            .collect();

        debug!(
            "track {}: starting with {} notes, t_max {:.3}s",
            self.id,
            notes.len(),
            t_max
        );

        self.drawable_width = drawable_width;
        self.t = 0.0;
        self.t_max = t_max;
        self.notes = notes;
        self.state = TrackState::Running;
        self.visible = true;
        Ok(())
    }

    /// Advance the clock by `dt` seconds, move live notes and cull expired ones.
    ///
    /// Notes stop moving once the clock passes the maximum time, but culling
    /// continues so a large `dt` cannot leave a run unfinished.
    pub fn update(&mut self, dt: f64) {
        self.t += dt;

        if self.notes.is_empty() {
            return;
        }

        let moving = self.t <= self.t_max;
        let cutoff = self.t - self.tuning.grace_window;
        self.notes.retain_mut(|note| {
            if moving {
                note.update(dt);
            }
            note.expiry() >= cutoff
        });
    }

    /// Expose the foremost note, or report completion once per run.
    pub fn render(&mut self) -> Render {
        if let Some(note) = self.notes.first() {
            return Render::Note(note.view());
        }

        if self.state == TrackState::Running {
            self.state = TrackState::Idle;
            debug!("track {}: finished at {:.3}s", self.id, self.t);
            return Render::Finished;
        }

        Render::Empty
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TrackState::Running
    }

    /// Seconds since the last start.
    pub fn clock(&self) -> f64 {
        self.t
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    /// Live notes in range order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn foremost(&self) -> Option<&Note> {
        self.notes.first()
    }

    pub fn target_x(&self) -> f64 {
        self.target_x
    }

    /// The drawn track area. Narrower than the full width when there is no gutter.
    pub fn frame(&self) -> Rect {
        Rect::new(self.frame.x, self.frame.y, self.drawable_width, self.frame.height)
    }

    /// Zero-width marker at the target position.
    pub fn target(&self) -> Rect {
        Rect::new(self.target_x, self.frame.y, 0.0, self.frame.height)
    }

    /// Area right of the drawable width, up to `viewport_width`, that must stay clear of notes.
    pub fn cull(&self, viewport_width: f64) -> Rect {
        let x = self.frame.x + self.drawable_width;
        Rect::new(x, self.frame.y, (viewport_width - x).max(0.0), self.frame.height)
    }
}
