//! # Configuration
//!
//! Everything a session needs before it can start:
//!
//! - [`TrackConfig`] - immutable per-track snapshot handed to a `Track`
//! - [`SessionConfig`] - parsed top-level configuration, sliced per track
//! - [`SessionInput`] - the raw form shape (frame strings, offset in frames)
//! - [`PersistedSettings`] - the subset that survives between sessions
//! - [`Tuning`] and [`Layout`] - engine constants and track geometry
//!
//! Nothing here performs I/O. Settings serialize to and from YAML strings;
//! reading and writing files is the caller's business.

use serde::{Deserialize, Serialize};

use crate::engine::Rect;
use crate::error::FrameError;
use crate::range::RangeList;

/// Frames per second of the process being timed.
pub const FRAME_RATE: u32 = 60;

pub const DEFAULT_NOTE_COLOR: &str = "#00ff00";
pub const DEFAULT_GUTTER_COLOR: &str = "#ffffff";
pub const DEFAULT_SCROLL_SPEED: f64 = 300.0;

/// Engine constants that differ between historical versions of the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Target position as a fraction of track width, measured from the left edge.
    /// Also the drawable fraction of a track without a gutter.
    pub target_fraction: f64,
    /// Seconds a note stays live after its expiry time.
    pub grace_window: f64,
    /// Seconds added after the last range ends before the run is over.
    pub trailing_buffer: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_fraction: 0.85,
            grace_window: 0.2,
            trailing_buffer: 1.0,
        }
    }
}

/// Where tracks sit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub origin_x: f64,
    pub origin_y: f64,
    pub track_width: f64,
    pub track_height: f64,
    pub track_padding: f64,
    /// Right edge of the cull area beyond each track.
    pub viewport_width: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin_x: 4.0,
            origin_y: 4.0,
            track_width: 500.0,
            track_height: 76.0,
            track_padding: 10.0,
            viewport_width: 1280.0,
        }
    }
}

impl Layout {
    /// Frame of track `index`; tracks stack downwards without overlapping.
    pub fn track_frame(&self, index: usize) -> Rect {
        let y = self.origin_y + index as f64 * (self.track_height + self.track_padding);
        Rect::new(self.origin_x, y, self.track_width, self.track_height)
    }

    /// Vertical space taken by `count` tracks, padding included.
    pub fn stack_height(&self, count: usize) -> f64 {
        count as f64 * (self.track_height + self.track_padding)
    }
}

/// Configuration of a single track. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackConfig {
    pub ranges: RangeList,
    /// Pixels per second.
    pub scroll_speed: f64,
    /// Seconds added to every range's start and end.
    pub offset: f64,
    pub color: String,
    pub gutter: bool,
    pub gutter_color: String,
}

/// Parsed configuration for a whole session.
///
/// Offset, scroll speed and gutter options are shared; ranges and colors are
/// per track and must line up with `num_tracks`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub num_tracks: usize,
    pub ranges: Vec<RangeList>,
    pub colors: Vec<String>,
    pub offset: f64,
    pub scroll_speed: f64,
    pub gutter: bool,
    pub gutter_color: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(&PersistedSettings::default())
    }
}

impl SessionConfig {
    /// A configuration with no tracks, seeded from persisted settings.
    pub fn from_settings(settings: &PersistedSettings) -> Self {
        Self {
            num_tracks: 0,
            ranges: Vec::new(),
            colors: Vec::new(),
            offset: settings.offset,
            scroll_speed: settings.scroll_speed,
            gutter: settings.gutter,
            gutter_color: settings.gutter_color.clone(),
        }
    }

    /// Overwrite the persisted subset, leaving ranges and colors alone.
    pub fn apply_settings(&mut self, settings: &PersistedSettings) {
        self.offset = settings.offset;
        self.scroll_speed = settings.scroll_speed;
        self.gutter = settings.gutter;
        self.gutter_color = settings.gutter_color.clone();
    }

    /// Project down to the subset worth saving between sessions.
    pub fn persisted(&self) -> PersistedSettings {
        PersistedSettings {
            offset: self.offset,
            scroll_speed: self.scroll_speed,
            gutter: self.gutter,
            gutter_color: self.gutter_color.clone(),
        }
    }

    /// Append a track with its ranges and color.
    pub fn push_track(&mut self, ranges: RangeList, color: impl Into<String>) {
        self.ranges.push(ranges);
        self.colors.push(color.into());
        self.num_tracks += 1;
    }

    /// Check that there is one range list per track.
    pub fn check_shape(&self) -> Result<(), FrameError> {
        if self.ranges.len() != self.num_tracks {
            return Err(FrameError::TrackCountMismatch {
                expected: self.num_tracks,
                found: self.ranges.len(),
            });
        }
        Ok(())
    }

    /// The slice of this configuration that belongs to track `index`.
    ///
    /// A missing color falls back to [`DEFAULT_NOTE_COLOR`].
    pub fn track_config(&self, index: usize) -> Option<TrackConfig> {
        let ranges = self.ranges.get(index)?.clone();
        let color = self
            .colors
            .get(index)
            .cloned()
            .unwrap_or_else(|| DEFAULT_NOTE_COLOR.to_string());

        Some(TrackConfig {
            ranges,
            scroll_speed: self.scroll_speed,
            offset: self.offset,
            color,
            gutter: self.gutter,
            gutter_color: self.gutter_color.clone(),
        })
    }
}

/// Settings kept between sessions. Ranges and colors are re-entered each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    /// Seconds.
    pub offset: f64,
    pub scroll_speed: f64,
    pub gutter: bool,
    pub gutter_color: String,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            gutter: false,
            gutter_color: DEFAULT_GUTTER_COLOR.to_string(),
        }
    }
}

impl PersistedSettings {
    pub fn from_yaml(source: &str) -> Result<Self, FrameError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn to_yaml(&self) -> Result<String, FrameError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// One track as typed by the user: a frame-range string and a note color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInput {
    pub frames: String,
    #[serde(default = "default_note_color")]
    pub color: String,
}

impl TrackInput {
    pub fn new(frames: impl Into<String>) -> Self {
        Self {
            frames: frames.into(),
            color: default_note_color(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

fn default_note_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

/// Unparsed session input, as collected from a form or a session file.
///
/// The offset is entered in frames here and converted to seconds when the
/// input is built into a [`SessionConfig`].
///
/// ```yaml
/// tracks:
///   - frames: "30-40, 100-120"
///     color: "#ff0000"
///   - frames: "50-100"
/// offset_frames: -2
/// scroll_speed: 300
/// gutter: true
/// gutter_color: "#ffffff"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInput {
    pub tracks: Vec<TrackInput>,
    pub offset_frames: f64,
    pub scroll_speed: f64,
    pub gutter: bool,
    pub gutter_color: String,
}

impl Default for SessionInput {
    fn default() -> Self {
        let settings = PersistedSettings::default();
        Self {
            tracks: Vec::new(),
            offset_frames: 0.0,
            scroll_speed: settings.scroll_speed,
            gutter: settings.gutter,
            gutter_color: settings.gutter_color,
        }
    }
}

impl SessionInput {
    pub fn from_yaml(source: &str) -> Result<Self, FrameError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Seed the shared fields from saved settings.
    pub fn apply_settings(&mut self, settings: &PersistedSettings) {
        self.offset_frames = settings.offset * FRAME_RATE as f64;
        self.scroll_speed = settings.scroll_speed;
        self.gutter = settings.gutter;
        self.gutter_color = settings.gutter_color.clone();
    }
}
