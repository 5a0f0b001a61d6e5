//! A set of tracks started together.

use log::{info, warn};
use serde::Serialize;

use super::geometry::Rect;
use super::note::NoteView;
use super::track::{Render, Track};
use crate::config::{Layout, PersistedSettings, SessionConfig, Tuning};
use crate::error::FrameError;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Track `track` culled its last note at clock time `at`.
    TrackFinished { track: usize, at: f64 },
    /// Every track has finished. Fires once per run.
    PlaybackEnded,
}

/// Outcome of one [`Session::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    pub events: Vec<SessionEvent>,
}

impl Tick {
    pub fn playback_ended(&self) -> bool {
        self.events.contains(&SessionEvent::PlaybackEnded)
    }
}

/// Render geometry for one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    pub id: usize,
    pub visible: bool,
    pub frame: Rect,
    pub target: Rect,
    pub cull: Rect,
    pub note: Option<NoteView>,
    pub color: String,
    pub gutter_color: String,
}

/// Owns the tracks of the current run and counts how many have finished.
///
/// Driven by an external scheduler calling [`Session::tick`] with measured,
/// non-negative frame deltas.
#[derive(Debug, Clone, Default)]
pub struct Session {
    layout: Layout,
    tuning: Tuning,
    config: Option<SessionConfig>,
    tracks: Vec<Track>,
    ended_tracks: usize,
    playback_ended: bool,
}

impl Session {
    pub fn new(layout: Layout, tuning: Tuning) -> Self {
        Self {
            layout,
            tuning,
            ..Self::default()
        }
    }

    /// Replace every track with fresh ones built from `config` and start them.
    ///
    /// All tracks are built and started before any of them replaces the
    /// current set, so a rejected configuration leaves the session exactly
    /// as it was.
    pub fn start_all(&mut self, config: &SessionConfig) -> Result<(), FrameError> {
        config.check_shape()?;
        if config.num_tracks == 0 {
            warn!("rejecting session start: no tracks");
            return Err(FrameError::NoTracks);
        }

        let mut tracks = Vec::with_capacity(config.num_tracks);
        for index in 0..config.num_tracks {
            let mut track = Track::new(index, self.layout.track_frame(index), self.tuning);
            if let Some(track_config) = config.track_config(index) {
                track.set_config(track_config);
            }
            if let Err(e) = track.start() {
                warn!("rejecting session start: {}", e);
                return Err(e);
            }
            tracks.push(track);
        }

        info!("session started with {} tracks", tracks.len());
        self.tracks = tracks;
        self.config = Some(config.clone());
        self.ended_tracks = 0;
        self.playback_ended = false;
        Ok(())
    }

    /// Start command for the input layer; same as [`Session::start_all`].
    pub fn request_start(&mut self, config: &SessionConfig) -> Result<(), FrameError> {
        self.start_all(config)
    }

    /// Drop the current run without signalling playback end.
    pub fn request_stop(&mut self) {
        if !self.tracks.is_empty() {
            info!("session stopped");
        }
        self.tracks.clear();
        self.ended_tracks = 0;
        self.playback_ended = false;
    }

    /// Update then render every track, in index order.
    pub fn tick(&mut self, dt: f64) -> Tick {
        let mut tick = Tick::default();

        for track in &mut self.tracks {
            track.update(dt);
            if let Render::Finished = track.render() {
                self.ended_tracks += 1;
                tick.events.push(SessionEvent::TrackFinished {
                    track: track.id(),
                    at: track.clock(),
                });
            }
        }

        if !self.playback_ended && !self.tracks.is_empty() && self.ended_tracks == self.tracks.len() {
            self.playback_ended = true;
            for track in &mut self.tracks {
                track.hide();
            }
            info!("playback ended");
            tick.events.push(SessionEvent::PlaybackEnded);
        }

        tick
    }

    pub fn views(&self) -> Vec<TrackView> {
        self.tracks
            .iter()
            .map(|track| {
                let (color, gutter_color) = track
                    .config()
                    .map(|c| (c.color.clone(), c.gutter_color.clone()))
                    .unwrap_or_default();
                TrackView {
                    id: track.id(),
                    visible: track.is_visible(),
                    frame: track.frame(),
                    target: track.target(),
                    cull: track.cull(self.layout.viewport_width),
                    note: track.foremost().map(|note| note.view()),
                    color,
                    gutter_color,
                }
            })
            .collect()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// True while any track still has notes to play.
    pub fn is_running(&self) -> bool {
        self.tracks.iter().any(Track::is_running)
    }

    pub fn ended_tracks(&self) -> usize {
        self.ended_tracks
    }

    pub fn playback_ended(&self) -> bool {
        self.playback_ended
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Settings of the last successfully started configuration.
    pub fn persisted_settings(&self) -> Option<PersistedSettings> {
        self.config.as_ref().map(SessionConfig::persisted)
    }
}
