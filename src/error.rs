//! # Error Types
//!
//! This module defines all error types for the frameline engine.
//!
//! The range parser never fails; malformed tokens become invalid endpoints.
//! Errors surface when a configuration is validated or a track is started,
//! and each one names the track (and range) it came from so the input layer
//! can point the user at the offending field.
//!
//! ## Usage
//! ```rust
//! use frameline::{build_session_config, FrameError, SessionInput, TrackInput};
//!
//! let input = SessionInput {
//!     tracks: vec![TrackInput::new("60-120"), TrackInput::new("oops")],
//!     ..SessionInput::default()
//! };
//!
//! match build_session_config(&input) {
//!     Err(FrameError::InvalidRanges { tracks }) => assert_eq!(tracks, vec![1]),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    /// One or more track inputs contain a malformed range token.
    ///
    /// `tracks` lists every offending track index (0-based), in order.
    ///
    /// # Example
    /// ```
    /// # use frameline::FrameError;
    /// let err = FrameError::InvalidRanges { tracks: vec![0, 2] };
    /// assert_eq!(err.to_string(), "Invalid frame ranges on tracks [0, 2]");
    /// ```
    #[error("Invalid frame ranges on tracks {tracks:?}")]
    InvalidRanges { tracks: Vec<usize> },

    /// A track was started with no ranges, so there is no end time to run to.
    #[error("Track {track}: no ranges configured")]
    EmptyRanges { track: usize },

    /// A track was started with a range whose start or end did not parse.
    ///
    /// # Example
    /// ```
    /// # use frameline::FrameError;
    /// let err = FrameError::InvalidRange { track: 1, index: 3 };
    /// assert_eq!(err.to_string(), "Track 1: range 3 has an invalid endpoint");
    /// ```
    #[error("Track {track}: range {index} has an invalid endpoint")]
    InvalidRange { track: usize, index: usize },

    #[error("Session has no tracks")]
    NoTracks,

    #[error("Track {track}: started before a configuration was set")]
    NotConfigured { track: usize },

    /// Per-track slices of a session configuration disagree with the track count.
    #[error("Expected configuration for {expected} tracks, found {found}")]
    TrackCountMismatch { expected: usize, found: usize },

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_yaml::Error),
}
