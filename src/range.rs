//! # Range Parser
//!
//! Converts frame-range text such as `"2291-2300, 2678-2683"` into time
//! intervals in seconds.
//!
//! Each comma-separated token has the shape `<int>-<int>`. Both sides are
//! frame numbers and are divided by the frame rate. A side that does not
//! parse becomes an invalid endpoint (`None`) instead of an error, so the
//! input layer can decide how to report it. An empty string yields a single
//! invalid range.
//!
//! ## Example
//! ```rust
//! use frameline::parse_ranges;
//!
//! let ranges = parse_ranges("60-120, 30-45");
//! assert_eq!(ranges.len(), 2);
//! assert_eq!(ranges[0].bounds(), Some((1.0, 2.0)));
//! assert_eq!(ranges[1].bounds(), Some((0.5, 0.75)));
//!
//! let bad = parse_ranges("");
//! assert_eq!(bad.len(), 1);
//! assert!(!bad[0].is_valid());
//! ```

use serde::Serialize;

use crate::config::FRAME_RATE;
use crate::error::FrameError;

/// A start/end pair in seconds.
///
/// Either endpoint is `None` when its frame number failed to parse.
/// `start > end` is representable; it produces a note with negative width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// Ranges in input order. Overlaps are allowed and each range spawns its own note.
pub type RangeList = Vec<Range>;

impl Range {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both endpoints, if both parsed.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.start?, self.end?))
    }

    pub fn duration(&self) -> Option<f64> {
        self.bounds().map(|(start, end)| end - start)
    }
}

/// Parse a comma-separated list of frame ranges at the default frame rate.
pub fn parse_ranges(input: &str) -> RangeList {
    parse_ranges_at(input, FRAME_RATE)
}

/// Parse a comma-separated list of frame ranges at `frame_rate` frames per second.
pub fn parse_ranges_at(input: &str, frame_rate: u32) -> RangeList {
    input
        .split(',')
        .map(|token| parse_range(token.trim(), frame_rate))
        .collect()
}

fn parse_range(token: &str, frame_rate: u32) -> Range {
    match token.split_once('-') {
        Some((start, end)) => Range {
            start: parse_frame(start, frame_rate),
            end: parse_frame(end, frame_rate),
        },
        // no separator: only a start was given
        None => Range {
            start: parse_frame(token, frame_rate),
            end: None,
        },
    }
}

fn parse_frame(text: &str, frame_rate: u32) -> Option<f64> {
    let frames: i64 = text.trim().parse().ok()?;
    Some(frames as f64 / frame_rate as f64)
}

/// True if any range in the list has an invalid endpoint.
pub fn has_invalid(ranges: &[Range]) -> bool {
    ranges.iter().any(|range| !range.is_valid())
}

/// Check every track's ranges and report all offending track indices at once.
pub fn validate_tracks(tracks: &[RangeList]) -> Result<(), FrameError> {
    let invalid: Vec<usize> = tracks
        .iter()
        .enumerate()
        .filter(|(_, ranges)| has_invalid(ranges))
        .map(|(i, _)| i)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(FrameError::InvalidRanges { tracks: invalid })
    }
}
