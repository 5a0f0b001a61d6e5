//! # frameline
//!
//! A timing trainer engine: frame ranges such as `"2291-2300, 2678-2683"`
//! become notes that scroll across a fixed target, reaching it exactly while
//! each range is active. Several tracks can run side by side, each with its
//! own ranges and color.
//!
//! The crate draws nothing and schedules nothing. A driver calls
//! [`Session::tick`] with measured frame deltas and renders
//! [`Session::views`].

pub mod config;
pub mod engine;
pub mod error;
pub mod presets;
pub mod range;

pub use config::*;
pub use engine::{Note, NoteView, Rect, Render, Session, SessionEvent, Tick, Track, TrackState, TrackView};
pub use error::*;
pub use presets::{all_presets, find_preset, preset_names, Preset};
pub use range::{parse_ranges, parse_ranges_at, validate_tracks, Range, RangeList};

/// Parse and validate raw session input into a [`SessionConfig`].
///
/// Every track's frame string is parsed; if any contain malformed tokens the
/// error lists all offending track indices. The frame offset is converted to
/// seconds.
///
/// # Example
/// ```rust
/// use frameline::{build_session_config, SessionInput, TrackInput};
///
/// let input = SessionInput {
///     tracks: vec![TrackInput::new("60-120"), TrackInput::new("30-45").with_color("#ff0000")],
///     offset_frames: 6.0,
///     ..SessionInput::default()
/// };
///
/// let config = build_session_config(&input)?;
/// assert_eq!(config.num_tracks, 2);
/// assert_eq!(config.offset, 0.1);
/// # Ok::<(), frameline::FrameError>(())
/// ```
pub fn build_session_config(input: &SessionInput) -> Result<SessionConfig, FrameError> {
    let ranges: Vec<RangeList> = input
        .tracks
        .iter()
        .map(|track| parse_ranges(&track.frames))
        .collect();
    validate_tracks(&ranges)?;

    Ok(SessionConfig {
        num_tracks: ranges.len(),
        ranges,
        colors: input.tracks.iter().map(|track| track.color.clone()).collect(),
        offset: input.offset_frames / FRAME_RATE as f64,
        scroll_speed: input.scroll_speed,
        gutter: input.gutter,
        gutter_color: input.gutter_color.clone(),
    })
}
