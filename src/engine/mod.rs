//! # Engine Module
//!
//! Turns parsed frame ranges into moving notes and advances them against a
//! per-track clock.
//!
//! ## Sub-modules
//! - `geometry` - the `Rect` exposed to whatever draws the tracks
//! - `note` - a single moving marker with a fixed velocity and expiry time
//! - `track` - one lane: its notes, its clock, and its completion state
//! - `session` - a set of tracks started together, with completion aggregation
//!
//! ## Timing
//!
//! A note represents one range `(start, end)` shifted by the configured offset.
//! Notes move rightwards at the scroll speed. A note's leading (right) edge
//! reaches the target when its range starts; its trailing (left) edge reaches
//! the target when the range ends, which is also the note's expiry time.
//! A note is culled once the clock is more than the grace window past expiry.
//!
//! A track's run ends when its last note has been culled. The track's
//! maximum time (last end plus a trailing buffer) bounds how long notes keep
//! moving.
//!
//! ## Example
//! ```rust
//! use frameline::{build_session_config, Session, SessionEvent, SessionInput, TrackInput};
//!
//! let input = SessionInput {
//!     tracks: vec![TrackInput::new("60-120")],
//!     ..SessionInput::default()
//! };
//! let config = build_session_config(&input)?;
//!
//! let mut session = Session::default();
//! session.start_all(&config)?;
//!
//! let mut ended = false;
//! for _ in 0..(4 * 60) {
//!     let tick = session.tick(1.0 / 60.0);
//!     ended |= tick.events.contains(&SessionEvent::PlaybackEnded);
//! }
//! assert!(ended);
//! # Ok::<(), frameline::FrameError>(())
//! ```

mod geometry;
mod note;
mod session;
mod track;

#[cfg(test)]
mod tests;

pub use geometry::Rect;
pub use note::{Note, NoteView};
pub use session::{Session, SessionEvent, Tick, TrackView};
pub use track::{Render, Track, TrackState};
