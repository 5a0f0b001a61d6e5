//! A single moving marker.

use serde::Serialize;

use super::geometry::Rect;

/// One range's marker, moving rightwards at a fixed velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    id: usize,
    rect: Rect,
    velocity: f64,
    expiry: f64,
}

/// What a renderer needs to draw a note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteView {
    /// Index of the range this note was built from; stable for the whole run.
    pub id: usize,
    pub rect: Rect,
    /// False once the note lies entirely left of the origin.
    pub visible: bool,
}

impl Note {
    pub fn new(id: usize, rect: Rect, velocity: f64, expiry: f64) -> Self {
        Self {
            id,
            rect,
            velocity,
            expiry,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Absolute clock time at which the trailing edge reaches the target.
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Advance by `dt` seconds. `dt` must not be negative.
    pub fn update(&mut self, dt: f64) {
        self.rect.x += self.velocity * dt;
    }

    /// Entirely before the visible origin, so drawing it can be skipped.
    pub fn is_off_screen(&self) -> bool {
        self.rect.right() < 0.0
    }

    pub fn view(&self) -> NoteView {
        NoteView {
            id: self.id,
            rect: self.rect,
            visible: !self.is_off_screen(),
        }
    }
}
