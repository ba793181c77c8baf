use crate::foundation::error::{ScrollReelError, ScrollReelResult};

pub use kurbo::{Affine, Rect, Size};

/// Inclusive range of source frame numbers, e.g. `30..=192`.
///
/// Slot index `i` of a frame set built from this range maps to source frame `start + i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    /// First source frame number (inclusive).
    pub start: u32,
    /// Last source frame number (inclusive).
    pub end: u32,
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: u32, end: u32) -> ScrollReelResult<Self> {
        if start > end {
            return Err(ScrollReelError::validation(format!(
                "frame range start ({start}) must be <= end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of frames in the range (`end - start + 1`).
    pub fn len(self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// A valid range always holds at least one frame.
    pub fn is_empty(self) -> bool {
        false
    }

    /// Source frame number for slot `index`, if the slot exists.
    pub fn frame_number(self, index: usize) -> Option<u32> {
        if index >= self.len() {
            return None;
        }
        Some(self.start + index as u32)
    }

    /// Ascending source frame numbers.
    pub fn frame_numbers(self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}
