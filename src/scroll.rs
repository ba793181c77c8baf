//! Scroll offset to frame index mapping and the per-refresh update throttle.

/// Products within this many ulps of an integer are treated as landing on it.
const BOUNDARY_ULPS: f64 = 4.0;

/// Position and height of the scroll-tracking container, in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerMetrics {
    /// Document offset of the container's top edge.
    pub top: f64,
    /// Container height.
    pub height: f64,
}

/// Normalized playback progress of `scroll_offset` within a container.
///
/// Returns `None` for a degenerate container (zero, negative or non-finite height) or a
/// non-finite input, so callers keep their previous frame. Otherwise the result lies in `[0, 1]`.
pub fn scroll_progress(scroll_offset: f64, container_top: f64, container_height: f64) -> Option<f64> {
    if !container_height.is_finite() || container_height <= 0.0 {
        return None;
    }
    let raw = (scroll_offset - container_top) / container_height;
    if raw.is_nan() {
        return None;
    }
    Some(raw.clamp(0.0, 1.0))
}

/// Frame index for `progress` in a sequence of `frame_count` frames.
///
/// `floor(progress * (frame_count - 1))`, clamped into range. Sequences of zero or one frame
/// always map to index 0.
pub fn frame_for_progress(progress: f64, frame_count: usize) -> usize {
    if frame_count <= 1 || progress.is_nan() {
        return 0;
    }
    let last = frame_count - 1;
    let scaled = progress.clamp(0.0, 1.0) * last as f64;
    let nearest = scaled.round();
    let idx = if (scaled - nearest).abs() <= BOUNDARY_ULPS * f64::EPSILON * nearest.max(1.0) {
        nearest
    } else {
        scaled.floor()
    };
    (idx as usize).min(last)
}

/// Progress and frame index for a scroll position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    /// Normalized progress in `[0, 1]`.
    pub progress: f64,
    /// Frame index in `[0, frame_count)`.
    pub frame: usize,
}

/// Map a scroll offset within `container` onto a sequence of `frame_count` frames.
pub fn sample(scroll_offset: f64, container: ContainerMetrics, frame_count: usize) -> Option<ScrollSample> {
    let progress = scroll_progress(scroll_offset, container.top, container.height)?;
    Some(ScrollSample {
        progress,
        frame: frame_for_progress(progress, frame_count),
    })
}

/// Outcome of feeding a scroll event to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDisposition {
    /// First event of this refresh window: the host must deliver one animation-frame callback.
    Scheduled,
    /// An update is already pending for this window; nothing to schedule.
    Coalesced,
}

/// Allows at most one frame update per display refresh.
///
/// The first request of a window wins and sets the pending flag; later requests are dropped
/// until the scheduled update runs and calls [`FrameThrottle::complete`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    /// Request an update. Returns `true` when the caller must schedule the callback.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Mark the scheduled update as executed, re-opening the window.
    pub fn complete(&mut self) {
        self.pending = false;
    }

    /// Whether an update is scheduled but has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
#[path = "../tests/unit/scroll.rs"]
mod tests;
