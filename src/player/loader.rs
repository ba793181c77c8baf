use std::sync::{Arc, mpsc};

use rayon::prelude::*;

use crate::assets::decode::{FrameImage, decode_image};
use crate::assets::fetch::FrameFetcher;
use crate::assets::naming::{FrameRequest, frame_id};
use crate::foundation::core::FrameRange;
use crate::foundation::error::{ScrollReelError, ScrollReelResult};
use crate::page::Page;

use super::FramePlayer;

/// Load state of one frame slot.
#[derive(Clone, Debug)]
pub enum SlotState {
    /// Request issued, not settled yet.
    Pending,
    /// Decoded and drawable.
    Loaded(FrameImage),
    /// Fetch or decode failed; the slot never draws.
    Failed,
}

impl SlotState {
    /// Whether the slot has settled (loaded or failed).
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Aggregate load counters. Counters only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadProgress {
    /// Number of frames in the set.
    pub total: usize,
    /// Frames decoded successfully.
    pub loaded: usize,
    /// Frames that failed to load.
    pub failed: usize,
}

impl LoadProgress {
    /// Frames that have settled either way.
    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    /// Whether every request has settled.
    pub fn is_complete(&self) -> bool {
        self.settled() >= self.total
    }

    /// Settled share in percent, driving the loading indicator.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.settled() as f64 / self.total as f64 * 100.0
    }
}

/// Ordered, fixed-length set of frame slots.
///
/// Slot `i` holds source frame `range.start + i`; slots are never reordered.
#[derive(Clone, Debug)]
pub struct FrameSet {
    range: FrameRange,
    slots: Vec<SlotState>,
    progress: LoadProgress,
}

impl FrameSet {
    /// All-pending set covering `range`.
    pub fn new(range: FrameRange) -> Self {
        let total = range.len();
        Self {
            range,
            slots: vec![SlotState::Pending; total],
            progress: LoadProgress {
                total,
                ..LoadProgress::default()
            },
        }
    }

    /// Source frame range.
    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// A frame set always holds at least one slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// State of slot `index`.
    pub fn state(&self, index: usize) -> Option<&SlotState> {
        self.slots.get(index)
    }

    /// Image of slot `index` if it has loaded.
    pub fn image(&self, index: usize) -> Option<&FrameImage> {
        match self.slots.get(index)? {
            SlotState::Loaded(img) => Some(img),
            SlotState::Pending | SlotState::Failed => None,
        }
    }

    /// Whether slot `index` holds a drawable image.
    pub fn is_loaded(&self, index: usize) -> bool {
        self.image(index).is_some()
    }

    /// Aggregate counters.
    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    /// Whether every slot has settled.
    pub fn is_settled(&self) -> bool {
        self.progress.is_complete()
    }

    /// Source frame numbers of failed slots, ascending.
    pub fn failed_frames(&self) -> Vec<u32> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, SlotState::Failed))
            .filter_map(|(i, _)| self.range.frame_number(i))
            .collect()
    }

    /// Record the outcome of slot `index`.
    ///
    /// Returns `false` (and changes nothing) when the index is out of range or the slot has
    /// already settled.
    pub fn settle(&mut self, index: usize, image: Option<FrameImage>) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.is_settled() {
            return false;
        }
        match image {
            Some(img) => {
                *slot = SlotState::Loaded(img);
                self.progress.loaded += 1;
            }
            None => {
                *slot = SlotState::Failed;
                self.progress.failed += 1;
            }
        }
        true
    }
}

/// Result of one frame request.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Slot index.
    pub index: usize,
    /// Source frame number.
    pub frame_number: u32,
    /// Decoded image or the reason it failed.
    pub result: ScrollReelResult<FrameImage>,
}

impl LoadOutcome {
    /// Zero-padded frame identifier, as used in diagnostics.
    pub fn frame_id(&self) -> String {
        frame_id(self.frame_number)
    }
}

/// Fetch and decode one request.
pub fn load_frame(fetcher: &dyn FrameFetcher, request: &FrameRequest) -> LoadOutcome {
    let result = fetcher
        .fetch(&request.url)
        .and_then(|bytes| decode_image(&bytes))
        .map_err(|e| {
            ScrollReelError::load(format!(
                "frame {} ({}): {e}",
                frame_id(request.frame_number),
                request.url
            ))
        });
    LoadOutcome {
        index: request.index,
        frame_number: request.frame_number,
        result,
    }
}

/// Issue every request concurrently on the rayon pool.
///
/// Outcomes arrive on the returned queue in completion order. Requests are independent: a failed
/// frame does not affect the others. There is no cancellation; dropping the queue only discards
/// outcomes that have not been received yet.
#[tracing::instrument(skip(fetcher, requests), fields(frames = requests.len()))]
pub fn spawn_loads(fetcher: Arc<dyn FrameFetcher>, requests: Vec<FrameRequest>) -> LoadQueue {
    let (tx, rx) = mpsc::channel();
    let remaining = requests.len();
    rayon::spawn(move || {
        requests.into_par_iter().for_each_with(tx, |tx, req| {
            let outcome = load_frame(fetcher.as_ref(), &req);
            // The receiver may have been dropped by the host; remaining outcomes are moot.
            let _ = tx.send(outcome);
        });
    });
    LoadQueue { rx, remaining }
}

/// Receiving end of a batch of frame loads.
///
/// Iterating blocks until the next outcome arrives and ends once every request has settled.
#[derive(Debug)]
pub struct LoadQueue {
    rx: mpsc::Receiver<LoadOutcome>,
    remaining: usize,
}

impl LoadQueue {
    /// Outcomes not received yet.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Wait for the next outcome. `None` once all outcomes have been received.
    pub fn recv(&mut self) -> Option<LoadOutcome> {
        if self.remaining == 0 {
            return None;
        }
        let outcome = self.rx.recv().ok()?;
        self.remaining -= 1;
        Some(outcome)
    }

    /// Next outcome if one is ready, without blocking.
    pub fn try_recv(&mut self) -> Option<LoadOutcome> {
        if self.remaining == 0 {
            return None;
        }
        let outcome = self.rx.try_recv().ok()?;
        self.remaining -= 1;
        Some(outcome)
    }

    /// Apply every outcome that has already arrived to `player`, without blocking.
    ///
    /// Returns how many outcomes were applied. Hosts with their own event loop call this once
    /// per tick until [`LoadQueue::remaining`] reaches zero.
    pub fn drain_into<P: Page>(&mut self, player: &mut FramePlayer<P>) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.try_recv() {
            player.on_frame_settled(outcome);
            applied += 1;
        }
        applied
    }
}

impl Iterator for LoadQueue {
    type Item = LoadOutcome;

    fn next(&mut self) -> Option<LoadOutcome> {
        self.recv()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/loader.rs"]
mod tests;
