//! scrollreel is a scroll-scrubbed image-sequence player.
//!
//! A [`FramePlayer`] loads a pre-rendered frame sequence, maps the scroll position inside a
//! scroll-tracking container to a frame index, and paints that frame onto a display surface,
//! contain-fitted and device-pixel-ratio aware.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `FrameSource -> FrameRequest*`, fetched and decoded concurrently into a [`FrameSet`]
//! 2. **Fit**: `Viewport -> ViewportGeometry` (physical buffer, logical size, scale transform)
//! 3. **Map**: `scroll offset + ContainerMetrics -> progress -> frame index`, at most once per refresh
//! 4. **Draw**: `FrameImage + geometry -> contain fit -> Surface`
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single owner**: the player is driven through `&mut self` event methods; only fetching and
//!   decoding run on worker threads, and their outcomes are applied one at a time.
//! - **Degrade, never abort**: missing page elements, failed frames and degenerate geometry each
//!   disable one update instead of failing the player.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;
mod page;
mod player;
mod render;
mod scroll;
mod viewport;

pub use assets::decode::{FrameImage, decode_image};
pub use assets::fetch::{DirFetcher, FrameFetcher, normalize_url_path};
pub use assets::naming::{FRAME_NUMBER_WIDTH, FrameRequest, FrameSource, MAX_FRAMES, frame_id};
pub use config::{AffordanceSelectors, PlayerConfig};
pub use foundation::core::{Affine, FrameRange, Rect, Size};
pub use foundation::error::{ScrollReelError, ScrollReelResult};
pub use page::{ElementState, MemoryPage, Page, StyleChange};
pub use player::loader::{
    FrameSet, LoadOutcome, LoadProgress, LoadQueue, SlotState, load_frame, spawn_loads,
};
pub use player::{FramePlayer, PlaybackState, PlayerState};
pub use render::cpu::CpuSurface;
pub use render::draw::draw_frame;
pub use render::fit::{ContainFit, FitBars, contain_fit};
pub use render::surface::{FrameRGBA, RecordingSurface, Surface, SurfaceOp};
pub use scroll::{
    ContainerMetrics, FrameThrottle, ScrollDisposition, ScrollSample, frame_for_progress, sample,
    scroll_progress,
};
pub use viewport::{Viewport, ViewportGeometry};
