//! The frame player: loading, viewport fitting, scroll mapping and drawing composed into one
//! owned, event-driven object.
//!
//! The host forwards its events to explicit methods:
//!
//! | host event                     | method                                   |
//! |--------------------------------|------------------------------------------|
//! | page ready                     | [`FramePlayer::mount`]                   |
//! | start fetching frames          | [`FramePlayer::start_loading`]           |
//! | one frame fetched / failed     | [`FramePlayer::on_frame_settled`]        |
//! | window resized                 | [`FramePlayer::on_resize`]               |
//! | scroll                         | [`FramePlayer::on_scroll`]               |
//! | animation-frame callback       | [`FramePlayer::on_animation_frame`]      |
//! | loading fade elapsed           | [`FramePlayer::finish_loading_fade`]     |
//!
//! All methods take `&mut self` and run on the host's single logical thread; only frame
//! fetching and decoding happen elsewhere.

/// Concurrent frame loading and the frame set.
pub mod loader;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::assets::fetch::FrameFetcher;
use crate::assets::naming::FrameRequest;
use crate::config::PlayerConfig;
use crate::foundation::error::ScrollReelResult;
use crate::page::{Page, StyleChange};
use crate::render::draw::draw_frame;
use crate::render::surface::Surface;
use crate::scroll::{FrameThrottle, ScrollDisposition, ScrollSample, sample};
use crate::viewport::ViewportGeometry;

use self::loader::{FrameSet, LoadOutcome, LoadProgress, LoadQueue, spawn_loads};

/// Lifecycle of a [`FramePlayer`]. There is no way back from `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Mounted, surface fitted, no requests issued yet.
    Constructing,
    /// Requests issued, waiting for every frame to settle.
    Loading,
    /// Every frame settled; the scroll-driven redraw loop is live.
    Ready,
}

/// Playback bookkeeping owned by the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaybackState {
    /// Index of the frame last selected by scroll (0 until the first update).
    pub current_frame: usize,
    /// Scroll offset of the most recent scroll event.
    pub last_scroll_offset: f64,
    throttle: FrameThrottle,
    hint_visible: bool,
}

impl PlaybackState {
    /// Whether a frame update is scheduled but has not run yet.
    pub fn is_update_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    /// Whether the scroll hint is currently shown.
    pub fn is_hint_visible(&self) -> bool {
        self.hint_visible
    }
}

/// Scroll-scrubbed image-sequence player bound to one page and one display surface.
pub struct FramePlayer<P: Page> {
    config: PlayerConfig,
    page: P,
    surface: P::Surface,
    frames: FrameSet,
    geometry: ViewportGeometry,
    playback: PlaybackState,
    state: PlayerState,
}

impl<P: Page> std::fmt::Debug for FramePlayer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("state", &self.state)
            .field("geometry", &self.geometry)
            .field("playback", &self.playback)
            .field("progress", &self.frames.progress())
            .finish()
    }
}

impl<P: Page> FramePlayer<P> {
    /// Mount a player on `page`.
    ///
    /// Fails only on an invalid configuration. A page without the configured display surface
    /// yields `Ok(None)`: the player is disabled and the rest of the page is unaffected.
    pub fn mount(config: PlayerConfig, mut page: P) -> ScrollReelResult<Option<Self>> {
        config.validate()?;
        let Some(surface) = page.take_surface(&config.canvas_id) else {
            debug!(canvas_id = %config.canvas_id, "display surface absent, frame player disabled");
            return Ok(None);
        };
        let frames = FrameSet::new(config.frames.range()?);

        let mut player = Self {
            config,
            page,
            surface,
            frames,
            geometry: ViewportGeometry::default(),
            playback: PlaybackState::default(),
            state: PlayerState::Constructing,
        };
        player.on_resize();
        player.update_loading_progress();
        debug!(frames = player.frames.len(), "frame player mounted");
        Ok(Some(player))
    }

    /// Issue every frame request through `fetcher` and enter [`PlayerState::Loading`].
    ///
    /// Feed each outcome from the returned queue to [`FramePlayer::on_frame_settled`].
    pub fn start_loading(&mut self, fetcher: Arc<dyn FrameFetcher>) -> LoadQueue {
        let requests = self.begin_loading();
        spawn_loads(fetcher, requests)
    }

    /// Enter [`PlayerState::Loading`] and return the requests for a host-driven fetch.
    pub fn begin_loading(&mut self) -> Vec<FrameRequest> {
        if self.state == PlayerState::Constructing {
            self.state = PlayerState::Loading;
        }
        self.config
            .frames
            .requests()
            .unwrap_or_else(|e| {
                // The range was validated at mount; keep the player usable regardless.
                warn!(error = %e, "could not build frame requests");
                Vec::new()
            })
    }

    /// Apply one load outcome. Becomes ready once every frame has settled.
    pub fn on_frame_settled(&mut self, outcome: LoadOutcome) {
        let frame = outcome.frame_id();
        let index = outcome.index;
        let image = match outcome.result {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(%frame, error = %e, "failed to load frame");
                None
            }
        };
        if !self.frames.settle(index, image) {
            debug!(index, "ignoring outcome for unknown or settled slot");
            return;
        }
        self.update_loading_progress();
        if self.frames.is_settled() && self.state != PlayerState::Ready {
            self.become_ready();
        }
    }

    /// Collapse the loading overlay once its fade has run. No-op before [`PlayerState::Ready`].
    pub fn finish_loading_fade(&mut self) {
        if self.state != PlayerState::Ready {
            return;
        }
        self.page.apply(&self.config.affordances.loading, StyleChange::Hide);
    }

    /// Refit the surface to the current viewport and redraw the current frame if it is loaded.
    ///
    /// A surface that rejects the new buffer size keeps its previous geometry.
    pub fn on_resize(&mut self) {
        let geometry = ViewportGeometry::from_viewport(self.page.viewport());
        if let Err(e) = self
            .surface
            .set_buffer_size(geometry.physical_width, geometry.physical_height)
        {
            warn!(
                width = geometry.physical_width,
                height = geometry.physical_height,
                error = %e,
                "could not resize display surface, keeping previous geometry"
            );
            return;
        }
        self.geometry = geometry;
        self.surface.set_layout_size(self.geometry.logical_size());
        self.surface.set_transform(self.geometry.transform());

        let current = self.playback.current_frame;
        if self.frames.is_loaded(current) {
            self.draw_frame(current);
        }
    }

    /// Record a scroll event.
    ///
    /// On [`ScrollDisposition::Scheduled`] the host must call
    /// [`FramePlayer::on_animation_frame`] at its next display refresh; coalesced events only
    /// update the recorded offset.
    pub fn on_scroll(&mut self, scroll_offset: f64) -> ScrollDisposition {
        self.playback.last_scroll_offset = scroll_offset;
        if self.playback.throttle.request() {
            ScrollDisposition::Scheduled
        } else {
            ScrollDisposition::Coalesced
        }
    }

    /// Run the update scheduled by [`FramePlayer::on_scroll`].
    pub fn on_animation_frame(&mut self) {
        self.playback.throttle.complete();
        self.update_frame();
    }

    /// Map the last scroll offset to a frame and redraw if the frame changed.
    ///
    /// Does nothing while the scroll container is absent or has no height.
    pub fn update_frame(&mut self) {
        let Some(s) = self.current_sample() else {
            return;
        };

        if s.frame != self.playback.current_frame {
            self.playback.current_frame = s.frame;
            self.draw_frame(s.frame);
            self.update_scroll_progress(s.progress);
        }

        if self.state == PlayerState::Ready {
            self.sync_scroll_hint(s.progress);
        }
    }

    /// Draw frame `index`. Returns `false` (drawing nothing) when the frame is not loaded.
    pub fn draw_frame(&mut self, index: usize) -> bool {
        let Some(image) = self.frames.image(index) else {
            return false;
        };
        match draw_frame(&mut self.surface, &self.geometry, image) {
            Ok(_) => true,
            Err(e) => {
                warn!(index, error = %e, "failed to draw frame");
                false
            }
        }
    }

    /// Lifecycle state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Index of the currently selected frame.
    pub fn current_frame(&self) -> usize {
        self.playback.current_frame
    }

    /// Playback bookkeeping.
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Aggregate load counters.
    pub fn progress(&self) -> LoadProgress {
        self.frames.progress()
    }

    /// The frame set.
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Current surface geometry.
    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    /// Active configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The page the player is mounted on.
    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access to the page, e.g. to change its viewport before [`Self::on_resize`].
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// The display surface.
    pub fn surface(&self) -> &P::Surface {
        &self.surface
    }

    /// Tear the player down, handing back the page and its surface.
    pub fn into_parts(self) -> (P, P::Surface) {
        (self.page, self.surface)
    }

    fn become_ready(&mut self) {
        self.state = PlayerState::Ready;
        let progress = self.frames.progress();
        info!(
            loaded = progress.loaded,
            failed = progress.failed,
            total = progress.total,
            "all frames settled"
        );

        self.page
            .apply(&self.config.affordances.loading, StyleChange::AddClass("hidden"));
        self.draw_frame(self.playback.current_frame);

        let hint_progress = self.current_sample().map(|s| s.progress).unwrap_or(0.0);
        self.sync_scroll_hint(hint_progress);
    }

    fn current_sample(&self) -> Option<ScrollSample> {
        let container = self.page.container_metrics(&self.config.scroll_container)?;
        sample(
            self.playback.last_scroll_offset,
            container,
            self.frames.len(),
        )
    }

    fn update_loading_progress(&mut self) {
        let percent = self.frames.progress().percent();
        self.page.apply(
            &self.config.affordances.loading_progress,
            StyleChange::WidthPercent(percent),
        );
    }

    fn update_scroll_progress(&mut self, progress: f64) {
        let selector = &self.config.affordances.scroll_progress;
        if !self
            .page
            .apply(selector, StyleChange::WidthPercent(progress * 100.0))
        {
            return;
        }
        let class = if progress > 0.0 && progress < 1.0 {
            StyleChange::AddClass("visible")
        } else {
            StyleChange::RemoveClass("visible")
        };
        self.page.apply(selector, class);
    }

    fn sync_scroll_hint(&mut self, progress: f64) {
        let visible = progress <= self.config.scroll_hint_threshold;
        if visible == self.playback.hint_visible {
            return;
        }
        self.playback.hint_visible = visible;
        let opacity = if visible {
            self.config.scroll_hint_opacity
        } else {
            0.0
        };
        self.page.apply(
            &self.config.affordances.scroll_hint,
            StyleChange::Opacity(opacity),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/player.rs"]
mod tests;
