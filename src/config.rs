//! JSON-facing player configuration.
//!
//! Every field has a default matching the stock hero section, so an empty object `{}` is a
//! valid configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::assets::naming::FrameSource;
use crate::foundation::error::{ScrollReelError, ScrollReelResult};

/// Selectors for the optional UI affordances the player updates.
///
/// Elements that are missing from the page are skipped silently.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AffordanceSelectors {
    /// Loading overlay, hidden once every frame has settled.
    pub loading: String,
    /// Loading progress bar, width tracks settled frames.
    pub loading_progress: String,
    /// "Scroll to explore" hint.
    pub scroll_hint: String,
    /// Scroll progress bar, width tracks playback progress.
    pub scroll_progress: String,
}

impl Default for AffordanceSelectors {
    fn default() -> Self {
        Self {
            loading: ".hero-loading".to_string(),
            loading_progress: ".loading-progress".to_string(),
            scroll_hint: ".scroll-indicator".to_string(),
            scroll_progress: ".scroll-progress".to_string(),
        }
    }
}

/// Complete configuration of a [`crate::FramePlayer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Identifier of the display surface; the player is disabled when it is absent.
    pub canvas_id: String,
    /// Selector of the scroll-tracking container.
    pub scroll_container: String,
    /// Frame naming scheme and source range.
    pub frames: FrameSource,
    /// Optional affordance selectors.
    pub affordances: AffordanceSelectors,
    /// Progress above which the scroll hint is hidden.
    pub scroll_hint_threshold: f64,
    /// Opacity of the scroll hint while it is shown.
    pub scroll_hint_opacity: f64,
    /// Delay between entering the ready state and collapsing the loading overlay.
    pub loading_fade_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            canvas_id: "hero-canvas".to_string(),
            scroll_container: ".hero-scroll-container".to_string(),
            frames: FrameSource::default(),
            affordances: AffordanceSelectors::default(),
            scroll_hint_threshold: 0.05,
            scroll_hint_opacity: 0.7,
            loading_fade_ms: 500,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollReelResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ScrollReelError::serde(format!("parse player config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrollReelError::validation(format!("open player config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> ScrollReelResult<()> {
        if self.canvas_id.trim().is_empty() {
            return Err(ScrollReelError::validation("canvas_id must be non-empty"));
        }
        if self.scroll_container.trim().is_empty() {
            return Err(ScrollReelError::validation(
                "scroll_container must be non-empty",
            ));
        }
        self.frames.validate()?;
        if !(0.0..=1.0).contains(&self.scroll_hint_threshold) {
            return Err(ScrollReelError::validation(
                "scroll_hint_threshold must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.scroll_hint_opacity) {
            return Err(ScrollReelError::validation(
                "scroll_hint_opacity must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Loading overlay fade duration.
    pub fn loading_fade(&self) -> Duration {
        Duration::from_millis(self.loading_fade_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
