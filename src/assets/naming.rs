use crate::foundation::core::FrameRange;
use crate::foundation::error::{ScrollReelError, ScrollReelResult};

/// Minimum number of digits in a frame identifier (`30` -> `"030"`).
pub const FRAME_NUMBER_WIDTH: usize = 3;

/// Largest frame sequence a source may describe.
pub const MAX_FRAMES: usize = 10_000;

/// Naming scheme of a pre-rendered frame sequence.
///
/// Frames are addressed as `/<assets_path>/<prefix>-frame-<NNN>.<extension>`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSource {
    /// Directory of the sequence, relative to the site root.
    pub assets_path: String,
    /// File name prefix.
    pub prefix: String,
    /// File extension without the dot.
    pub extension: String,
    /// First source frame number (inclusive).
    pub start: u32,
    /// Last source frame number (inclusive).
    pub end: u32,
}

impl Default for FrameSource {
    fn default() -> Self {
        Self {
            assets_path: "assets".to_string(),
            prefix: "ezgif".to_string(),
            extension: "jpg".to_string(),
            start: 30,
            end: 192,
        }
    }
}

impl FrameSource {
    /// Validate the naming scheme and its range.
    pub fn validate(&self) -> ScrollReelResult<()> {
        if self.prefix.is_empty() {
            return Err(ScrollReelError::validation("frame prefix must be non-empty"));
        }
        if self.extension.is_empty() || self.extension.contains('.') {
            return Err(ScrollReelError::validation(
                "frame extension must be non-empty and must not contain '.'",
            ));
        }
        let range = self.range()?;
        if range.len() > MAX_FRAMES {
            return Err(ScrollReelError::validation(format!(
                "frame range {}..={} holds {} frames, more than {MAX_FRAMES}",
                self.start,
                self.end,
                range.len()
            )));
        }
        Ok(())
    }

    /// Source frame range.
    pub fn range(&self) -> ScrollReelResult<FrameRange> {
        FrameRange::new(self.start, self.end)
    }

    /// Resource URL of `frame_number`.
    pub fn url_for(&self, frame_number: u32) -> String {
        let dir = self.assets_path.trim_matches('/');
        let file = format!(
            "{}-frame-{}.{}",
            self.prefix,
            frame_id(frame_number),
            self.extension
        );
        if dir.is_empty() {
            format!("/{file}")
        } else {
            format!("/{dir}/{file}")
        }
    }

    /// One request per frame, in ascending frame order.
    pub fn requests(&self) -> ScrollReelResult<Vec<FrameRequest>> {
        self.validate()?;
        let range = self.range()?;
        Ok(range
            .frame_numbers()
            .enumerate()
            .map(|(index, frame_number)| FrameRequest {
                index,
                frame_number,
                url: self.url_for(frame_number),
            })
            .collect())
    }
}

/// A single frame resource request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    /// Slot index in the frame set.
    pub index: usize,
    /// Source frame number.
    pub frame_number: u32,
    /// Resource URL.
    pub url: String,
}

/// Zero-padded frame identifier used in resource names and diagnostics.
pub fn frame_id(frame_number: u32) -> String {
    format!("{frame_number:0width$}", width = FRAME_NUMBER_WIDTH)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/naming.rs"]
mod tests;
