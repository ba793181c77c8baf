use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ScrollReelError, ScrollReelResult};

/// A decoded frame ready to be painted.
///
/// Pixels are stored once, premultiplied, in the raster backend's native pixmap so repeated
/// draws of the same frame never re-convert. Clones share the pixel buffer.
#[derive(Clone)]
pub struct FrameImage {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for FrameImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixmap_ptr", &Arc::as_ptr(&self.pixmap))
            .finish()
    }
}

impl FrameImage {
    /// Build an image from premultiplied, row-major RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: &[u8]) -> ScrollReelResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            width,
            height,
            pixmap: Arc::new(pixmap),
        })
    }

    /// A uniformly coloured image. `rgba` is straight (non-premultiplied) alpha.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ScrollReelResult<Self> {
        let px = premul_rgba8(rgba);
        let len = (width as usize).saturating_mul(height as usize);
        let bytes: Vec<u8> = std::iter::repeat_n(px, len).flatten().collect();
        Self::from_premul_rgba8(width, height, &bytes)
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn pixmap(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.pixmap
    }
}

/// Decode encoded image bytes (JPEG, PNG, ...) into a [`FrameImage`].
pub fn decode_image(bytes: &[u8]) -> ScrollReelResult<FrameImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ScrollReelError::load("decoded image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    FrameImage::from_premul_rgba8(width, height, &rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ScrollReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrollReelError::load("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrollReelError::load("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ScrollReelError::load("image byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
