use crate::assets::decode::FrameImage;
use crate::foundation::core::{Affine, Rect, Size};
use crate::foundation::error::ScrollReelResult;

/// A drawing surface the player paints frames onto.
///
/// Mirrors a 2D canvas: a physical pixel buffer, a displayed (layout) size, and a current
/// transform that maps logical draw coordinates into the buffer.
pub trait Surface {
    /// Resize the physical pixel buffer. Contents are discarded.
    fn set_buffer_size(&mut self, width: u32, height: u32) -> ScrollReelResult<()>;
    /// Set the displayed size in logical units.
    fn set_layout_size(&mut self, size: Size);
    /// Replace the current transform (not composed with the previous one).
    fn set_transform(&mut self, transform: Affine);
    /// Clear the whole buffer to transparent.
    fn clear(&mut self);
    /// Draw `image` scaled into `dest`, given in logical coordinates.
    fn draw_image(&mut self, image: &FrameImage, dest: Rect) -> ScrollReelResult<()>;
}

/// A rendered surface buffer as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Convert to straight (non-premultiplied) alpha in place.
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
    }
}

/// One call recorded by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// `set_buffer_size(width, height)`.
    BufferSize(u32, u32),
    /// `set_layout_size(size)`.
    LayoutSize(Size),
    /// `set_transform(transform)`.
    Transform(Affine),
    /// `clear()`.
    Clear,
    /// `draw_image` of an image with the given intrinsic size into `dest`.
    DrawImage {
        /// Intrinsic image width.
        width: u32,
        /// Intrinsic image height.
        height: u32,
        /// Destination rectangle.
        dest: Rect,
    },
}

/// Surface that records calls instead of rasterizing, for tests and debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded calls.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Forget every recorded call.
    pub fn reset(&mut self) {
        self.ops.clear();
    }

    /// Number of recorded image draws.
    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    /// Recorded image draws in call order.
    pub fn draws(&self) -> impl Iterator<Item = &SurfaceOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::DrawImage { .. }))
    }
}

impl Surface for RecordingSurface {
    fn set_buffer_size(&mut self, width: u32, height: u32) -> ScrollReelResult<()> {
        self.ops.push(SurfaceOp::BufferSize(width, height));
        Ok(())
    }

    fn set_layout_size(&mut self, size: Size) {
        self.ops.push(SurfaceOp::LayoutSize(size));
    }

    fn set_transform(&mut self, transform: Affine) {
        self.ops.push(SurfaceOp::Transform(transform));
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn draw_image(&mut self, image: &FrameImage, dest: Rect) -> ScrollReelResult<()> {
        self.ops.push(SurfaceOp::DrawImage {
            width: image.width(),
            height: image.height(),
            dest,
        });
        Ok(())
    }
}
