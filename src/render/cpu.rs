use std::path::Path;

use anyhow::Context as _;

use crate::assets::decode::FrameImage;
use crate::foundation::core::{Affine, Rect, Size};
use crate::foundation::error::{ScrollReelError, ScrollReelResult};
use crate::render::surface::{FrameRGBA, Surface};

/// Raster [`Surface`] backed by `vello_cpu`.
///
/// The buffer starts empty (0x0); a zero-area buffer accepts every call and draws nothing.
pub struct CpuSurface {
    buffer: Option<vello_cpu::Pixmap>,
    layout: Size,
    transform: Affine,
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<vello_cpu::Pixmap>,
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("buffer_size", &self.buffer_size())
            .field("layout", &self.layout)
            .field("transform", &self.transform)
            .finish()
    }
}

impl CpuSurface {
    /// Create a surface with an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: None,
            layout: Size::ZERO,
            transform: Affine::IDENTITY,
            ctx: None,
            scratch: None,
        }
    }

    /// Physical buffer size.
    pub fn buffer_size(&self) -> (u32, u32) {
        self.buffer
            .as_ref()
            .map(|p| (u32::from(p.width()), u32::from(p.height())))
            .unwrap_or((0, 0))
    }

    /// Displayed size in logical units.
    pub fn layout_size(&self) -> Size {
        self.layout
    }

    /// Current transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Copy the buffer out as premultiplied RGBA8.
    pub fn snapshot(&self) -> FrameRGBA {
        let (width, height) = self.buffer_size();
        let data = self
            .buffer
            .as_ref()
            .map(|p| p.data_as_u8_slice().to_vec())
            .unwrap_or_default();
        FrameRGBA {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Write the buffer to a PNG file (straight alpha).
    pub fn save_png(&self, path: &Path) -> ScrollReelResult<()> {
        let mut frame = self.snapshot();
        if frame.width == 0 || frame.height == 0 {
            return Err(ScrollReelError::render("surface buffer is empty"));
        }
        frame.unpremultiply();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

impl Surface for CpuSurface {
    fn set_buffer_size(&mut self, width: u32, height: u32) -> ScrollReelResult<()> {
        let w: u16 = width
            .try_into()
            .map_err(|_| ScrollReelError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ScrollReelError::render("surface height exceeds u16"))?;
        self.scratch = None;
        // A canvas resets its transform when the buffer is resized.
        self.transform = Affine::IDENTITY;
        self.buffer = if w == 0 || h == 0 {
            None
        } else {
            Some(vello_cpu::Pixmap::new(w, h))
        };
        Ok(())
    }

    fn set_layout_size(&mut self, size: Size) {
        self.layout = size;
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn clear(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.data_as_u8_slice_mut().fill(0);
        }
    }

    fn draw_image(&mut self, image: &FrameImage, dest: Rect) -> ScrollReelResult<()> {
        let Some((w, h)) = self.buffer.as_ref().map(|b| (b.width(), b.height())) else {
            return Ok(());
        };
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }

        let placement = self.transform
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(
                dest.width() / f64::from(image.width()),
                dest.height() / f64::from(image.height()),
            );
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(image.pixmap().clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let image_w = f64::from(image.width());
        let image_h = f64::from(image.height());

        // `vello_cpu` renders into a fresh buffer, so draw into scratch and composite over.
        let mut scratch = match self.scratch.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        scratch.data_as_u8_slice_mut().fill(0);
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(affine_to_cpu(placement));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, image_w, image_h));
            ctx.flush();
            ctx.render_to_pixmap(&mut scratch);
        });

        let result = match self.buffer.as_mut() {
            Some(buffer) => {
                premul_over_in_place(buffer.data_as_u8_slice_mut(), scratch.data_as_u8_slice())
            }
            None => Ok(()),
        };
        self.scratch = Some(scratch);
        result
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> ScrollReelResult<()> {
    if dst.len() != src.len() {
        return Err(ScrollReelError::render("composite buffer size mismatch"));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - sa;
        for c in 0..4 {
            let v = u16::from(s[c]) + ((u16::from(d[c]) * inv + 127) / 255);
            d[c] = v.min(255) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
