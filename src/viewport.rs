//! Device-pixel-ratio aware surface geometry.

use crate::foundation::core::{Affine, Size};

/// Host viewport as reported by the page: logical size plus device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical (CSS) width.
    pub width: f64,
    /// Logical (CSS) height.
    pub height: f64,
    /// Physical pixels per logical pixel.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Viewport with a device pixel ratio of 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Same viewport with a different device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }
}

/// Current drawing surface geometry.
///
/// Recomputed wholesale on every resize; no history is kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportGeometry {
    /// Effective device pixel ratio (always finite and > 0).
    pub device_pixel_ratio: f64,
    /// Logical width draw calls are expressed in.
    pub logical_width: f64,
    /// Logical height draw calls are expressed in.
    pub logical_height: f64,
    /// Width of the physical pixel buffer.
    pub physical_width: u32,
    /// Height of the physical pixel buffer.
    pub physical_height: u32,
}

impl ViewportGeometry {
    /// Fit a pixel buffer to `logical_width x logical_height` at `dpr`.
    ///
    /// A ratio that is not a positive finite number falls back to 1. Negative or non-finite
    /// logical sizes collapse to 0.
    pub fn fit(logical_width: f64, logical_height: f64, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let logical_width = sanitize_len(logical_width);
        let logical_height = sanitize_len(logical_height);
        Self {
            device_pixel_ratio: dpr,
            logical_width,
            logical_height,
            physical_width: to_physical(logical_width, dpr),
            physical_height: to_physical(logical_height, dpr),
        }
    }

    /// Fit to a host [`Viewport`].
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self::fit(viewport.width, viewport.height, viewport.device_pixel_ratio)
    }

    /// Logical size, the coordinate space of draw calls.
    pub fn logical_size(&self) -> Size {
        Size::new(self.logical_width, self.logical_height)
    }

    /// Uniform logical-to-physical transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio)
    }

    /// Whether the surface has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.physical_width == 0 || self.physical_height == 0
    }
}

impl Default for ViewportGeometry {
    fn default() -> Self {
        Self::fit(0.0, 0.0, 1.0)
    }
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn to_physical(logical: f64, dpr: f64) -> u32 {
    let v = (logical * dpr).round();
    if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    }
}
