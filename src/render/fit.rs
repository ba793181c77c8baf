use crate::foundation::core::{Rect, Size};

/// Which bars a contain fit leaves around the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitBars {
    /// Image and canvas share the same aspect ratio.
    None,
    /// Bars above and below (image relatively wider than the canvas).
    Letterbox,
    /// Bars left and right (image relatively taller than the canvas).
    Pillarbox,
}

/// Placement of an image inside a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainFit {
    /// Destination rectangle in canvas (logical) coordinates.
    pub rect: Rect,
    /// Bars left uncovered.
    pub bars: FitBars,
}

/// Scale `image` to fit entirely inside `canvas`, preserving its aspect ratio and centring it.
///
/// When the image is relatively wider than the canvas, the width constrains; otherwise the
/// height does. Returns `None` when either size has no area or is not finite.
pub fn contain_fit(image: Size, canvas: Size) -> Option<ContainFit> {
    if !has_area(image) || !has_area(canvas) {
        return None;
    }
    let image_aspect = image.width / image.height;
    let canvas_aspect = canvas.width / canvas.height;

    let (draw_w, draw_h, bars) = if image_aspect > canvas_aspect {
        (canvas.width, canvas.width / image_aspect, FitBars::Letterbox)
    } else if image_aspect < canvas_aspect {
        (canvas.height * image_aspect, canvas.height, FitBars::Pillarbox)
    } else {
        (canvas.width, canvas.height, FitBars::None)
    };

    let x = (canvas.width - draw_w) / 2.0;
    let y = (canvas.height - draw_h) / 2.0;
    Some(ContainFit {
        rect: Rect::new(x, y, x + draw_w, y + draw_h),
        bars,
    })
}

fn has_area(s: Size) -> bool {
    s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
