use crate::assets::decode::FrameImage;
use crate::foundation::core::Size;
use crate::foundation::error::ScrollReelResult;
use crate::render::fit::{ContainFit, contain_fit};
use crate::render::surface::Surface;
use crate::viewport::ViewportGeometry;

/// Clear `surface` and draw `image` contain-fitted into the logical canvas.
///
/// Returns the placement used, or `None` when the canvas or image has no area (the surface is
/// still cleared). Drawing the same image at the same geometry is idempotent.
pub fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &ViewportGeometry,
    image: &FrameImage,
) -> ScrollReelResult<Option<ContainFit>> {
    surface.clear();
    let image_size = Size::new(f64::from(image.width()), f64::from(image.height()));
    let Some(fit) = contain_fit(image_size, geometry.logical_size()) else {
        return Ok(None);
    };
    surface.draw_image(image, fit.rect)?;
    Ok(Some(fit))
}
