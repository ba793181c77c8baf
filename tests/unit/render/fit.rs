use super::*;

const EPS: f64 = 1e-9;

fn assert_aspect_and_centre(image: Size, canvas: Size, fit: ContainFit) {
    let r = fit.rect;
    assert!((r.width() / r.height() - image.width / image.height).abs() < EPS);
    assert!((r.x0 - (canvas.width - r.width()) / 2.0).abs() < EPS);
    assert!((r.y0 - (canvas.height - r.height()) / 2.0).abs() < EPS);
    assert!(r.x0 >= -EPS && r.y0 >= -EPS);
    assert!(r.x1 <= canvas.width + EPS && r.y1 <= canvas.height + EPS);
}

#[test]
fn wide_image_in_square_canvas_is_letterboxed() {
    let image = Size::new(1920.0, 1080.0);
    let canvas = Size::new(1000.0, 1000.0);
    let fit = contain_fit(image, canvas).unwrap();
    assert_eq!(fit.bars, FitBars::Letterbox);
    assert_eq!(fit.rect.width(), 1000.0);
    assert!((fit.rect.height() - 562.5).abs() < EPS);
    assert!((fit.rect.y0 - 218.75).abs() < EPS);
    assert_eq!(fit.rect.x0, 0.0);
    assert_aspect_and_centre(image, canvas, fit);
}

#[test]
fn tall_image_in_landscape_canvas_is_pillarboxed() {
    let image = Size::new(1080.0, 1920.0);
    let canvas = Size::new(1280.0, 720.0);
    let fit = contain_fit(image, canvas).unwrap();
    assert_eq!(fit.bars, FitBars::Pillarbox);
    assert_eq!(fit.rect.height(), 720.0);
    assert!((fit.rect.width() - 405.0).abs() < EPS);
    assert!((fit.rect.x0 - 437.5).abs() < EPS);
    assert_aspect_and_centre(image, canvas, fit);
}

#[test]
fn matching_aspect_fills_canvas() {
    let fit = contain_fit(Size::new(160.0, 90.0), Size::new(1280.0, 720.0)).unwrap();
    assert_eq!(fit.bars, FitBars::None);
    assert_eq!(fit.rect, Rect::new(0.0, 0.0, 1280.0, 720.0));
}

#[test]
fn aspect_and_centre_hold_across_shapes() {
    for (iw, ih) in [(1.0, 1.0), (3.0, 7.0), (1920.0, 1080.0), (500.0, 499.0)] {
        for (cw, ch) in [(320.0, 480.0), (1366.0, 768.0), (101.0, 99.0)] {
            let image = Size::new(iw, ih);
            let canvas = Size::new(cw, ch);
            assert_aspect_and_centre(image, canvas, contain_fit(image, canvas).unwrap());
        }
    }
}

#[test]
fn degenerate_sizes_have_no_fit() {
    assert!(contain_fit(Size::new(0.0, 10.0), Size::new(10.0, 10.0)).is_none());
    assert!(contain_fit(Size::new(10.0, 10.0), Size::new(10.0, 0.0)).is_none());
    assert!(contain_fit(Size::new(f64::NAN, 10.0), Size::new(10.0, 10.0)).is_none());
}
