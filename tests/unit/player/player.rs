use super::*;
use crate::assets::decode::FrameImage;
use crate::foundation::core::{Affine, Rect, Size};
use crate::foundation::error::ScrollReelError;
use crate::page::MemoryPage;
use crate::render::surface::{RecordingSurface, SurfaceOp};
use crate::scroll::ContainerMetrics;
use crate::viewport::Viewport;

type TestPlayer = FramePlayer<MemoryPage<RecordingSurface>>;

const CONTAINER: &str = ".hero-scroll-container";

fn page() -> MemoryPage<RecordingSurface> {
    MemoryPage::new(Viewport::new(1280.0, 720.0))
        .with_surface("hero-canvas", RecordingSurface::new())
        .with_container(
            CONTAINER,
            ContainerMetrics {
                top: 0.0,
                height: 1000.0,
            },
        )
        .with_element(".hero-loading")
        .with_element(".loading-progress")
        .with_element(".scroll-indicator")
        .with_element(".scroll-progress")
}

fn outcome(index: usize, ok: bool) -> LoadOutcome {
    LoadOutcome {
        index,
        frame_number: 30 + index as u32,
        result: if ok {
            FrameImage::solid(16, 9, [200, 120, 40, 255])
        } else {
            Err(ScrollReelError::load("connection reset"))
        },
    }
}

fn mounted() -> TestPlayer {
    FramePlayer::mount(PlayerConfig::default(), page())
        .unwrap()
        .unwrap()
}

fn ready_player(failed: &[usize]) -> TestPlayer {
    let mut p = mounted();
    let requests = p.begin_loading();
    for r in requests {
        p.on_frame_settled(outcome(r.index, !failed.contains(&r.index)));
    }
    assert_eq!(p.state(), PlayerState::Ready);
    p
}

fn scroll_to(p: &mut TestPlayer, offset: f64) {
    if p.on_scroll(offset) == ScrollDisposition::Scheduled {
        p.on_animation_frame();
    }
}

fn element<'a>(p: &'a TestPlayer, selector: &str) -> &'a crate::page::ElementState {
    p.page().element(selector).unwrap()
}

#[test]
fn missing_surface_disables_player() {
    let page: MemoryPage<RecordingSurface> = MemoryPage::new(Viewport::new(10.0, 10.0));
    assert!(
        FramePlayer::mount(PlayerConfig::default(), page)
            .unwrap()
            .is_none()
    );
}

#[test]
fn invalid_config_is_an_error() {
    let cfg = PlayerConfig {
        scroll_hint_threshold: -1.0,
        ..PlayerConfig::default()
    };
    assert!(FramePlayer::mount(cfg, page()).is_err());
}

#[test]
fn mount_fits_surface_and_resets_progress_bar() {
    let p = mounted();
    assert_eq!(p.state(), PlayerState::Constructing);
    assert_eq!(p.frames().len(), 163);
    assert_eq!(
        p.surface().ops(),
        &[
            SurfaceOp::BufferSize(1280, 720),
            SurfaceOp::LayoutSize(Size::new(1280.0, 720.0)),
            SurfaceOp::Transform(Affine::scale(1.0)),
        ]
    );
    assert_eq!(element(&p, ".loading-progress").width_percent, Some(0.0));
}

#[test]
fn ready_hides_loader_draws_first_frame_and_shows_hint() {
    let mut p = mounted();
    let requests = p.begin_loading();
    assert_eq!(p.state(), PlayerState::Loading);
    assert_eq!(requests.len(), 163);

    for r in &requests[..162] {
        p.on_frame_settled(outcome(r.index, true));
    }
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(!element(&p, ".hero-loading").has_class("hidden"));

    p.on_frame_settled(outcome(162, true));
    assert_eq!(p.state(), PlayerState::Ready);
    assert!(element(&p, ".hero-loading").has_class("hidden"));
    assert!(element(&p, ".hero-loading").displayed);
    assert_eq!(element(&p, ".loading-progress").width_percent, Some(100.0));
    assert_eq!(element(&p, ".scroll-indicator").opacity, Some(0.7));
    assert_eq!(p.surface().draw_count(), 1);

    p.finish_loading_fade();
    assert!(!element(&p, ".hero-loading").displayed);
}

#[test]
fn loading_fade_is_ignored_before_ready() {
    let mut p = mounted();
    p.begin_loading();
    p.finish_loading_fade();
    assert!(element(&p, ".hero-loading").displayed);
}

#[test]
fn halfway_scroll_selects_frame_81() {
    let mut p = ready_player(&[]);
    scroll_to(&mut p, 500.0);
    assert_eq!(p.current_frame(), 81);
    assert_eq!(p.surface().draw_count(), 2);
    assert_eq!(element(&p, ".scroll-progress").width_percent, Some(50.0));
    assert!(element(&p, ".scroll-progress").has_class("visible"));
    assert_eq!(element(&p, ".scroll-indicator").opacity, Some(0.0));
}

#[test]
fn scrolling_above_container_stays_on_first_frame_with_hint() {
    let mut p = ready_player(&[]);
    scroll_to(&mut p, -50.0);
    assert_eq!(p.current_frame(), 0);
    assert_eq!(p.surface().draw_count(), 1);
    assert!(p.playback().is_hint_visible());
    assert_eq!(element(&p, ".scroll-indicator").opacity, Some(0.7));
}

#[test]
fn hint_returns_when_scrolling_back_to_top() {
    let mut p = ready_player(&[]);
    scroll_to(&mut p, 300.0);
    assert!(!p.playback().is_hint_visible());
    scroll_to(&mut p, 10.0);
    assert!(p.playback().is_hint_visible());
    assert_eq!(element(&p, ".scroll-indicator").opacity, Some(0.7));
}

#[test]
fn hint_threshold_is_independent_of_frame_changes() {
    let mut p = ready_player(&[]);
    // 0.04 * 162 = 6.48 -> frame 6, hint still shown.
    scroll_to(&mut p, 40.0);
    assert_eq!(p.current_frame(), 6);
    assert!(p.playback().is_hint_visible());
    // 0.06 * 162 = 9.72 -> frame 9, hint hidden.
    scroll_to(&mut p, 60.0);
    assert_eq!(p.current_frame(), 9);
    assert!(!p.playback().is_hint_visible());
}

#[test]
fn failed_frame_still_reaches_ready_and_draws_as_noop() {
    let mut p = ready_player(&[3]);
    let progress = p.progress();
    assert_eq!(progress.settled(), 163);
    assert_eq!(progress.loaded, 162);
    assert_eq!(progress.failed, 1);
    assert_eq!(p.frames().failed_frames(), vec![33]);

    let before = p.surface().draw_count();
    assert!(!p.draw_frame(3));
    assert_eq!(p.surface().draw_count(), before);
    for i in [0usize, 2, 4, 81, 162] {
        assert!(p.draw_frame(i), "frame {i}");
    }
    assert!(!p.draw_frame(163));
}

#[test]
fn zero_height_container_retains_frame() {
    let mut p = ready_player(&[]);
    scroll_to(&mut p, 500.0);
    assert_eq!(p.current_frame(), 81);
    let draws = p.surface().draw_count();

    p.page_mut().set_container(
        CONTAINER,
        Some(ContainerMetrics {
            top: 0.0,
            height: 0.0,
        }),
    );
    for offset in [0.0, 250.0, 900.0, 5000.0] {
        scroll_to(&mut p, offset);
        assert_eq!(p.current_frame(), 81);
    }
    assert_eq!(p.surface().draw_count(), draws);
}

#[test]
fn missing_container_makes_mapper_a_noop() {
    let mut p = ready_player(&[]);
    p.page_mut().set_container(CONTAINER, None);
    scroll_to(&mut p, 700.0);
    assert_eq!(p.current_frame(), 0);
    assert_eq!(p.surface().draw_count(), 1);
}

#[test]
fn scroll_events_coalesce_until_animation_frame() {
    let mut p = ready_player(&[]);
    assert_eq!(p.on_scroll(100.0), ScrollDisposition::Scheduled);
    assert_eq!(p.on_scroll(200.0), ScrollDisposition::Coalesced);
    assert_eq!(p.on_scroll(500.0), ScrollDisposition::Coalesced);
    assert!(p.playback().is_update_pending());

    p.on_animation_frame();
    assert!(!p.playback().is_update_pending());
    // Only the latest offset of the window is applied, with a single redraw.
    assert_eq!(p.current_frame(), 81);
    assert_eq!(p.surface().draw_count(), 2);

    assert_eq!(p.on_scroll(510.0), ScrollDisposition::Scheduled);
}

#[test]
fn identical_frame_index_triggers_no_redraw() {
    let mut p = ready_player(&[]);
    scroll_to(&mut p, 500.0);
    let draws = p.surface().draw_count();
    // Sub-frame jitter: 500.0..500.5 all map to frame 81.
    for offset in [500.1, 500.2, 500.4, 500.0] {
        scroll_to(&mut p, offset);
    }
    assert_eq!(p.surface().draw_count(), draws);
}

#[test]
fn resize_refits_and_redraws_current_frame() {
    let mut p = ready_player(&[]);
    scroll_to(&mut p, 500.0);
    let draws = p.surface().draw_count();

    p.page_mut()
        .set_viewport(Viewport::new(800.0, 600.0).with_device_pixel_ratio(2.0));
    p.on_resize();
    assert_eq!(p.geometry().physical_width, 1600);
    assert_eq!(p.geometry().physical_height, 1200);
    assert_eq!(p.surface().draw_count(), draws + 1);

    let ops = p.surface().ops();
    let tail = &ops[ops.len() - 5..];
    assert_eq!(tail[0], SurfaceOp::BufferSize(1600, 1200));
    assert_eq!(tail[1], SurfaceOp::LayoutSize(Size::new(800.0, 600.0)));
    assert_eq!(tail[2], SurfaceOp::Transform(Affine::scale(2.0)));
    assert_eq!(tail[3], SurfaceOp::Clear);
    // 16:9 frame in a 4:3 canvas: full width, centred vertically.
    assert_eq!(
        tail[4],
        SurfaceOp::DrawImage {
            width: 16,
            height: 9,
            dest: Rect::new(0.0, 75.0, 800.0, 525.0),
        }
    );
}

#[test]
fn resize_before_load_does_not_draw() {
    let mut p = mounted();
    p.on_resize();
    assert_eq!(p.surface().draw_count(), 0);
}

#[test]
fn scroll_during_loading_is_drawn_at_ready() {
    let mut p = mounted();
    let requests = p.begin_loading();
    scroll_to(&mut p, 500.0);
    assert_eq!(p.current_frame(), 81);
    assert_eq!(p.surface().draw_count(), 0);
    // The hint is only managed once ready.
    assert_eq!(element(&p, ".scroll-indicator").opacity, None);

    for r in requests {
        p.on_frame_settled(outcome(r.index, true));
    }
    assert_eq!(p.surface().draw_count(), 1);
    assert!(!p.playback().is_hint_visible());
}

#[test]
fn duplicate_outcomes_are_ignored() {
    let mut p = mounted();
    p.begin_loading();
    p.on_frame_settled(outcome(0, true));
    p.on_frame_settled(outcome(0, false));
    p.on_frame_settled(outcome(999, true));
    assert_eq!(p.progress().settled(), 1);
    assert_eq!(p.progress().failed, 0);
}

#[test]
fn single_frame_sequence_always_uses_index_zero() {
    let mut cfg = PlayerConfig::default();
    cfg.frames.start = 5;
    cfg.frames.end = 5;
    let mut p = FramePlayer::mount(cfg, page()).unwrap().unwrap();
    for r in p.begin_loading() {
        p.on_frame_settled(outcome(r.index, true));
    }
    assert_eq!(p.state(), PlayerState::Ready);
    for offset in [-10.0, 0.0, 400.0, 1000.0, 99999.0] {
        scroll_to(&mut p, offset);
        assert_eq!(p.current_frame(), 0);
    }
    assert_eq!(p.surface().draw_count(), 1);
}

#[test]
fn absent_affordances_do_not_block_playback() {
    let bare = MemoryPage::new(Viewport::new(640.0, 360.0))
        .with_surface("hero-canvas", RecordingSurface::new())
        .with_container(
            CONTAINER,
            ContainerMetrics {
                top: 100.0,
                height: 1000.0,
            },
        );
    let mut p = FramePlayer::mount(PlayerConfig::default(), bare)
        .unwrap()
        .unwrap();
    for r in p.begin_loading() {
        p.on_frame_settled(outcome(r.index, true));
    }
    scroll_to(&mut p, 1100.0);
    assert_eq!(p.current_frame(), 162);
    assert_eq!(p.surface().draw_count(), 2);
}

#[test]
fn into_parts_returns_page_and_surface() {
    let p = ready_player(&[]);
    let (page, surface) = p.into_parts();
    assert!(page.element(".hero-loading").is_some());
    assert_eq!(surface.draw_count(), 1);
}
