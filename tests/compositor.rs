use image::RgbaImage;
use shadowvg::color::{BLACK, RGBA8, TRANSPARENT};
use shadowvg::math::{rect_i32, Padding, PointI32, RectI32};
use shadowvg::{
    Canvas, ContentHost, DirtyState, ShadowCompositor, ShadowParameters, SpreadExtents, MIN_RADIUS,
};

const RED: RGBA8 = RGBA8::new(255, 0, 0, 255);

/// Paints a single opaque rectangle and records every call it receives.
struct CardHost {
    card: RectI32,
    fill: RGBA8,
    renders: usize,
    relayouts: Vec<Padding>,
}

impl CardHost {
    fn new(card: RectI32) -> Self {
        Self {
            card,
            fill: RED,
            renders: 0,
            relayouts: Vec::new(),
        }
    }
}

impl ContentHost for CardHost {
    fn render_content_into(&mut self, canvas: &mut Canvas<'_>) {
        self.renders += 1;
        canvas.fill_rect(self.card, self.fill);
    }

    fn request_relayout(&mut self, padding: Padding) {
        self.relayouts.push(padding);
    }
}

fn sharp_shadow(offset: f32, color: RGBA8) -> ShadowParameters {
    ShadowParameters::builder()
        .radius(MIN_RADIUS)
        .offset(offset, offset)
        .spread(0.0)
        .color(color)
        .build()
}

fn draw_to_image(compositor: &mut ShadowCompositor<CardHost>, width: u32, height: u32) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    compositor.draw(&mut Canvas::new(&mut image));
    image
}

fn alpha(image: &RgbaImage, x: u32, y: u32) -> u8 {
    image.get_pixel(x, y).0[3]
}

#[test]
fn radius_is_clamped_to_the_floor() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 1, 1)));

    for radius in [0.0, -3.0, 0.01] {
        compositor.set_radius(radius);
        assert_eq!(compositor.radius(), MIN_RADIUS);
    }

    let compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(0, 0, 1, 1)),
        ShadowParameters {
            radius: -10.0,
            ..Default::default()
        },
    );
    assert_eq!(compositor.radius(), MIN_RADIUS);
}

#[test]
fn zero_offset_couples_the_other_axis() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 1, 1)));
    compositor.set_spread(4.0);

    compositor.set_offset_x(0.0);
    compositor.set_offset_y(10.0);
    assert_eq!(compositor.spread_extents().height, 4);
    assert_eq!(compositor.spread_extents().width, 8);

    compositor.set_offset_x(3.0);
    assert_eq!(compositor.spread_extents(), SpreadExtents { width: 8, height: 8 });
}

#[test]
fn construction_reports_padding_to_the_host() {
    let compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 1, 1)));

    // 15 offset + 30 radius on every side.
    assert_eq!(compositor.padding(), Padding::new_all_same(45));
    assert_eq!(compositor.host().relayouts, vec![Padding::new_all_same(45)]);
}

#[test]
fn padding_changes_request_a_relayout() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 1, 1)));

    compositor.set_offset_x(50.0);
    assert_eq!(compositor.padding(), Padding::new(45, 80, 45, 80));
    assert_eq!(compositor.host().relayouts.last(), Some(&Padding::new(45, 80, 45, 80)));

    let requests = compositor.host().relayouts.len();
    compositor.set_color(BLACK);
    compositor.set_enabled(false);
    assert_eq!(compositor.host().relayouts.len(), requests);
}

#[test]
fn set_parameters_requests_at_most_one_relayout() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 1, 1)));
    let requests = compositor.host().relayouts.len();

    compositor.set_parameters(
        ShadowParameters::builder()
            .radius(4.0)
            .offset(-2.0, 6.0)
            .spread(3.0)
            .build(),
    );

    assert_eq!(compositor.host().relayouts.len(), requests + 1);
    assert_eq!(compositor.padding(), Padding::new(16, 12, 16, 12));
}

#[test]
fn setting_current_values_keeps_the_cache_clean() {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(10, 10, 30, 30)),
        sharp_shadow(5.0, BLACK),
    );
    compositor.on_bounds_changed(60, 60);
    draw_to_image(&mut compositor, 60, 60);
    assert_eq!(compositor.dirty_state(), DirtyState::Clean);

    let padding = compositor.padding();
    let requests = compositor.host().relayouts.len();

    compositor.set_enabled(compositor.enabled());
    compositor.set_radius(compositor.radius());
    compositor.set_offset_x(compositor.offset_x());
    compositor.set_offset_y(compositor.offset_y());
    compositor.set_spread(compositor.spread());
    compositor.set_color(compositor.color());
    compositor.set_parameters(*compositor.parameters());
    compositor.on_bounds_changed(60, 60);

    assert_eq!(compositor.dirty_state(), DirtyState::Clean);
    assert_eq!(compositor.padding(), padding);
    assert_eq!(compositor.host().relayouts.len(), requests);
}

#[test]
fn every_trigger_dirties_the_cache() {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(10, 10, 30, 30)),
        sharp_shadow(5.0, BLACK),
    );
    compositor.on_bounds_changed(60, 60);

    let triggers: [fn(&mut ShadowCompositor<CardHost>); 9] = [
        |c| c.set_radius(7.0),
        |c| c.set_offset_x(-4.0),
        |c| c.set_offset_y(9.0),
        |c| c.set_spread(2.0),
        |c| c.set_color(RGBA8::new(0, 0, 255, 90)),
        |c| c.set_enabled(false),
        |c| c.on_bounds_changed(61, 60),
        |c| c.invalidate_content(),
        |c| c.release(),
    ];

    for trigger in triggers {
        compositor.set_enabled(true);
        draw_to_image(&mut compositor, 64, 64);
        assert!(!compositor.is_dirty());

        // Reading never dirties.
        let _ = (compositor.radius(), compositor.padding(), compositor.bounds());
        assert!(!compositor.is_dirty());

        trigger(&mut compositor);
        assert!(compositor.is_dirty());
    }
}

#[test]
fn zero_bounds_install_a_placeholder_until_content_has_a_size() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 200, 100)));

    compositor.on_bounds_changed(0, 0);
    draw_to_image(&mut compositor, 10, 10);

    assert!(compositor.has_placeholder_shadow());
    assert!(compositor.is_dirty());
    assert_eq!(compositor.pipeline_runs(), 0);
    // Only the live content was rendered; the off-screen capture was skipped.
    assert_eq!(compositor.host().renders, 1);

    compositor.on_bounds_changed(200, 100);
    draw_to_image(&mut compositor, 300, 200);

    assert!(!compositor.has_placeholder_shadow());
    assert_eq!(compositor.pipeline_runs(), 1);
    assert_eq!(compositor.dirty_state(), DirtyState::Clean);
}

#[test]
fn repeated_draws_run_the_pipeline_once() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(20, 20, 80, 40)));
    compositor.on_bounds_changed(120, 80);

    for _ in 0..5 {
        draw_to_image(&mut compositor, 120, 80);
    }

    assert_eq!(compositor.pipeline_runs(), 1);
    // Five live renders plus a single off-screen capture.
    assert_eq!(compositor.host().renders, 6);
}

#[test]
fn shadow_uses_color_alpha_while_content_stays_opaque() {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(20, 20, 40, 40)),
        sharp_shadow(30.0, RGBA8::new(0, 0, 0, 128)),
    );
    compositor.on_bounds_changed(100, 100);

    let image = draw_to_image(&mut compositor, 100, 100);

    // Inside the shadow, outside of the card.
    assert_eq!(image.get_pixel(70, 70).0, [0, 0, 0, 128]);
    // Card pixels over the shadow and away from it.
    assert_eq!(image.get_pixel(55, 55).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(25, 25).0, [255, 0, 0, 255]);
    // Nothing outside of both.
    assert_eq!(image.get_pixel(5, 5).0, [0; 4]);
}

#[test]
fn invisible_shadow_color_draws_no_shadow() {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(20, 20, 40, 40)),
        sharp_shadow(30.0, TRANSPARENT),
    );
    compositor.on_bounds_changed(100, 100);

    let image = draw_to_image(&mut compositor, 100, 100);

    assert_eq!(alpha(&image, 70, 70), 0);
    assert_eq!(compositor.pipeline_runs(), 1);
}

#[test]
fn disabled_shadow_only_draws_content() {
    let mut params = sharp_shadow(30.0, BLACK);
    params.enabled = false;

    let mut compositor =
        ShadowCompositor::with_parameters(CardHost::new(rect_i32(20, 20, 40, 40)), params);
    compositor.on_bounds_changed(100, 100);

    let image = draw_to_image(&mut compositor, 100, 100);

    assert_eq!(alpha(&image, 70, 70), 0);
    assert_eq!(image.get_pixel(30, 30).0, [255, 0, 0, 255]);
    assert_eq!(compositor.pipeline_runs(), 0);
    assert_eq!(compositor.host().renders, 1);
}

#[test]
fn disabling_and_reenabling_reproduces_the_same_frame() {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(15, 15, 50, 30)),
        ShadowParameters::builder()
            .radius(6.0)
            .offset(8.0, 12.0)
            .spread(1.5)
            .color(RGBA8::new(20, 30, 40, 160))
            .build(),
    );
    compositor.on_bounds_changed(100, 80);

    let before = draw_to_image(&mut compositor, 100, 80);

    compositor.set_enabled(false);
    let without = draw_to_image(&mut compositor, 100, 80);
    assert_ne!(before, without);

    compositor.set_enabled(true);
    let after = draw_to_image(&mut compositor, 100, 80);

    assert_eq!(before, after);
    assert_eq!(compositor.pipeline_runs(), 2);
}

#[test]
fn spread_grows_and_shrinks_the_painted_shadow() {
    let draw_with_spread = |spread: f32| {
        let mut compositor = ShadowCompositor::with_parameters(
            CardHost::new(rect_i32(0, 0, 40, 40)),
            ShadowParameters::builder()
                .radius(MIN_RADIUS)
                .offset(10.0, 10.0)
                .spread(spread)
                .color(BLACK)
                .build(),
        );
        compositor.on_bounds_changed(40, 40);

        let mut image = RgbaImage::new(100, 100);
        compositor.draw(&mut Canvas::with_origin(&mut image, PointI32::new(20, 20)));
        image
    };

    let plain = draw_with_spread(0.0);
    let grown = draw_with_spread(4.0);
    let shrunk = draw_with_spread(-4.0);

    // Local (55, 30): right of the plain shadow, inside the grown one.
    assert_eq!(alpha(&plain, 75, 50), 0);
    assert!(alpha(&grown, 75, 50) > 200);

    // Local (45, 30): inside the plain shadow, outside the shrunk one.
    assert!(alpha(&plain, 65, 50) > 200);
    assert_eq!(alpha(&shrunk, 65, 50), 0);
}

fn draw_soft_card(offset: f32) -> RgbaImage {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(0, 0, 40, 40)),
        ShadowParameters::builder()
            .radius(10.0)
            .offset(offset, offset)
            .spread(0.0)
            .color(BLACK)
            .build(),
    );
    compositor.on_bounds_changed(40, 40);

    let mut image = RgbaImage::new(120, 120);
    compositor.draw(&mut Canvas::with_origin(&mut image, PointI32::new(30, 30)));
    image
}

#[test]
fn blurred_shadow_fades_out_beyond_the_content_edge() {
    let image = draw_soft_card(0.0);

    // Local x = -15..=-1 along the card's middle row.
    let row: Vec<u8> = (15..30).map(|x| alpha(&image, x, 50)).collect();

    assert!(row.iter().all(|&a| a > 0), "{row:?}");
    assert!(row.windows(2).all(|w| w[0] <= w[1]), "{row:?}");
    assert!(row[0] < row[14], "{row:?}");
    assert!(row[14] < 255, "{row:?}");
    assert_eq!(alpha(&image, 0, 50), 0);
}

#[test]
fn offset_shadow_has_no_hard_edge() {
    let image = draw_soft_card(15.0);

    // Local x = 45..=65 along the shadow's middle row (local y = 35), right
    // of the card.
    let row: Vec<u8> = (75..=95).map(|x| alpha(&image, x, 65)).collect();

    assert!(row.windows(2).all(|w| w[0] >= w[1]), "{row:?}");
    assert!(row.windows(2).all(|w| w[0] - w[1] < 40), "{row:?}");
    // Local x = 55 is where the offset content ends.
    assert!(row[10] > 0 && row[10] < row[0], "{row:?}");
    assert!(row[20] > 0, "{row:?}");
}

#[test]
fn resetting_nan_values_keeps_the_cache_clean() {
    let mut compositor = ShadowCompositor::with_parameters(
        CardHost::new(rect_i32(10, 10, 30, 30)),
        sharp_shadow(5.0, BLACK),
    );
    compositor.on_bounds_changed(60, 60);
    compositor.set_spread(f32::NAN);
    compositor.set_offset_x(f32::NAN);
    draw_to_image(&mut compositor, 60, 60);
    assert_eq!(compositor.dirty_state(), DirtyState::Clean);

    compositor.set_spread(f32::NAN);
    compositor.set_offset_x(f32::NAN);
    compositor.set_parameters(*compositor.parameters());

    assert_eq!(compositor.dirty_state(), DirtyState::Clean);
    assert_eq!(compositor.pipeline_runs(), 1);
}

#[test]
fn allocation_failure_still_draws_content() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(0, 0, 5, 5)));
    compositor.on_bounds_changed(100_000, 10);

    let image = draw_to_image(&mut compositor, 10, 10);

    assert_eq!(image.get_pixel(2, 2).0, [255, 0, 0, 255]);
    assert_eq!(compositor.pipeline_runs(), 0);
    assert!(compositor.is_dirty());

    // Recovers once the bounds are reasonable again.
    compositor.on_bounds_changed(10, 10);
    draw_to_image(&mut compositor, 10, 10);
    assert_eq!(compositor.pipeline_runs(), 1);
}

#[test]
fn release_forces_a_rebuild() {
    let mut compositor = ShadowCompositor::new(CardHost::new(rect_i32(4, 4, 8, 8)));
    compositor.on_bounds_changed(16, 16);

    draw_to_image(&mut compositor, 16, 16);
    compositor.release();
    assert!(compositor.is_dirty());

    draw_to_image(&mut compositor, 16, 16);
    assert_eq!(compositor.pipeline_runs(), 2);
    assert!(!compositor.is_dirty());
}

#[test]
fn borrowed_host_can_be_inspected_afterwards() {
    let mut host = CardHost::new(rect_i32(0, 0, 4, 4));
    {
        let mut compositor = ShadowCompositor::new(&mut host);
        compositor.on_bounds_changed(4, 4);
        let mut image = RgbaImage::new(4, 4);
        compositor.draw(&mut Canvas::new(&mut image));
    }

    assert_eq!(host.renders, 2);
}
