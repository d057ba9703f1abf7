use image::RgbaImage;
use shadowvg::color::{RGBA8, WHITE};
use shadowvg::math::{rect_i32, Padding, PointI32};
use shadowvg::{Canvas, ContentHost, ShadowCompositor, ShadowParameters};

const CARD_WIDTH: u32 = 240;
const CARD_HEIGHT: u32 = 140;

fn main() {
    // Set up logging stuff
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", "warn");
    env_logger::init_from_env(env);

    let mut compositor = ShadowCompositor::with_parameters(
        Card::default(),
        ShadowParameters::builder()
            .radius(12.0)
            .offset(6.0, 10.0)
            .spread(2.0)
            .color(RGBA8::new(0, 0, 0, 110))
            .build(),
    );

    // A real host would run its layout pass here.
    let padding = compositor.host().padding;
    compositor.on_bounds_changed(CARD_WIDTH, CARD_HEIGHT);

    let width = CARD_WIDTH + (padding.left + padding.right) as u32;
    let height = CARD_HEIGHT + (padding.top + padding.bottom) as u32;
    let mut image = RgbaImage::from_pixel(width, height, image::Rgba([236, 239, 241, 255]));

    {
        let origin = PointI32::new(padding.left, padding.top);
        let mut canvas = Canvas::with_origin(&mut image, origin);

        // Only the first draw pays for the blur.
        for _ in 0..3 {
            compositor.draw(&mut canvas);
        }
    }

    log::info!(
        "drew {width}x{height} frame, shadow rebuilt {} time(s)",
        compositor.pipeline_runs()
    );

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("drop_shadow.png"));
    image.save(&path).unwrap();

    println!("wrote {path}");
}

#[derive(Default)]
struct Card {
    padding: Padding,
}

impl ContentHost for Card {
    fn render_content_into(&mut self, canvas: &mut Canvas<'_>) {
        canvas.fill_rect(
            rect_i32(0, 0, CARD_WIDTH as i32, CARD_HEIGHT as i32),
            RGBA8::new(200, 205, 210, 255),
        );
        canvas.fill_rect(
            rect_i32(1, 1, CARD_WIDTH as i32 - 2, CARD_HEIGHT as i32 - 2),
            WHITE,
        );
        canvas.fill_rect(rect_i32(16, 16, 120, 14), RGBA8::new(60, 64, 67, 255));
        canvas.fill_rect(rect_i32(16, 40, 200, 8), RGBA8::new(154, 160, 166, 255));
        canvas.fill_rect(rect_i32(16, 56, 180, 8), RGBA8::new(154, 160, 166, 255));
    }

    fn request_relayout(&mut self, padding: Padding) {
        log::debug!("card asked for padding {padding:?}");
        self.padding = padding;
    }
}
