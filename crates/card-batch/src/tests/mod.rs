use card_engine::{Composer, LayoutConfig, QrBox, QrPlacement, Record, TextBand};
use image::{DynamicImage, Rgba, RgbaImage};

/// Small composer over a flat template, rendering with the bundled font.
fn test_composer(layout: LayoutConfig) -> Composer {
    let font = card_engine::bundled_font().unwrap();
    let template = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        200,
        300,
        Rgba([30, 30, 30, 255]),
    ));
    Composer::new(&template, font, None, layout)
}

fn small_layout() -> LayoutConfig {
    let mut layout = LayoutConfig {
        qr: QrPlacement::Box(QrBox {
            x1: 20,
            y1: 20,
            x2: 180,
            y2: 180,
        }),
        text_band: TextBand {
            y_top: 200,
            y_bottom: 260,
        },
        ..LayoutConfig::default()
    };
    layout.label.font_size = 40.0;
    layout
}

fn record(row: usize, id: &str, text: &str, url: &str) -> Record {
    Record::new(row, id, text, url)
}
