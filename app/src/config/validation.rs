//! Layout value validation.

use std::fmt::Display;

use card_engine::{LayoutConfig, QrPlacement};

const MAX_COORD: i32 = 10_000;

/// Validate a layout. Returns every problem found, one message per field.
pub fn validate_layout(layout: &LayoutConfig) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    let mut check = |field: &str, result: Result<(), String>| {
        if let Err(e) = result {
            problems.push(format!("{field}: {e}"));
        }
    };

    match layout.qr {
        QrPlacement::Box(b) => {
            check("qr.x1", validate_range(b.x1, 0, MAX_COORD));
            check("qr.y1", validate_range(b.y1, 0, MAX_COORD));
            check("qr.x2", validate_range(b.x2, 0, MAX_COORD));
            check("qr.y2", validate_range(b.y2, 0, MAX_COORD));
        }
        QrPlacement::AutoScale { percent_of_width, y } => {
            check(
                "qr.percent_of_width",
                validate_range(percent_of_width, 1.0, 100.0),
            );
            check("qr.y", validate_range(y, 0, MAX_COORD));
        }
    }

    check("text_band.y_top", validate_range(layout.text_band.y_top, 0, MAX_COORD));
    check(
        "text_band.y_bottom",
        validate_range(layout.text_band.y_bottom, 0, MAX_COORD),
    );
    check("label.font_size", validate_range(layout.label.font_size, 8.0, 400.0));

    if let Some(logo) = layout.logo {
        check("logo.x", validate_range(logo.x, 0, MAX_COORD));
        check("logo.y", validate_range(logo.y, 0, MAX_COORD));
        check("logo.size", validate_range(logo.size, 0, MAX_COORD as u32));
    }

    if layout.auto_correct_resolution {
        check(
            "canonical_width",
            validate_range(layout.canonical_width, 1, MAX_COORD as u32),
        );
        check(
            "canonical_height",
            validate_range(layout.canonical_height, 1, MAX_COORD as u32),
        );
    }

    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

fn validate_range<T: PartialOrd + Display>(value: T, min: T, max: T) -> Result<(), String> {
    // NaN fails both comparisons, so it is rejected as well.
    if !(value >= min && value <= max) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
