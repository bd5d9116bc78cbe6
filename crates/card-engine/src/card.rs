//! Card composition: one record in, one rendered card out.
//!
//! Layout (drawn in order):
//! ```text
//! template (optionally normalized)
//!   + QR code scaled into the QR box
//!   + logo, alpha-composited
//!   + [background rectangle] label centered in the text band
//!   + guides (previews only)
//! ```

use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::LABEL_PADDING;
use crate::compose;
use crate::error::CardError;
use crate::guides;
use crate::layout::{LayoutConfig, LogoBox};
use crate::qr;
use crate::resize;
use crate::text;

/// One row of input data describing one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based data row number in the source table.
    pub row: usize,
    pub id: String,
    pub text: String,
    pub url: String,
}

impl Record {
    pub fn new(
        row: usize,
        id: impl Into<String>,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            row,
            id: id.into(),
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Whether layout guides are drawn over the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Guides {
    #[default]
    Hide,
    Show,
}

/// Renders cards from a shared template, font and logo.
///
/// Assets are prepared once in [`Composer::new`]; [`Composer::compose`] is a
/// pure function of the record and does not mutate the composer.
pub struct Composer {
    template: RgbaImage,
    font: FontArc,
    logo: Option<(DynamicImage, LogoBox)>,
    layout: LayoutConfig,
}

impl Composer {
    /// Prepare a composer. The template is normalized when the layout asks
    /// for it and the logo is resized to its configured square.
    pub fn new(
        template: &DynamicImage,
        font: FontArc,
        logo: Option<&DynamicImage>,
        layout: LayoutConfig,
    ) -> Self {
        let template = if layout.auto_correct_resolution {
            resize::normalize_resolution(template, layout.canonical_width, layout.canonical_height)
        } else {
            template.clone()
        };
        let template = compose::opaque_canvas(&template);

        let logo = match (logo, layout.logo) {
            (Some(img), Some(logo_box)) if logo_box.size > 0 => {
                Some((resize::resize_square(img, logo_box.size), logo_box))
            }
            (Some(_), _) => {
                warn!("Logo provided without a usable logo box, ignoring it");
                None
            }
            _ => None,
        };

        debug!(
            width = template.width(),
            height = template.height(),
            has_logo = logo.is_some(),
            "Composer ready"
        );

        Self {
            template,
            font,
            logo,
            layout,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Dimensions of every card this composer produces.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.template.dimensions()
    }

    /// Render the card for `record`.
    pub fn compose(&self, record: &Record, guides: Guides) -> Result<RgbImage, CardError> {
        if record.id.trim().is_empty() {
            return Err(CardError::MissingId { row: record.row });
        }
        let url = record.url.trim();
        if url.is_empty() {
            return Err(CardError::MissingUrl {
                id: record.id.clone(),
            });
        }

        let mut canvas = self.template.clone();
        let qr_box = self.layout.qr.resolve(canvas.width());

        // QR code
        if qr_box.is_drawable() {
            let code = qr::generate_qr(url, qr_box.width() as u32, qr_box.height() as u32)
                .map_err(|reason| CardError::QrEncode {
                    id: record.id.clone(),
                    reason,
                })?;
            compose::overlay(&mut canvas, &code, qr_box.x1, qr_box.y1);
        } else {
            warn!(
                id = %record.id,
                width = qr_box.width(),
                height = qr_box.height(),
                "QR box has no area, skipping QR placement"
            );
        }

        // Logo
        if let Some((logo, logo_box)) = &self.logo {
            compose::overlay(&mut canvas, logo, logo_box.x, logo_box.y);
        }

        // Label
        let style = &self.layout.label;
        let label = style.label_for(&record.text);
        let center_x = canvas.width() as i32 / 2;
        let background = (!style.transparent_background)
            .then_some((style.background.rgba(), LABEL_PADDING));
        text::draw_centered_label(
            &mut canvas,
            &self.font,
            PxScale::from(style.font_size),
            center_x,
            self.layout.text_band.center(),
            &label,
            style.color.rgba(),
            background,
        );

        if guides == Guides::Show {
            let boxes = guides::guide_boxes(
                canvas.width(),
                qr_box,
                self.layout.text_band,
                self.layout.logo,
            );
            guides::draw_guides(&mut canvas, &self.font, &boxes);
        }

        Ok(DynamicImage::ImageRgba8(canvas).into_rgb8())
    }
}
