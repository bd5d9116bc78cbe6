//! Card rendering for QR identity cards.
//!
//! Composes a QR code, a centered text label and an optional logo onto a
//! background template, with optional layout guides for previews.

pub mod card;
pub mod compose;
pub mod error;
pub mod font;
pub mod guides;
pub mod layout;
pub mod qr;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use card::{Composer, Guides, Record};
pub use error::CardError;
pub use font::{bundled_font, load_default_font, load_font};
pub use layout::{Color, LabelStyle, LayoutConfig, LogoBox, QrBox, QrPlacement, TextBand};

/// Canonical template width used when resolution auto-correct is enabled.
pub const CANONICAL_WIDTH: u32 = 2272;

/// Canonical template height used when resolution auto-correct is enabled.
pub const CANONICAL_HEIGHT: u32 = 3200;

/// Padding around the label when its background rectangle is drawn.
pub const LABEL_PADDING: i32 = 10;
