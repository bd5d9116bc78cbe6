//! Errors raised while loading card assets or composing a card.

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("record '{id}' has no URL to encode")]
    MissingUrl { id: String },
    #[error("record on row {row} has an empty identifier")]
    MissingId { row: usize },
    #[error("QR encode error for record '{id}': {reason}")]
    QrEncode { id: String, reason: String },
    #[error("failed to parse font data (TTF/OTF expected)")]
    Font,
    #[error("failed to decode {what}: {source}")]
    Image {
        what: &'static str,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid color '{0}' (expected #RRGGBB or #RRGGBBAA)")]
    InvalidColor(String),
}

impl CardError {
    /// Whether the error belongs to a single record rather than the whole run.
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            Self::MissingUrl { .. } | Self::MissingId { .. } | Self::QrEncode { .. }
        )
    }
}
