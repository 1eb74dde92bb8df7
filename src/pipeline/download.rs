//! Image download: located URL → decoded, PNG-normalised [`CardImage`].
//!
//! Art sites serve JPEG, PNG, GIF and WebP interchangeably. The bytes are
//! decoded once here so an undecodable download is caught as a per-card
//! failure instead of corrupting the document, and re-encoded as PNG so the
//! document writer only ever embeds one format. The result is shared by every
//! copy of the card.

use crate::config::BuildConfig;
use crate::error::{CardError, LookupStage};
use crate::pipeline::fetch::Fetcher;
use image::DynamicImage;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A downloaded card face ready to be placed.
///
/// Cloning is cheap: the PNG bytes are shared, so every placement of the same
/// card embeds an identical image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    pub png: Arc<[u8]>,
    pub width_px: u32,
    pub height_px: u32,
}

impl CardImage {
    /// Decode arbitrary image bytes and re-encode them as PNG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(&img)
    }

    /// Encode an already-decoded image.
    pub fn from_image(img: &DynamicImage) -> Result<Self, image::ImageError> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        Ok(Self {
            png: Arc::from(buf),
            width_px: img.width(),
            height_px: img.height(),
        })
    }
}

/// Download the image at `url` for `card_name`.
///
/// Uses the longer image timeout from `config`.
///
/// # Errors
/// [`CardError::Transport`] on any request failure, or
/// [`CardError::UndecodableImage`] if the bytes are not a supported image.
pub async fn fetch_card_image<F: Fetcher>(
    fetcher: &F,
    config: &BuildConfig,
    card_name: &str,
    url: &str,
) -> Result<CardImage, CardError> {
    let timeout = Duration::from_secs(config.image_timeout_secs);
    let bytes = fetcher
        .fetch(url, timeout)
        .await
        .map_err(|source| CardError::Transport {
            card: card_name.to_string(),
            stage: LookupStage::Download,
            source,
        })?;

    let image = CardImage::from_bytes(&bytes).map_err(|e| CardError::UndecodableImage {
        card: card_name.to_string(),
        detail: e.to_string(),
    })?;
    debug!(
        "Image for '{}': {} bytes → {}×{} px",
        card_name,
        bytes.len(),
        image.width_px,
        image.height_px
    );
    Ok(image)
}
