//! Error types for the deck2docx library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`DeckError`] — **Fatal**: the build cannot proceed at all (decklist
//!   missing or unreadable, output path unwritable, bad configuration).
//!   Returned as `Err(DeckError)` from the top-level `build_*` functions.
//!
//! * [`CardError`] — **Non-fatal**: a single card could not be resolved or
//!   downloaded. The card is skipped and every other card is unaffected.
//!   Stored inside [`crate::output::CardOutcome`] so callers can report
//!   exactly which cards are missing from the sheet and why.
//!
//! * [`FetchError`] — a single HTTP request failed. Always wrapped in a
//!   [`CardError::Transport`] before it leaves the pipeline.
//!
//! Malformed decklist lines are not errors at all: the parser drops them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the deck2docx library.
///
/// Card-level failures use [`CardError`] and are stored in
/// [`crate::output::CardOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Decklist file was not found at the given path.
    #[error("Decklist not found: '{path}'\nCheck the path exists and is readable.")]
    DecklistNotFound { path: PathBuf },

    /// Process does not have read permission on the decklist.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The decklist exists but could not be read as UTF-8 text.
    #[error("Failed to read decklist '{path}': {source}")]
    DecklistUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output document.
    #[error("Failed to write output document '{path}': {reason}")]
    OutputWriteFailed { path: PathBuf, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (runtime or HTTP client construction).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which hop of the lookup a card failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStage {
    /// The search request / first artwork link.
    Search,
    /// The artwork page / full-size image element.
    ArtworkPage,
    /// The image download itself.
    Download,
}

impl std::fmt::Display for LookupStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LookupStage::Search => "search",
            LookupStage::ArtworkPage => "artwork page",
            LookupStage::Download => "image download",
        };
        f.write_str(s)
    }
}

/// A single failed HTTP request.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchError {
    /// The request exceeded its timeout.
    #[error("timed out after {secs}s fetching '{url}'")]
    Timeout { url: String, secs: u64 },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from '{url}'")]
    Status { url: String, status: u16 },

    /// Connection, TLS, redirect or body-read failure.
    #[error("request to '{url}' failed: {reason}")]
    Transport { url: String, reason: String },
}

/// A non-fatal error for a single card.
///
/// The card contributes zero placements; the build continues.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardError {
    /// The lookup completed but the expected element was absent.
    #[error("No image found for '{card}' ({stage} had no match)")]
    NotFound { card: String, stage: LookupStage },

    /// A network call failed.
    #[error("Error fetching '{card}' during {stage}: {source}")]
    Transport {
        card: String,
        stage: LookupStage,
        #[source]
        source: FetchError,
    },

    /// The downloaded bytes are not an image the document can embed.
    #[error("Image for '{card}' could not be decoded: {detail}")]
    UndecodableImage { card: String, detail: String },
}

impl CardError {
    /// Name of the card this error belongs to.
    pub fn card(&self) -> &str {
        match self {
            CardError::NotFound { card, .. }
            | CardError::Transport { card, .. }
            | CardError::UndecodableImage { card, .. } => card,
        }
    }
}
