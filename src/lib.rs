//! # deck2docx
//!
//! Turn a plain-text trading-card decklist into a printable DOCX sheet of
//! card images.
//!
//! Each card name is looked up on an art site (search, then the first
//! artwork result, then its full-size image), the image is downloaded, and
//! every copy is laid out in fixed-size rows. Cards that cannot be found or
//! downloaded are skipped and reported; the sheet is always saved with
//! whatever did resolve.
//!
//! ## Pipeline Overview
//!
//! ```text
//! deck.txt
//!  │
//!  ├─ 1. Parse     "3 Dragon Knight" → (3, "Dragon Knight"), headers dropped
//!  ├─ 2. Locate    search page → first artwork tile → ImageObject <img>
//!  ├─ 3. Download  image bytes → PNG
//!  ├─ 4. Layout    N copies into rows of `per_row`
//!  └─ 5. Save      DOCX with fixed margins
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deck2docx::{build_deck, BuildConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BuildConfig::default();
//!     let output = build_deck("deck.txt", "deck_proxies.docx", &config).await?;
//!     for card in output.cards.iter().filter(|c| !c.is_placed()) {
//!         eprintln!("missing: {}", card.card_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `deck2docx` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod build;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use build::{build_deck, build_deck_sync, build_deck_with, build_layout, list_entries};
pub use config::{BuildConfig, BuildConfigBuilder, PageMargins};
pub use error::{CardError, DeckError, FetchError, LookupStage};
pub use output::{BuildOutput, BuildStats, CardOutcome, CardStatus};
pub use pipeline::decklist::{parse_decklist, DeckEntry};
pub use pipeline::download::CardImage;
pub use pipeline::fetch::{Fetcher, HttpFetcher};
pub use pipeline::layout::{Layout, LayoutBuilder, Placement, Row};
pub use pipeline::locate::{ArtworkSelector, DeviantArtSelector, LocatedImage};
pub use progress::{BuildProgressCallback, NoopProgressCallback, ProgressCallback};
