//! Build entry points: decklist file in, DOCX sheet out.
//!
//! Entries are processed strictly one after another. For each one the
//! locator runs, then the download, then the copies are placed; a failure at
//! any step skips that entry and the loop moves on. Only decklist and output
//! file errors end a build early.

use crate::config::BuildConfig;
use crate::error::{CardError, DeckError};
use crate::output::{BuildOutput, BuildStats, CardOutcome, CardStatus};
use crate::pipeline::decklist::{read_decklist, DeckEntry};
use crate::pipeline::document::{prepare_output, save_docx};
use crate::pipeline::download::{fetch_card_image, CardImage};
use crate::pipeline::fetch::{Fetcher, HttpFetcher};
use crate::pipeline::layout::{Layout, LayoutBuilder};
use crate::pipeline::locate::{locate_image, ArtworkSelector, DeviantArtSelector, LocatedImage};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Build a proxy sheet from a decklist file using the live art site.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BuildOutput)` whenever the document was saved, even if some or all
/// cards were skipped (check `output.stats.skipped_entries`).
///
/// # Errors
/// Only fatal errors: decklist missing or unreadable, output unwritable,
/// HTTP client construction failure.
pub async fn build_deck(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<BuildOutput, DeckError> {
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    build_deck_with(input, output, &fetcher, &DeviantArtSelector, config).await
}

/// [`build_deck`] with an explicit transport and selection heuristic.
pub async fn build_deck_with<F, S>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    fetcher: &F,
    selector: &S,
    config: &BuildConfig,
) -> Result<BuildOutput, DeckError>
where
    F: Fetcher,
    S: ArtworkSelector,
{
    let start = Instant::now();
    let (input, output) = (input.as_ref(), output.as_ref());
    info!("Building proxy sheet: {} → {}", input.display(), output.display());

    // ── Step 1: Parse decklist ───────────────────────────────────────────
    let entries = read_decklist(input, &config.header_tokens).await?;
    info!("Decklist has {} entries", entries.len());

    // Fail on an unusable destination before spending time on the network.
    prepare_output(output).await?;

    // ── Step 2: Resolve, download and place every entry ──────────────────
    let (layout, cards) = build_layout(&entries, fetcher, selector, config).await;

    // ── Step 3: Save ─────────────────────────────────────────────────────
    save_docx(&layout, &config.margins, output).await?;

    let stats = BuildStats::from_outcomes(&cards, &layout, start.elapsed().as_millis() as u64);
    info!(
        "Document saved as {} ({}/{} cards, {} images in {} rows, {}ms)",
        output.display(),
        stats.placed_entries,
        stats.total_entries,
        stats.total_placements,
        stats.rows,
        stats.duration_ms
    );

    Ok(BuildOutput {
        layout,
        cards,
        stats,
    })
}

/// Synchronous wrapper around [`build_deck`].
///
/// Creates a temporary tokio runtime internally.
pub fn build_deck_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<BuildOutput, DeckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(build_deck(input, output, config))
}

/// Parse a decklist without touching the network.
pub async fn list_entries(
    input: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<Vec<DeckEntry>, DeckError> {
    read_decklist(input.as_ref(), &config.header_tokens).await
}

/// Resolve every entry in order and lay out the ones that succeed.
///
/// Never fails: each entry ends up either placed or skipped, and the row
/// cursor carries over from one entry to the next.
pub async fn build_layout<F, S>(
    entries: &[DeckEntry],
    fetcher: &F,
    selector: &S,
    config: &BuildConfig,
) -> (Layout, Vec<CardOutcome>)
where
    F: Fetcher,
    S: ArtworkSelector,
{
    let total = entries.len();
    let mut builder = LayoutBuilder::new(config.per_row);
    let mut cards = Vec::with_capacity(total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_build_start(total);
    }

    for (i, entry) in entries.iter().enumerate() {
        let index = i + 1;
        let name = entry.card_name.as_str();
        info!("Searching: {}", name);
        if let Some(ref cb) = config.progress_callback {
            cb.on_card_start(index, total, name);
        }

        let status = match resolve_entry(fetcher, selector, config, name).await {
            Ok((located, image)) => {
                let copies = config.copies_for(entry.quantity);
                if copies < entry.quantity {
                    warn!(
                        "'{}': quantity {} capped at {} copies",
                        name, entry.quantity, copies
                    );
                }
                builder.place_copies(
                    name,
                    &image,
                    copies,
                    config.card_width_in,
                    config.card_height_in,
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_card_placed(index, total, name, copies);
                }
                CardStatus::Placed {
                    image_url: located.image_url,
                    copies,
                }
            }
            Err(error) => {
                warn!("Skipping '{}': {}", name, error);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_card_skipped(index, total, name, &error.to_string());
                }
                CardStatus::Skipped { error }
            }
        };

        cards.push(CardOutcome {
            card_name: entry.card_name.clone(),
            quantity: entry.quantity,
            status,
        });
    }

    let placed = cards.iter().filter(|c| c.is_placed()).count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_build_complete(total, placed);
    }

    (builder.finish(), cards)
}

/// Locate then download one card.
async fn resolve_entry<F, S>(
    fetcher: &F,
    selector: &S,
    config: &BuildConfig,
    name: &str,
) -> Result<(LocatedImage, CardImage), CardError>
where
    F: Fetcher,
    S: ArtworkSelector,
{
    let located = locate_image(fetcher, selector, config, name).await?;
    let image = fetch_card_image(fetcher, config, name, &located.image_url).await?;
    Ok((located, image))
}
