//! CLI binary for deck2docx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `BuildConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use deck2docx::{
    build_deck, list_entries, BuildConfig, BuildProgressCallback, CardStatus, PageMargins,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per card.
struct CliProgressCallback {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_build_start` tells us how many entries there are.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading decklist…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            skipped: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} cards  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Fetching");
        self.bar.reset_eta();
    }
}

impl BuildProgressCallback for CliProgressCallback {
    fn on_build_start(&self, total_entries: usize) {
        self.activate_bar(total_entries);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Looking up {total_entries} cards…"))
        ));
    }

    fn on_card_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_card_placed(&self, index: usize, total: usize, name: &str, copies: u32) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            name,
            dim(&format!("×{copies}")),
        ));
        self.bar.inc(1);
    }

    fn on_card_skipped(&self, index: usize, total: usize, name: &str, reason: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if reason.chars().count() > 80 {
            let cut: String = reason.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            reason.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_build_complete(&self, total_entries: usize, placed_entries: usize) {
        self.bar.finish_and_clear();
        let skipped = total_entries.saturating_sub(placed_entries);
        if skipped == 0 {
            eprintln!(
                "{} {} cards found",
                green("✔"),
                bold(&placed_entries.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} cards found  ({} skipped)",
                if placed_entries == 0 { red("✘") } else { cyan("⚠") },
                bold(&placed_entries.to_string()),
                total_entries,
                red(&skipped.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"DECKLIST FORMAT:
  One card per line as "<quantity> <card name>". Blank lines and section
  headers (Monster, Spell, Trap, Extra, Side and their Korean names) are
  ignored, as is any line that does not start with a number.

    Monster
    3 Dragon Knight
    2 Hyper Beast

EXAMPLES:
  # Default sheet (2.31" × 3.37" cards, 3 per row)
  deck2docx deck.txt

  # Custom output path and 4 smaller cards per row
  deck2docx deck.txt -o sheets/deck.docx --per-row 4 --card-width 1.9 --card-height 2.77

  # Check what the parser reads, without any network access
  deck2docx --list-only deck.txt

  # Machine-readable per-card report
  deck2docx --json deck.txt > report.json

ENVIRONMENT VARIABLES:
  Every flag has a DECK2DOCX_* equivalent, e.g. DECK2DOCX_PER_ROW=4.
  RUST_LOG overrides the log filter (e.g. RUST_LOG=deck2docx=debug).
"#;

/// Build a printable DOCX sheet of card images from a decklist.
#[derive(Parser, Debug)]
#[command(
    name = "deck2docx",
    version,
    about = "Build a printable DOCX sheet of card images from a decklist",
    long_about = "Reads a plain-text decklist, looks each card up on an art site \
(search → first artwork result → full-size image), downloads the image and lays every \
copy out in fixed-size rows of a DOCX document. Cards that cannot be found are skipped \
and reported; the document is always saved.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Decklist text file.
    input: PathBuf,

    /// Output DOCX path.
    #[arg(short, long, env = "DECK2DOCX_OUTPUT", default_value = "deck_proxies.docx")]
    output: PathBuf,

    /// Printed card width in inches.
    #[arg(long, env = "DECK2DOCX_CARD_WIDTH", default_value_t = 2.31)]
    card_width: f64,

    /// Printed card height in inches.
    #[arg(long, env = "DECK2DOCX_CARD_HEIGHT", default_value_t = 3.37)]
    card_height: f64,

    /// Images per row.
    #[arg(long, env = "DECK2DOCX_PER_ROW", default_value_t = 3,
          value_parser = clap::value_parser!(u16).range(1..))]
    per_row: u16,

    /// Search endpoint; the query is sent as `?q=`.
    #[arg(long, env = "DECK2DOCX_SEARCH_URL", default_value = deck2docx::config::DEFAULT_SEARCH_URL)]
    search_url: String,

    /// Text prepended to every card name in the search query.
    #[arg(long, env = "DECK2DOCX_QUERY_PREFIX", default_value = deck2docx::config::DEFAULT_QUERY_PREFIX)]
    query_prefix: String,

    /// User-Agent header sent with every request.
    #[arg(long, env = "DECK2DOCX_USER_AGENT", default_value = deck2docx::config::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Timeout for search and artwork pages, in seconds.
    #[arg(long, env = "DECK2DOCX_PAGE_TIMEOUT", default_value_t = 10)]
    page_timeout: u64,

    /// Timeout for image downloads, in seconds.
    #[arg(long, env = "DECK2DOCX_IMAGE_TIMEOUT", default_value_t = 15)]
    image_timeout: u64,

    /// Extra section-header line to ignore (repeatable).
    #[arg(long = "header", value_name = "TOKEN")]
    headers: Vec<String>,

    /// Cap on copies per card; larger quantities are clamped.
    #[arg(long, env = "DECK2DOCX_MAX_COPIES")]
    max_copies: Option<u32>,

    /// Print the parsed decklist and exit; no network access.
    #[arg(long)]
    list_only: bool,

    /// Print a JSON report of every card on stdout.
    #[arg(long, env = "DECK2DOCX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DECK2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DECK2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DECK2DOCX_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already reports every card; keep library logs quiet
    // while it is shown.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.list_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn BuildProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list_only {
        let entries = list_entries(&cli.input, &config)
            .await
            .context("Failed to read decklist")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).context("Failed to serialise entries")?
            );
        } else {
            for e in &entries {
                println!("{:>3}  {}", e.quantity, e.card_name);
            }
            let copies: u64 = entries.iter().map(|e| e.quantity as u64).sum();
            eprintln!("{} entries, {} cards", entries.len(), copies);
        }
        return Ok(());
    }

    // ── Run build ────────────────────────────────────────────────────────
    let output = build_deck(&cli.input, &cli.output, &config)
        .await
        .context("Build failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "output": cli.output,
            "stats": output.stats,
            "cards": output.cards,
        }))
        .context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        if !show_progress {
            for card in &output.cards {
                if let CardStatus::Skipped { ref error } = card.status {
                    eprintln!("{} {}", red("✗"), error);
                }
            }
        }
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} cards  {} images  {} rows  {}ms  →  {}",
            if stats.skipped_entries == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.placed_entries,
            stats.total_entries,
            stats.total_placements,
            stats.rows,
            stats.duration_ms,
            bold(&cli.output.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `BuildConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BuildConfig> {
    let mut builder = BuildConfig::builder()
        .card_size(cli.card_width, cli.card_height)
        .per_row(cli.per_row as usize)
        .margins(PageMargins::default())
        .search_url(cli.search_url.clone())
        .query_prefix(cli.query_prefix.clone())
        .user_agent(cli.user_agent.clone())
        .page_timeout_secs(cli.page_timeout)
        .image_timeout_secs(cli.image_timeout)
        .max_copies(cli.max_copies);

    for token in &cli.headers {
        builder = builder.extra_header_token(token.clone());
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
