//! Progress-callback trait for per-card build events.
//!
//! Inject an [`Arc<dyn BuildProgressCallback>`] via
//! [`crate::config::BuildConfigBuilder::progress_callback`] to receive events
//! as the pipeline resolves each decklist entry. The CLI uses it to drive a
//! terminal progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use deck2docx::{BuildConfig, BuildProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     skipped: AtomicUsize,
//! }
//!
//! impl BuildProgressCallback for CountingCallback {
//!     fn on_card_skipped(&self, _index: usize, _total: usize, name: &str, reason: &str) {
//!         self.skipped.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("skipped {name}: {reason}");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { skipped: AtomicUsize::new(0) });
//! let config = BuildConfig::builder()
//!     .progress_callback(cb as Arc<dyn BuildProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the build pipeline as it processes each decklist entry.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Entry indices are 1-based.
pub trait BuildProgressCallback: Send + Sync {
    /// Called once after the decklist is parsed, before any network call.
    fn on_build_start(&self, total_entries: usize) {
        let _ = total_entries;
    }

    /// Called just before the lookup for an entry begins.
    fn on_card_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when an entry's image was placed `copies` times.
    fn on_card_placed(&self, index: usize, total: usize, name: &str, copies: u32) {
        let _ = (index, total, name, copies);
    }

    /// Called when an entry is skipped; `reason` is human-readable.
    fn on_card_skipped(&self, index: usize, total: usize, name: &str, reason: &str) {
        let _ = (index, total, name, reason);
    }

    /// Called once after every entry has been attempted.
    fn on_build_complete(&self, total_entries: usize, placed_entries: usize) {
        let _ = (total_entries, placed_entries);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BuildProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BuildConfig`].
pub type ProgressCallback = Arc<dyn BuildProgressCallback>;
