//! End-to-end tests against the live art site.
//!
//! These make real HTTP requests and depend on the remote site's markup, so
//! they are gated behind the `E2E_ENABLED` environment variable and do not
//! run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use deck2docx::pipeline::locate::locate_image;
use deck2docx::{build_deck, BuildConfig, DeviantArtSelector, HttpFetcher};
use std::path::PathBuf;

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

fn output_dir() -> PathBuf {
    let d = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/e2e");
    std::fs::create_dir_all(&d).ok();
    d
}

#[tokio::test]
async fn test_live_lookup_returns_image_url() {
    e2e_skip_unless_enabled!();

    let config = BuildConfig::default();
    let fetcher = HttpFetcher::new(&config.user_agent).expect("client");
    match locate_image(&fetcher, &DeviantArtSelector, &config, "Sevens Road Magician").await {
        Ok(located) => {
            println!("{located:?}");
            assert!(located.image_url.starts_with("http"));
        }
        // The site may block or reshape pages; a clean skip is still correct behaviour.
        Err(e) => println!("lookup skipped: {e}"),
    }
}

#[tokio::test]
async fn test_live_build_always_saves() {
    e2e_skip_unless_enabled!();

    let dir = output_dir();
    let input = dir.join("deck.txt");
    std::fs::write(
        &input,
        "Monster\n3 Sevens Road Magician\n1 Definitely Not A Real Card Name 7f3a\n",
    )
    .unwrap();
    let output = dir.join("deck_proxies.docx");

    let result = build_deck(&input, &output, &BuildConfig::default())
        .await
        .expect("build should save a document even when cards are skipped");

    assert_eq!(result.stats.total_entries, 2);
    assert!(output.exists());
    println!("{:?}", result.stats);
}
