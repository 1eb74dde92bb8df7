//! Image location: card name → search results → artwork page → image URL.
//!
//! The lookup is two hops. A search for `"<prefix> <card name>"` returns a
//! results page whose first artwork tile links to an artwork page; that page
//! carries the full-size image inside a structured-data `ImageObject`
//! container. The first match wins at every hop; there is no ranking.
//!
//! HTML selection is isolated behind [`ArtworkSelector`] so the heuristic can
//! be replaced for another site, or tested against fixture HTML, without
//! touching the network code.

use crate::config::BuildConfig;
use crate::error::{CardError, FetchError, LookupStage};
use crate::pipeline::fetch::Fetcher;
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A resolved card image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedImage {
    /// The artwork page the image was found on.
    pub source_url: String,
    /// Direct URL of the image resource.
    pub image_url: String,
}

/// Picks links out of the two pages of a lookup.
pub trait ArtworkSelector {
    /// `href` of the first artwork tile on a search-results page.
    fn first_artwork_link(&self, html: &str) -> Option<String>;

    /// `src` of the full-size image on an artwork page.
    fn full_image(&self, html: &str) -> Option<String>;
}

// Result tiles are labelled "<title> by <artist>".
static ARTWORK_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href][aria-label][aria-label*='by']").expect("static selector")
});

static FULL_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[typeof=ImageObject] img").expect("static selector"));

/// Selection rules for DeviantArt search and deviation pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviantArtSelector;

impl ArtworkSelector for DeviantArtSelector {
    fn first_artwork_link(&self, html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        doc.select(&ARTWORK_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
    }

    fn full_image(&self, html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        doc.select(&FULL_IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.trim().is_empty())
            .map(str::to_string)
    }
}

/// Build the search URL for a card: `<search_url>?q=<prefix> <card name>`,
/// form-encoded so spaces become `+`.
pub fn search_url(config: &BuildConfig, card_name: &str) -> Result<String, FetchError> {
    let query = if config.query_prefix.trim().is_empty() {
        card_name.to_string()
    } else {
        format!("{} {}", config.query_prefix.trim(), card_name)
    };
    Url::parse_with_params(&config.search_url, &[("q", query)])
        .map(String::from)
        .map_err(|e| FetchError::Transport {
            url: config.search_url.clone(),
            reason: format!("invalid search URL: {e}"),
        })
}

/// Resolve `link` against the page it was found on; absolute links pass through.
fn resolve_link(base: &str, link: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(link.trim()))
        .map(String::from)
        .unwrap_or_else(|_| link.trim().to_string())
}

/// Resolve a card name to an image URL.
///
/// Makes one request if the search page has no artwork tile (or the search
/// fails) and two requests otherwise. Never retries.
///
/// # Errors
/// [`CardError::NotFound`] when a page lacks the expected element,
/// [`CardError::Transport`] when a request fails. Both are non-fatal.
pub async fn locate_image<F, S>(
    fetcher: &F,
    selector: &S,
    config: &BuildConfig,
    card_name: &str,
) -> Result<LocatedImage, CardError>
where
    F: Fetcher,
    S: ArtworkSelector,
{
    let timeout = Duration::from_secs(config.page_timeout_secs);
    let transport = |stage, source| CardError::Transport {
        card: card_name.to_string(),
        stage,
        source,
    };
    let not_found = |stage| CardError::NotFound {
        card: card_name.to_string(),
        stage,
    };

    // ── Hop 1: search results ────────────────────────────────────────────
    let url = search_url(config, card_name).map_err(|e| transport(LookupStage::Search, e))?;
    debug!("Searching '{}': {}", card_name, url);
    let body = fetcher
        .fetch(&url, timeout)
        .await
        .map_err(|e| transport(LookupStage::Search, e))?;
    let link = selector
        .first_artwork_link(&String::from_utf8_lossy(&body))
        .ok_or_else(|| not_found(LookupStage::Search))?;
    let art_url = resolve_link(&url, &link);

    // ── Hop 2: artwork page ──────────────────────────────────────────────
    debug!("Artwork page for '{}': {}", card_name, art_url);
    let body = fetcher
        .fetch(&art_url, timeout)
        .await
        .map_err(|e| transport(LookupStage::ArtworkPage, e))?;
    let src = selector
        .full_image(&String::from_utf8_lossy(&body))
        .ok_or_else(|| not_found(LookupStage::ArtworkPage))?;

    Ok(LocatedImage {
        image_url: resolve_link(&art_url, &src),
        source_url: art_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SEARCH_HTML: &str = r#"<html><body>
        <a href="https://www.deviantart.com/tag/rushduel">rush duel</a>
        <a href="https://www.deviantart.com/x/art/nope" aria-label="Standalone tile">no</a>
        <a href="https://www.deviantart.com/alice/art/Dragon-Knight-1" aria-label="Dragon Knight by alice, visual art">hit</a>
        <a href="https://www.deviantart.com/bob/art/Dragon-Knight-2" aria-label="Dragon Knight by bob">second</a>
    </body></html>"#;

    const ART_HTML: &str = r#"<html><body>
        <img src="https://img.example/avatar.png">
        <div typeof="ImageObject"><div><img src="https://img.example/dragon-knight.png" alt="Dragon Knight"></div></div>
    </body></html>"#;

    struct MapFetcher {
        pages: HashMap<String, Result<Vec<u8>, FetchError>>,
        calls: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn new(pages: Vec<(String, Result<Vec<u8>, FetchError>)>) -> Self {
            Self {
                pages: pages.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().unwrap_or(Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }))
        }
    }

    #[test]
    fn search_url_form_encodes_query() {
        let url = search_url(&BuildConfig::default(), "Dragon Knight").unwrap();
        assert_eq!(
            url,
            "https://www.deviantart.com/search?q=rush+duel+Dragon+Knight"
        );
    }

    #[test]
    fn search_url_escapes_reserved_characters() {
        let url = search_url(&BuildConfig::default(), "Fire & Ice #1").unwrap();
        assert!(url.ends_with("q=rush+duel+Fire+%26+Ice+%231"), "got: {url}");
    }

    #[test]
    fn first_link_requires_by_in_aria_label() {
        let link = DeviantArtSelector.first_artwork_link(SEARCH_HTML);
        assert_eq!(
            link.as_deref(),
            Some("https://www.deviantart.com/alice/art/Dragon-Knight-1")
        );
    }

    #[test]
    fn first_link_absent() {
        assert_eq!(
            DeviantArtSelector.first_artwork_link("<a href='/x' aria-label='Nothing'>x</a>"),
            None
        );
    }

    #[test]
    fn full_image_must_be_inside_image_object() {
        assert_eq!(
            DeviantArtSelector.full_image(ART_HTML).as_deref(),
            Some("https://img.example/dragon-knight.png")
        );
        assert_eq!(
            DeviantArtSelector.full_image("<img src='https://img.example/a.png'>"),
            None
        );
    }

    #[test]
    fn full_image_without_src_is_absent() {
        assert_eq!(
            DeviantArtSelector.full_image("<div typeof='ImageObject'><img alt='x'></div>"),
            None
        );
    }

    #[test]
    fn relative_links_are_resolved() {
        assert_eq!(
            resolve_link("https://www.deviantart.com/search?q=x", "/alice/art/1"),
            "https://www.deviantart.com/alice/art/1"
        );
        assert_eq!(
            resolve_link("https://www.deviantart.com/a", "https://cdn.example/i.png"),
            "https://cdn.example/i.png"
        );
    }

    #[tokio::test]
    async fn two_hop_lookup_succeeds() {
        let config = BuildConfig::default();
        let search = search_url(&config, "Dragon Knight").unwrap();
        let art = "https://www.deviantart.com/alice/art/Dragon-Knight-1".to_string();
        let fetcher = MapFetcher::new(vec![
            (search.clone(), Ok(SEARCH_HTML.as_bytes().to_vec())),
            (art.clone(), Ok(ART_HTML.as_bytes().to_vec())),
        ]);

        let located = locate_image(&fetcher, &DeviantArtSelector, &config, "Dragon Knight")
            .await
            .unwrap();
        assert_eq!(located.source_url, art);
        assert_eq!(located.image_url, "https://img.example/dragon-knight.png");
        assert_eq!(*fetcher.calls.lock().unwrap(), vec![search, art]);
    }

    #[tokio::test]
    async fn search_failure_makes_one_call() {
        let config = BuildConfig::default();
        let search = search_url(&config, "Hyper Beast").unwrap();
        let fetcher = MapFetcher::new(vec![(
            search.clone(),
            Err(FetchError::Timeout {
                url: search.clone(),
                secs: 10,
            }),
        )]);

        let err = locate_image(&fetcher, &DeviantArtSelector, &config, "Hyper Beast")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CardError::Transport {
                stage: LookupStage::Search,
                source: FetchError::Timeout { .. },
                ..
            }
        ));
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn no_tile_is_not_found_at_search() {
        let config = BuildConfig::default();
        let search = search_url(&config, "Nothing").unwrap();
        let fetcher = MapFetcher::new(vec![(search, Ok(b"<html></html>".to_vec()))]);

        let err = tokio_test::block_on(locate_image(
            &fetcher,
            &DeviantArtSelector,
            &config,
            "Nothing",
        ))
        .unwrap_err();
        assert_eq!(
            err,
            CardError::NotFound {
                card: "Nothing".into(),
                stage: LookupStage::Search
            }
        );
    }

    #[test]
    fn artwork_page_without_image_is_not_found() {
        let config = BuildConfig::default();
        let search = search_url(&config, "Dragon Knight").unwrap();
        let fetcher = MapFetcher::new(vec![
            (search, Ok(SEARCH_HTML.as_bytes().to_vec())),
            (
                "https://www.deviantart.com/alice/art/Dragon-Knight-1".into(),
                Ok(b"<html><body><p>removed</p></body></html>".to_vec()),
            ),
        ]);

        let err = tokio_test::block_on(locate_image(
            &fetcher,
            &DeviantArtSelector,
            &config,
            "Dragon Knight",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            CardError::NotFound {
                stage: LookupStage::ArtworkPage,
                ..
            }
        ));
    }
}
