//! Decklist parsing: plain text → ordered `(quantity, card name)` entries.
//!
//! The format is one `"<quantity> <card name>"` per line. Blank lines and
//! section headers ("Monster", "마법", …) are ignored, and so is anything else
//! that does not fit the shape: a decklist pasted from a forum or a deck
//! builder export usually carries some noise, and dropping it beats refusing
//! the whole file.

use crate::error::DeckError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One decklist line: how many copies of which card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub quantity: u32,
    pub card_name: String,
}

/// Parse decklist text into entries, preserving line order.
///
/// `header_tokens` must already be lower-cased; a trimmed line whose
/// lower-cased form equals one of them is skipped.
pub fn parse_decklist(text: &str, header_tokens: &[String]) -> Vec<DeckEntry> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let entry = parse_line(line, header_tokens);
            if entry.is_none() && !line.trim().is_empty() {
                debug!("Decklist line {} skipped: {:?}", i + 1, line.trim());
            }
            entry
        })
        .collect()
}

/// Parse a single line; `None` means the line contributes no entry.
fn parse_line(line: &str, header_tokens: &[String]) -> Option<DeckEntry> {
    let line = line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if line.is_empty() {
        return None;
    }

    let lowered = line.to_lowercase();
    if header_tokens.iter().any(|t| *t == lowered) {
        return None;
    }

    let (count, name) = line.split_once(char::is_whitespace)?;
    let name = name.trim_start();
    if name.is_empty() || count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let quantity = count.parse::<u32>().ok()?;
    Some(DeckEntry {
        quantity,
        card_name: name.to_string(),
    })
}

/// Read and parse a decklist file.
///
/// # Errors
/// Only I/O failures are errors; malformed lines are dropped.
pub async fn read_decklist(
    path: &Path,
    header_tokens: &[String],
) -> Result<Vec<DeckEntry>, DeckError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DeckError::DecklistNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => DeckError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => DeckError::DecklistUnreadable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

    let entries = parse_decklist(&text, header_tokens);
    debug!("Parsed {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;

    fn headers() -> Vec<String> {
        BuildConfig::default().header_tokens
    }

    fn entry(quantity: u32, name: &str) -> DeckEntry {
        DeckEntry {
            quantity,
            card_name: name.to_string(),
        }
    }

    #[test]
    fn parses_quantity_and_name() {
        let entries = parse_decklist("3 Dragon Knight\n2 Hyper Beast\n", &headers());
        assert_eq!(
            entries,
            vec![entry(3, "Dragon Knight"), entry(2, "Hyper Beast")]
        );
    }

    #[test]
    fn name_keeps_internal_spaces() {
        let entries = parse_decklist("1 Sevens  Road   Magician", &headers());
        assert_eq!(entries, vec![entry(1, "Sevens  Road   Magician")]);
    }

    #[test]
    fn splits_on_first_whitespace_run() {
        let entries = parse_decklist("2\t  Blue-Eyes White Dragon  ", &headers());
        assert_eq!(entries, vec![entry(2, "Blue-Eyes White Dragon")]);
    }

    #[test]
    fn headers_are_skipped_case_insensitively() {
        let text = "Monster\nSPELL\n  trap  \nExtra\nside\n몬스터\n마법\n함정\n엑스트라\n사이드\n";
        assert!(parse_decklist(text, &headers()).is_empty());
    }

    #[test]
    fn header_with_count_is_not_a_header() {
        // Only exact matches are headers.
        let entries = parse_decklist("Monster 12\n3 Monster Reborn", &headers());
        assert_eq!(entries, vec![entry(3, "Monster Reborn")]);
    }

    #[test]
    fn lines_without_whitespace_are_dropped() {
        assert!(parse_decklist("3\nDragonKnight\n42", &headers()).is_empty());
    }

    #[test]
    fn non_digit_quantity_is_dropped() {
        let text = "x3 Dragon Knight\n3x Dragon Knight\n-1 Dragon Knight\n+2 Dragon Knight\nthree Dragon Knight";
        assert!(parse_decklist(text, &headers()).is_empty());
    }

    #[test]
    fn overflowing_quantity_is_dropped() {
        assert!(parse_decklist("99999999999 Dragon Knight", &headers()).is_empty());
    }

    #[test]
    fn zero_quantity_is_kept() {
        assert_eq!(
            parse_decklist("0 Dragon Knight", &headers()),
            vec![entry(0, "Dragon Knight")]
        );
    }

    #[test]
    fn blank_lines_and_bom_are_ignored() {
        let text = "\u{FEFF}1 Dragon Knight\n\n   \n\r\n2 Hyper Beast\r\n";
        assert_eq!(
            parse_decklist(text, &headers()),
            vec![entry(1, "Dragon Knight"), entry(2, "Hyper Beast")]
        );
    }

    #[test]
    fn order_is_preserved_with_duplicates() {
        let text = "1 B\nMonster\n2 A\n1 B\n";
        assert_eq!(
            parse_decklist(text, &headers()),
            vec![entry(1, "B"), entry(2, "A"), entry(1, "B")]
        );
    }

    #[test]
    fn custom_header_tokens_replace_defaults() {
        let tokens = vec!["fusion".to_string()];
        let entries = parse_decklist("Fusion\nMonster\n1 Dragon Knight", &tokens);
        // "Monster" is no longer a header, but it has no quantity so it is still dropped.
        assert_eq!(entries, vec![entry(1, "Dragon Knight")]);
    }

    #[tokio::test]
    async fn read_missing_file_is_fatal() {
        let err = read_decklist(Path::new("/definitely/not/a/deck.txt"), &headers())
            .await
            .unwrap_err();
        assert!(matches!(err, DeckError::DecklistNotFound { .. }));
    }

    #[tokio::test]
    async fn read_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.txt");
        std::fs::write(&path, "Monster\n3 Dragon Knight\n").unwrap();
        let entries = read_decklist(&path, &headers()).await.unwrap();
        assert_eq!(entries, vec![entry(3, "Dragon Knight")]);
    }
}
