//! DOCX rendering: [`Layout`] → WordprocessingML package on disk.
//!
//! Each row becomes one paragraph with zero spacing before and after and
//! single line spacing, holding one inline picture per placement. Rows that
//! overflow the page simply flow onto the next page; nothing here paginates.

use crate::config::{inches_to_twips, PageMargins};
use crate::error::DeckError;
use crate::pipeline::layout::{Layout, Row};
use docx_rs::{Docx, LineSpacing, PageMargin, Paragraph, Pic, Run};
use std::io::{Seek, Write};
use std::path::Path;
use tracing::debug;

/// Build the document model for a layout.
pub fn render_docx(layout: &Layout, margins: &PageMargins) -> Docx {
    let mut docx = Docx::new().page_margin(
        PageMargin::new()
            .top(inches_to_twips(margins.top))
            .left(inches_to_twips(margins.left))
            .right(inches_to_twips(margins.right))
            .bottom(inches_to_twips(margins.bottom)),
    );
    for row in &layout.rows {
        docx = docx.add_paragraph(render_row(row));
    }
    docx
}

fn render_row(row: &Row) -> Paragraph {
    // 240 = single line spacing.
    let spacing = LineSpacing::new().before(0).after(0).line(240);
    row.placements
        .iter()
        .fold(Paragraph::new().line_spacing(spacing), |p, placement| {
            let pic = Pic::new_with_dimensions(
                placement.image.png.to_vec(),
                placement.image.width_px,
                placement.image.height_px,
            )
            .size(placement.width_emu, placement.height_emu);
            p.add_run(Run::new().add_image(pic))
        })
}

/// Serialise a layout as a DOCX package into `writer`.
pub fn write_docx<W: Write + Seek>(
    layout: &Layout,
    margins: &PageMargins,
    writer: W,
) -> Result<(), String> {
    render_docx(layout, margins)
        .build()
        .pack(writer)
        .map_err(|e| e.to_string())
}

/// Make sure `path` can be written before any network work starts.
///
/// Creates missing parent directories.
pub async fn prepare_output(path: &Path) -> Result<(), DeckError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DeckError::OutputWriteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    }
    if path.is_dir() {
        return Err(DeckError::OutputWriteFailed {
            path: path.to_path_buf(),
            reason: "path is a directory".into(),
        });
    }
    Ok(())
}

/// Save a layout to `path`.
///
/// Atomic write: the package goes to a temp file in the same directory,
/// which is then renamed over `path`, so a failed save never leaves a
/// truncated document behind.
pub async fn save_docx(layout: &Layout, margins: &PageMargins, path: &Path) -> Result<(), DeckError> {
    prepare_output(path).await?;

    let fail = |reason: String| DeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let layout = layout.clone();
    let margins = *margins;
    let target = path.to_path_buf();

    // Zip compression of the embedded images is CPU-bound.
    tokio::task::spawn_blocking(move || -> Result<(), String> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| e.to_string())?;
        write_docx(&layout, &margins, tmp.as_file_mut())?;
        tmp.as_file_mut().flush().map_err(|e| e.to_string())?;
        tmp.persist(&target).map_err(|e| e.error.to_string())?;
        Ok(())
    })
    .await
    .map_err(|e| DeckError::Internal(format!("Save task panicked: {e}")))?
    .map_err(fail)?;

    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::download::CardImage;
    use crate::pipeline::layout::LayoutBuilder;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn sample_layout(n: usize) -> Layout {
        let img = CardImage::from_image(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            6,
            Rgba([200, 0, 0, 255]),
        )))
        .unwrap();
        let mut b = LayoutBuilder::new(3);
        b.place_copies("Dragon Knight", &img, n as u32, 2.31, 3.37);
        b.finish()
    }

    #[test]
    fn empty_layout_is_a_valid_package() {
        let mut buf = Cursor::new(Vec::new());
        write_docx(&Layout::default(), &PageMargins::default(), &mut buf).unwrap();
        let bytes = buf.into_inner();
        assert_eq!(&bytes[..2], b"PK", "DOCX must be a zip package");
    }

    #[test]
    fn images_are_embedded() {
        let mut empty = Cursor::new(Vec::new());
        write_docx(&Layout::default(), &PageMargins::default(), &mut empty).unwrap();
        let mut full = Cursor::new(Vec::new());
        write_docx(&sample_layout(5), &PageMargins::default(), &mut full).unwrap();
        assert!(full.into_inner().len() > empty.into_inner().len());
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/deck.docx");
        save_docx(&sample_layout(2), &PageMargins::default(), &path)
            .await
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn directory_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_output(dir.path()).await.unwrap_err();
        assert!(matches!(err, DeckError::OutputWriteFailed { .. }));
    }
}
