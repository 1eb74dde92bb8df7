//! Row layout: fixed-capacity rows of fixed-size placements.
//!
//! The builder carries one cursor (current row, images in it) across the whole
//! build, so rows run continuously from one card into the next instead of
//! restarting per card. Row boundaries depend only on how many images have
//! been placed, never on which card they show.
//!
//! The layout is plain data; [`crate::pipeline::document`] turns it into a
//! DOCX afterwards, which keeps the wrapping rule testable on its own.

use crate::config::inches_to_emu;
use crate::pipeline::download::CardImage;

/// One inserted image instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub card_name: String,
    pub image: CardImage,
    pub width_emu: u32,
    pub height_emu: u32,
}

/// A horizontal group of at most `per_row` placements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub placements: Vec<Placement>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Card names in placement order.
    pub fn card_names(&self) -> Vec<&str> {
        self.placements.iter().map(|p| p.card_name.as_str()).collect()
    }
}

/// The finished arrangement of every placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub rows: Vec<Row>,
}

impl Layout {
    pub fn total_placements(&self) -> usize {
        self.rows.iter().map(Row::len).sum()
    }

    /// Images per row, e.g. `[3, 3, 1]`. Two layouts with equal shapes and
    /// equal card names per slot render identically apart from image content.
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(Row::len).collect()
    }
}

/// Incrementally builds a [`Layout`].
#[derive(Debug)]
pub struct LayoutBuilder {
    per_row: usize,
    rows: Vec<Row>,
}

impl LayoutBuilder {
    /// `per_row` below 1 is treated as 1.
    pub fn new(per_row: usize) -> Self {
        Self {
            per_row: per_row.max(1),
            rows: Vec::new(),
        }
    }

    pub fn per_row(&self) -> usize {
        self.per_row
    }

    /// Begin a new, empty row; later placements go into it.
    pub fn start_row(&mut self) {
        self.rows.push(Row::default());
    }

    /// Number of images in the current row (0 before the first placement).
    pub fn placed_in_row(&self) -> usize {
        self.rows.last().map_or(0, Row::len)
    }

    /// Place one image of `width_in × height_in` inches, wrapping first if
    /// there is no row yet or the current row is full.
    pub fn place_one(&mut self, card_name: &str, image: &CardImage, width_in: f64, height_in: f64) {
        if self.rows.is_empty() || self.placed_in_row() >= self.per_row {
            self.start_row();
        }
        let placement = Placement {
            card_name: card_name.to_string(),
            image: image.clone(),
            width_emu: inches_to_emu(width_in),
            height_emu: inches_to_emu(height_in),
        };
        if let Some(row) = self.rows.last_mut() {
            row.placements.push(placement);
        }
    }

    /// Place `copies` images of the same card.
    pub fn place_copies(
        &mut self,
        card_name: &str,
        image: &CardImage,
        copies: u32,
        width_in: f64,
        height_in: f64,
    ) {
        for _ in 0..copies {
            self.place_one(card_name, image, width_in, height_in);
        }
    }

    pub fn finish(self) -> Layout {
        Layout { rows: self.rows }
    }
}
