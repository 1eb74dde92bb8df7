//! Pipeline stages for decklist-to-DOCX builds.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the network-facing ones can be fed canned responses.
//!
//! ## Data Flow
//!
//! ```text
//! decklist ──▶ locate ──▶ download ──▶ layout ──▶ document
//!  (text)    (2 GETs)    (1 GET)     (rows)     (DOCX)
//! ```
//!
//! 1. [`decklist`] — parse `"<qty> <name>"` lines into ordered entries
//! 2. [`locate`]   — search, follow the first artwork tile, pick the full image
//! 3. [`download`] — fetch and decode the image bytes
//! 4. [`layout`]   — wrap placements into rows of `per_row`
//! 5. [`document`] — render rows to DOCX and save atomically
//!
//! [`fetch`] is the HTTP seam shared by steps 2 and 3.

pub mod decklist;
pub mod document;
pub mod download;
pub mod fetch;
pub mod layout;
pub mod locate;
