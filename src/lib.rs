//! Folio presses a plain-text manuscript into a covered EPUB.
//!
//! The pipeline is strictly sequential: the manuscript is split into
//! index-stable tagged paragraphs, a structured-extraction model identifies
//! the book's title, author, poetry mode, and chapter boundaries as
//! paragraph-index ranges, and the original text is reassembled into
//! chapters honoring those boundaries.

pub mod config;
pub mod cover;
pub mod epub;
pub mod pipeline;
