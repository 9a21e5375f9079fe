//! The manifest: the sole source of truth for what gets mirrored.
//!
//! A manifest is line-oriented text. `## Heading` lines open a section and
//! `- [title](url)` lines list documents inside the current section.

mod entry;
mod parse;

pub use entry::ManifestEntry;
pub use parse::{Manifest, parse, section_slug};
