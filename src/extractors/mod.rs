// src/extractors/mod.rs
pub mod header;
pub mod items;
pub mod patterns;
pub mod plate;
pub mod section;

// Re-export key extraction types for convenience
pub use header::{extract_header, HeaderFields, NO_CLIENT, NO_POLICY, NO_VALIDITY};
pub use items::{extract_items, ItemExtractor, ItemSource, LineItem};
pub use plate::extract_plate;
pub use section::{split_sections, Section, SectionSplitter};
