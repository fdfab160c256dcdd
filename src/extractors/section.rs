// src/extractors/section.rs

// --- Imports ---
use std::ops::Range;

use super::patterns::SECTION_HEADING_RE;
use crate::pipeline::config::HeadingSplit;

// --- Data Structures ---
/// A labeled span of document text, running from its heading up to the next
/// heading (or end of text). The heading line itself is part of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub label: &'a str,  // e.g., "SECCION: 100 VEHICULOS"
    pub span: Range<usize>, // Byte range into the document text
    pub content: &'a str,
}

// --- Main Splitter Structure ---
pub struct SectionSplitter {
    heading_split: HeadingSplit,
}

impl SectionSplitter {
    pub fn new(heading_split: HeadingSplit) -> Self {
        Self { heading_split }
    }

    /// Partitions `text` into ordered, contiguous, non-overlapping sections.
    /// The sections cover `text` from the first heading to the end; the
    /// header block before the first heading belongs to no section. A text
    /// with no headings yields no sections.
    pub fn split<'a>(&self, text: &'a str) -> Vec<Section<'a>> {
        let boundaries = self.find_boundaries(text);
        if boundaries.is_empty() {
            tracing::debug!("No section headings found");
            return Vec::new();
        }

        let ends = boundaries
            .iter()
            .skip(1)
            .map(|(start, _)| *start)
            .chain(std::iter::once(text.len()));

        boundaries
            .iter()
            .zip(ends)
            .map(|(&(start, label), end)| {
                tracing::trace!("Section '{}' spans {}..{}", label, start, end);
                Section {
                    label,
                    span: start..end,
                    content: &text[start..end],
                }
            })
            .collect()
    }

    /// Heading positions, left to right. Under `FirstOccurrence` a repeated
    /// heading text is not a boundary: it stays inside whatever section
    /// precedes it.
    fn find_boundaries<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        let mut boundaries: Vec<(usize, &'a str)> = Vec::new();
        for m in SECTION_HEADING_RE.find_iter(text) {
            let label = m.as_str();
            if self.heading_split == HeadingSplit::FirstOccurrence
                && boundaries.iter().any(|(_, seen)| *seen == label)
            {
                tracing::debug!("Repeated heading '{}' at {} kept inside previous section", label, m.start());
                continue;
            }
            boundaries.push((m.start(), label));
        }
        boundaries
    }
}

/// Splits with the default duplicate-heading policy.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    SectionSplitter::new(HeadingSplit::default()).split(text)
}
