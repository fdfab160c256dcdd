// src/pipeline/config.rs
use clap::ValueEnum;

pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 4;

/// How a section heading that repeats verbatim later in the document is
/// treated.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum HeadingSplit {
    /// Only the first occurrence of a heading text starts a section; later
    /// repeats stay inside the section that contains them.
    #[default]
    FirstOccurrence,
    /// Every heading occurrence starts a new section, so labels may repeat.
    OccurrenceOrder,
}

/// The text the plate extractor reads for each item.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum PlateSource {
    /// The item description only.
    #[default]
    Description,
    /// The item line plus its continuation lines.
    ItemBlock,
}

impl HeadingSplit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstOccurrence => "first-occurrence",
            Self::OccurrenceOrder => "occurrence-order",
        }
    }
}

impl PlateSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::ItemBlock => "item-block",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub multiline_fallback: bool,
    pub lookahead_window: usize,
    /// Cut the amount lookahead short at the next bullet line. Off by
    /// default: the window length is the only bound.
    pub stop_at_next_bullet: bool,
    pub heading_split: HeadingSplit,
    pub plate_source: PlateSource,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            multiline_fallback: true,
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            stop_at_next_bullet: false,
            heading_split: HeadingSplit::default(),
            plate_source: PlateSource::default(),
        }
    }
}
