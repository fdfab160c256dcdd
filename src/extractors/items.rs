// src/extractors/items.rs
use super::patterns::{AMOUNT_TOKEN_RE, BULLET_RE, ITEM_LINE_RE};
use crate::pipeline::config::ExtractionConfig;

/// How an item's figures were recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// Marker, description and both amounts on one line.
    SameLine,
    /// Amounts found on a following line within the lookahead window.
    Lookahead,
    /// Bullet line with no amounts found; value and premium are empty.
    Unpriced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub description: String,
    pub value: String,
    pub premium: String,
    /// The item line plus the continuation lines after it (up to the next
    /// bullet, bounded by the lookahead window regardless of
    /// `stop_at_next_bullet`).
    pub block: String,
    pub source: ItemSource,
}

pub struct ItemExtractor {
    multiline_fallback: bool,
    lookahead_window: usize,
    stop_at_next_bullet: bool,
}

impl ItemExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            multiline_fallback: config.multiline_fallback,
            lookahead_window: config.lookahead_window,
            stop_at_next_bullet: config.stop_at_next_bullet,
        }
    }

    /// Walks the section line by line and recovers its item rows in order.
    pub fn extract(&self, section_label: &str, content: &str) -> Vec<LineItem> {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let mut items = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            if let Some(caps) = ITEM_LINE_RE.captures(line) {
                items.push(LineItem {
                    description: caps["description"].trim().to_string(),
                    value: caps["value"].to_string(),
                    premium: caps["premium"].to_string(),
                    block: self.block(&lines, index),
                    source: ItemSource::SameLine,
                });
                continue;
            }

            if !BULLET_RE.is_match(line) {
                tracing::trace!("{}: skipping line '{}'", section_label, line);
                continue;
            }

            if !self.multiline_fallback {
                tracing::trace!("{}: bullet without amounts, fallback disabled: '{}'", section_label, line);
                continue;
            }

            let item = match self.lookahead_amounts(&lines, index) {
                Some((value, premium)) => LineItem {
                    description: line.trim().to_string(),
                    value,
                    premium,
                    block: self.block(&lines, index),
                    source: ItemSource::Lookahead,
                },
                None => LineItem {
                    description: line.trim().to_string(),
                    value: String::new(),
                    premium: String::new(),
                    block: self.block(&lines, index),
                    source: ItemSource::Unpriced,
                },
            };
            tracing::debug!("{}: fallback item '{}' ({:?})", section_label, item.description, item.source);
            items.push(item);
        }

        tracing::debug!("{}: {} items", section_label, items.len());
        items
    }

    /// The lookahead window: up to `lookahead_window` lines after `index`.
    fn window(&self, lines: &[&str], index: usize) -> std::ops::Range<usize> {
        let limit = (index + 1 + self.lookahead_window).min(lines.len());
        (index + 1).min(limit)..limit
    }

    /// The window cut short at the next bullet line.
    fn continuation(&self, lines: &[&str], index: usize) -> std::ops::Range<usize> {
        let window = self.window(lines, index);
        let end = window
            .clone()
            .find(|&j| BULLET_RE.is_match(lines[j]))
            .unwrap_or(window.end);
        window.start..end
    }

    /// First line in the window carrying two amount tokens; the first two
    /// tokens are the insured value and premium.
    fn lookahead_amounts(&self, lines: &[&str], index: usize) -> Option<(String, String)> {
        let mut scan = if self.stop_at_next_bullet {
            self.continuation(lines, index)
        } else {
            self.window(lines, index)
        };
        scan.find_map(|j| {
            let mut tokens = AMOUNT_TOKEN_RE.find_iter(lines[j]);
            match (tokens.next(), tokens.next()) {
                (Some(value), Some(premium)) => {
                    Some((value.as_str().to_string(), premium.as_str().to_string()))
                }
                _ => None,
            }
        })
    }

    fn block(&self, lines: &[&str], index: usize) -> String {
        std::iter::once(index)
            .chain(self.continuation(lines, index))
            .map(|j| lines[j].trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Extracts items with the default configuration.
pub fn extract_items(section_label: &str, content: &str) -> Vec<LineItem> {
    ItemExtractor::new(&ExtractionConfig::default()).extract(section_label, content)
}
