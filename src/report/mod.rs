// src/report/mod.rs
use std::collections::BTreeSet;

use serde::Serialize;

use crate::extractors::NO_POLICY;
use crate::pipeline::{ItemRow, ResultTable};

/// Aggregates shown next to the preview, always computed over the full table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub distinct_policies: usize,
    pub plates_found: usize,
    pub distinct_plates: usize,
    pub total_insured: f64,
    pub total_premium: f64,
}

impl Summary {
    pub fn from_table(table: &ResultTable) -> Self {
        let rows = table.rows();
        let policies: BTreeSet<&str> = rows
            .iter()
            .map(|row| row.header.policy.as_str())
            .filter(|policy| *policy != NO_POLICY)
            .collect();
        let plates: Vec<&str> = rows
            .iter()
            .map(|row| row.plate.as_str())
            .filter(|plate| !plate.is_empty())
            .collect();
        let distinct_plates = plates.iter().collect::<BTreeSet<_>>().len();

        Self {
            rows: rows.len(),
            distinct_policies: policies.len(),
            plates_found: plates.len(),
            distinct_plates,
            total_insured: rows.iter().map(|row| parse_amount(&row.insured_value)).sum(),
            total_premium: rows.iter().map(|row| parse_amount(&row.premium)).sum(),
        }
    }
}

/// Parses a localized amount (`1,234.56`). Empty or malformed values count as 0.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !cleaned.is_empty() {
                tracing::debug!("Unparseable amount '{}' counted as 0", raw);
            }
            0.0
        }
    }
}

/// Formats an amount with `,` thousands separators and two decimals.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Renders the summary cards as plain text.
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Pólizas únicas: {}\nPlacas encontradas: {}\nTotal Asegurado: S/. {}\nTotal Prima Neta: S/. {}\n",
        summary.distinct_policies,
        summary.plates_found,
        format_amount(summary.total_insured),
        format_amount(summary.total_premium),
    )
}

/// Renders preview rows as a tab-separated block with a header line.
pub fn render_preview(rows: &[ItemRow]) -> String {
    let mut out = crate::storage::COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&crate::storage::record(row).join("\t"));
        out.push('\n');
    }
    out
}
