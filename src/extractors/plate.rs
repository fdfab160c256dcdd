// src/extractors/plate.rs
use super::patterns::PLATE_RE;

/// Returns the code after the first `PLACA:` label, or an empty string.
pub fn extract_plate(text: &str) -> String {
    PLATE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
