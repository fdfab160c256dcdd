// src/extractors/patterns.rs
//
// One compiled rule per field. Each rule is tested on its own below so the
// edge-case policy of the extractors stays auditable.

use once_cell::sync::Lazy;
use regex::Regex;

/// A decimal amount: optional `,` thousands groups, exactly two fraction digits.
pub const AMOUNT: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}";

/// Uppercase letters accepted in client names and section labels.
const UPPER: &str = "A-ZÁÉÍÓÚÜÑ";

// --- Header fields ---

pub static POLICY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:P[óo]liza|Policy)\b\s*(?:N(?:[°º]|ro\.?|o\.)\s*)?:?\s*(\d+)")
        .expect("Failed to compile POLICY_RE")
});

pub static CLIENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bCliente\b[ \t]*:?[ \t]*([{UPPER} ,]+)"))
        .expect("Failed to compile CLIENT_RE")
});

pub static VALIDITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bVigencia\b\s*:?\s*(?:del?\s+)?(\d{2}/\d{2}/\d{4})\s*(?:-|al?)\s*(\d{2}/\d{2}/\d{4})")
        .expect("Failed to compile VALIDITY_RE")
});

// --- Sections ---

pub static SECTION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"SECCI[OÓ]N:[ \t]*\d{{3}}[ \t]+[{UPPER}]+(?:[ \t]+[{UPPER}]+)*"
    ))
    .expect("Failed to compile SECTION_HEADING_RE")
});

// --- Line items ---

/// `1.` or `A.` at the start of a line.
pub static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+|[A-Z])\.(?:\s|$)").expect("Failed to compile BULLET_RE")
});

/// Marker, description, insured value and premium consuming the whole line.
pub static ITEM_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*(?:\d+|[A-Z])\.\s+(?P<description>.+?)\s+(?P<value>{AMOUNT})\s+(?P<premium>{AMOUNT})\s*$"
    ))
    .expect("Failed to compile ITEM_LINE_RE")
});

pub static AMOUNT_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b{AMOUNT}\b")).expect("Failed to compile AMOUNT_TOKEN_RE")
});

// --- Derived fields ---

pub static PLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PLACA:\s*([A-Z0-9]+)").expect("Failed to compile PLATE_RE")
});
