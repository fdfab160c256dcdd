// src/extractors/header.rs
use serde::Serialize;

use super::patterns::{CLIENT_RE, POLICY_RE, VALIDITY_RE};

pub const NO_POLICY: &str = "SIN_POLIZA";
pub const NO_CLIENT: &str = "SIN_CLIENTE";
pub const NO_VALIDITY: &str = "SIN_VIGENCIA";

/// Document-level fields. Always fully populated: a missed field carries its
/// sentinel instead of being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFields {
    pub policy: String,
    pub client: String,
    pub validity: String,
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self {
            policy: NO_POLICY.to_string(),
            client: NO_CLIENT.to_string(),
            validity: NO_VALIDITY.to_string(),
        }
    }
}

/// Scans the whole document text for the policy id, client name and
/// validity range. Never fails.
pub fn extract_header(text: &str) -> HeaderFields {
    let mut header = HeaderFields::default();

    if let Some(policy) = POLICY_RE.captures(text).and_then(|c| c.get(1)) {
        header.policy = policy.as_str().to_string();
    }

    if let Some(client) = CLIENT_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_end_matches(',').trim_end())
        .filter(|client| !client.is_empty())
    {
        header.client = client.to_string();
    }

    if let Some(caps) = VALIDITY_RE.captures(text) {
        header.validity = format!("{} - {}", &caps[1], &caps[2]);
    }

    tracing::debug!(
        "Header fields: policy={} client={} validity={}",
        header.policy,
        header.client,
        header.validity
    );
    header
}
