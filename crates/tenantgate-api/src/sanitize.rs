//! Response sanitizing
//!
//! Two independent post-processing steps applied before a backend response
//! reaches the client:
//!
//! - [`scrub_labels`] removes tenancy markers from a serialized body
//! - [`filter_networks`] narrows a network listing to the caller's networks
//!
//! The label scrub works on raw bytes rather than parsed JSON. It must run
//! after encoding, and its three replacements must run in order: the label
//! key becomes a single space, the tenant token is removed, and only then is
//! the leftover `," ":" "` pair recognizable and dropped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tenantgate_common::strip_scoped_name;
use thiserror::Error;
use tracing::{debug, error};

/// Empty label pair left behind once key and tenant token are masked
const EMPTY_LABEL_ARTIFACT: &[u8] = br#"," ":" ""#;

/// Errors from response filtering
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// The backend body was not a network list
    #[error("failed to decode network list: {0}")]
    Decode(String),

    /// The filtered list could not be encoded
    #[error("failed to encode network list: {0}")]
    Encode(String),
}

/// Strip tenancy metadata from a serialized response body
///
/// In order:
/// 1. every occurrence of `tenancy_label` becomes a single space
/// 2. every occurrence of `tenant_id` is removed (skipped when empty)
/// 3. every `," ":" "` is removed
pub fn scrub_labels(body: &[u8], tenancy_label: &str, tenant_id: &str) -> Vec<u8> {
    let masked = replace_all(body, tenancy_label.as_bytes(), b" ");
    let untokened = replace_all(&masked, tenant_id.as_bytes(), b"");
    let scrubbed = replace_all(&untokened, EMPTY_LABEL_ARTIFACT, b"");
    debug!(
        before = body.len(),
        after = scrubbed.len(),
        "Clean up labeling done"
    );
    scrubbed
}

/// A network entry in a list response
///
/// Only the name is interpreted; every other field passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NetworkEntry {
    #[serde(rename = "Name", default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Keep only the tenant's networks and strip their scoping prefix
///
/// Names are compared after removing any `node/` qualifier (everything up to
/// and including the last `/`). A `null` body is treated as an empty list.
/// The output is a JSON array followed by a newline.
///
/// Errors are logged and returned; callers must not forward a partial body.
pub fn filter_networks(body: &[u8], tenant_id: &str) -> Result<Vec<u8>, SanitizeError> {
    let networks: Option<Vec<NetworkEntry>> = serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "Failed to decode network list");
        SanitizeError::Decode(e.to_string())
    })?;

    let total = networks.as_ref().map_or(0, Vec::len);
    let candidates: Vec<NetworkEntry> = networks
        .unwrap_or_default()
        .into_iter()
        .filter_map(|mut network| {
            let local = unqualified_name(&network.name);
            let stripped = strip_scoped_name(tenant_id, local)?.to_string();
            network.name = stripped;
            Some(network)
        })
        .collect();

    debug!(
        tenant = %tenant_id,
        total,
        kept = candidates.len(),
        "Filtered network list"
    );

    let mut out = serde_json::to_vec(&candidates).map_err(|e| {
        error!(error = %e, "Failed to encode network list");
        SanitizeError::Encode(e.to_string())
    })?;
    out.push(b'\n');
    Ok(out)
}

/// Read a `null` name as empty so the entry is dropped, not the whole list
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Drop a `node/` style qualifier from a network name
fn unqualified_name(name: &str) -> &str {
    name.rsplit_once('/').map_or(name, |(_, local)| local)
}

/// Replace every non-overlapping occurrence of `needle`, scanning left to right
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while !rest.is_empty() {
        if rest.starts_with(needle) {
            out.extend_from_slice(replacement);
            rest = &rest[needle.len()..];
        } else {
            out.push(rest[0]);
            rest = &rest[1..];
        }
    }
    out
}
