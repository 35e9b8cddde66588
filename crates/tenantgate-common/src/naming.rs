//! Tenant-scoped resource names
//!
//! Networks created on behalf of a tenant carry a deterministic prefix so they
//! can be recognized (and stripped) on the way back out:
//!
//! ```text
//! tenant "Acme"  ──►  prefix "sacme-"  ──►  network "sacme-backend"
//! ```
//!
//! The prefix lowercases the tenant identity, so tenants differing only by
//! case share a prefix. That collision is accepted as-is.

use rand::Rng;

/// Alphabet for generated volume names
const VOLUME_NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Build the name prefix for a tenant: `"s" + lowercase(tenant) + "-"`
///
/// # Examples
///
/// ```
/// use tenantgate_common::network_prefix;
///
/// assert_eq!(network_prefix("Foo"), "sfoo-");
/// assert_eq!(network_prefix("foo"), "sfoo-");
/// ```
pub fn network_prefix(tenant_id: &str) -> String {
    format!("s{}-", tenant_id.to_lowercase())
}

/// Scope a client-supplied name to a tenant
pub fn scoped_name(tenant_id: &str, name: &str) -> String {
    format!("{}{}", network_prefix(tenant_id), name)
}

/// Strip the tenant prefix from a scoped name
///
/// Returns `None` when the name does not belong to the tenant.
pub fn strip_scoped_name<'a>(tenant_id: &str, name: &'a str) -> Option<&'a str> {
    name.strip_prefix(network_prefix(tenant_id).as_str())
}

/// Generate a random name for a volume created without one
///
/// Letters only. The caller appends or prepends the tenant scoping.
pub fn random_volume_name(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| VOLUME_NAME_ALPHABET[rng.gen_range(0..VOLUME_NAME_ALPHABET.len())] as char)
        .collect()
}
