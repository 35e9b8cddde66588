//! Tenancy configuration
//!
//! Defaults match the labels and headers the rest of the platform writes.
//! Each value can be overridden from the environment for deployments that
//! rename them.

use crate::{TENANCY_LABEL, TENANCY_LABEL_ENV, TENANT_HEADER_ENV, TENANT_ID_HEADER};

/// Names used to recognize tenant ownership on requests and resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenancyConfig {
    /// Container label key holding the owning tenant
    pub tenancy_label: String,
    /// Request header holding the authenticated tenant identity
    pub tenant_header: String,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            tenancy_label: TENANCY_LABEL.to_string(),
            tenant_header: TENANT_ID_HEADER.to_string(),
        }
    }
}

impl TenancyConfig {
    /// Load configuration from the process environment
    ///
    /// Unset or blank variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            tenancy_label: non_blank(lookup(TENANCY_LABEL_ENV)).unwrap_or(defaults.tenancy_label),
            tenant_header: non_blank(lookup(TENANT_HEADER_ENV)).unwrap_or(defaults.tenant_header),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
