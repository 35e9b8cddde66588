//! Common types for tenantgate: constants, configuration, and naming
//!
//! Shared by the classifier, the ownership checks and the response
//! sanitizer in `tenantgate-api`.

#![deny(missing_docs)]

pub mod config;
pub mod naming;
pub mod telemetry;

pub use config::TenancyConfig;
pub use naming::{network_prefix, random_volume_name, scoped_name, strip_scoped_name};

/// Label key recording which tenant owns a container
///
/// Written on every container created through the gate and compared verbatim
/// against the caller's tenant identity during ownership checks.
pub const TENANCY_LABEL: &str = "com.swarm.tenant.0";

/// Header carrying the authenticated tenant identity
///
/// Populated upstream by the authentication layer; this workspace only reads it.
pub const TENANT_ID_HEADER: &str = "X-Auth-TenantId";

/// Environment variable overriding [`TENANCY_LABEL`]
pub const TENANCY_LABEL_ENV: &str = "TENANTGATE_TENANCY_LABEL";

/// Environment variable overriding [`TENANT_ID_HEADER`]
pub const TENANT_HEADER_ENV: &str = "TENANTGATE_TENANT_HEADER";
