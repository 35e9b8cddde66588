//! Tenant ownership verification
//!
//! Decides whether a tenant may act on a single, fully resolved resource by
//! scanning a [`ClusterSnapshot`]:
//!
//! - **container**: the container's tenancy label must equal the tenant
//! - **network**: the network's name must carry the tenant's name prefix
//! - **exec**: the container owning the exec session must belong to the tenant
//!
//! Any other resource kind is denied with a warning. Scans are linear; the
//! snapshot is small and lives for a single request.

use std::fmt;

use tenantgate_common::{network_prefix, TenancyConfig};
use tracing::{debug, warn};

use crate::snapshot::{ClusterSnapshot, ContainerRecord, ResourceKind};

/// Why an ownership check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No resource with the requested ID exists in the snapshot
    NotFound,
    /// The resource exists but belongs to another tenant
    TenantMismatch,
    /// Ownership checks are not implemented for this resource kind
    UnsupportedResource,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NotFound => write!(f, "resource not found"),
            DenialReason::TenantMismatch => write!(f, "resource owned by another tenant"),
            DenialReason::UnsupportedResource => {
                write!(f, "ownership checks not supported for this resource type")
            }
        }
    }
}

/// Checks tenant ownership of resources in a cluster snapshot
#[derive(Debug, Clone)]
pub struct OwnershipVerifier {
    tenancy_label: String,
}

impl Default for OwnershipVerifier {
    fn default() -> Self {
        Self::new(&TenancyConfig::default())
    }
}

impl OwnershipVerifier {
    /// Create a verifier reading the tenancy label named in `config`
    pub fn new(config: &TenancyConfig) -> Self {
        Self {
            tenancy_label: config.tenancy_label.clone(),
        }
    }

    /// Whether `tenant_id` owns the resource
    pub fn verify<S>(
        &self,
        snapshot: &S,
        kind: ResourceKind,
        resource_id: &str,
        tenant_id: &str,
    ) -> bool
    where
        S: ClusterSnapshot + ?Sized,
    {
        self.check(snapshot, kind, resource_id, tenant_id).is_ok()
    }

    /// Check ownership, reporting why access was denied
    pub fn check<S>(
        &self,
        snapshot: &S,
        kind: ResourceKind,
        resource_id: &str,
        tenant_id: &str,
    ) -> Result<(), DenialReason>
    where
        S: ClusterSnapshot + ?Sized,
    {
        let result = match kind {
            ResourceKind::Container => self.check_container(snapshot, resource_id, tenant_id),
            ResourceKind::Network => check_network(snapshot, resource_id, tenant_id),
            ResourceKind::Exec => self.check_exec(snapshot, resource_id, tenant_id),
            ResourceKind::Volume | ResourceKind::Image => {
                warn!(
                    kind = %kind,
                    resource = %resource_id,
                    "Unsupported resource type for authorization"
                );
                Err(DenialReason::UnsupportedResource)
            }
        };

        debug!(
            kind = %kind,
            resource = %resource_id,
            tenant = %tenant_id,
            allowed = result.is_ok(),
            "Ownership check"
        );

        result
    }

    fn check_container<S>(
        &self,
        snapshot: &S,
        container_id: &str,
        tenant_id: &str,
    ) -> Result<(), DenialReason>
    where
        S: ClusterSnapshot + ?Sized,
    {
        let containers = snapshot.containers();
        let container = containers
            .iter()
            .find(|c| c.id == container_id)
            .ok_or(DenialReason::NotFound)?;
        self.owned_by(container, tenant_id)
    }

    fn check_exec<S>(
        &self,
        snapshot: &S,
        exec_id: &str,
        tenant_id: &str,
    ) -> Result<(), DenialReason>
    where
        S: ClusterSnapshot + ?Sized,
    {
        let containers = snapshot.containers();
        let container = containers
            .iter()
            .find(|c| c.exec_ids.iter().any(|id| id == exec_id))
            .ok_or(DenialReason::NotFound)?;
        self.owned_by(container, tenant_id)
    }

    /// Exact match on the tenancy label; a missing label never matches
    fn owned_by(&self, container: &ContainerRecord, tenant_id: &str) -> Result<(), DenialReason> {
        match container.labels.get(&self.tenancy_label) {
            Some(owner) if owner == tenant_id => Ok(()),
            _ => Err(DenialReason::TenantMismatch),
        }
    }
}

fn check_network<S>(snapshot: &S, network_id: &str, tenant_id: &str) -> Result<(), DenialReason>
where
    S: ClusterSnapshot + ?Sized,
{
    let networks = snapshot.networks();
    let network = networks
        .iter()
        .find(|n| n.id == network_id)
        .ok_or(DenialReason::NotFound)?;
    if network.name.starts_with(&network_prefix(tenant_id)) {
        Ok(())
    } else {
        Err(DenialReason::TenantMismatch)
    }
}

/// Whether `tenant_id` owns the resource, using the default tenancy label
pub fn is_resource_owner<S>(
    snapshot: &S,
    kind: ResourceKind,
    resource_id: &str,
    tenant_id: &str,
) -> bool
where
    S: ClusterSnapshot + ?Sized,
{
    OwnershipVerifier::default().verify(snapshot, kind, resource_id, tenant_id)
}
