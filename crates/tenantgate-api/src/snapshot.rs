//! Read-only cluster snapshot
//!
//! The orchestration backend owns the container and network registry. The
//! gate only needs a point-in-time view of it for each request, exposed
//! through [`ClusterSnapshot`].

use std::collections::BTreeMap;
use std::fmt;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Resource families that ownership can be asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A container, identified by its full ID
    Container,
    /// A network, identified by its ID
    Network,
    /// A volume, identified by its name
    Volume,
    /// An image, identified by name or ID
    Image,
    /// An exec session, identified by its ID
    Exec,
}

impl ResourceKind {
    /// Lowercase name of the resource kind
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Container => "container",
            ResourceKind::Network => "network",
            ResourceKind::Volume => "volume",
            ResourceKind::Image => "image",
            ResourceKind::Exec => "exec",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container as seen in the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Full container ID
    pub id: String,
    /// Container labels, including the tenancy label
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// IDs of exec sessions created in this container
    #[serde(default)]
    pub exec_ids: Vec<String>,
}

impl ContainerRecord {
    /// Create a container record with no labels or exec sessions
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add an exec session ID
    pub fn with_exec(mut self, exec_id: impl Into<String>) -> Self {
        self.exec_ids.push(exec_id.into());
        self
    }
}

/// A network as seen in the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Network ID
    pub id: String,
    /// Network name, tenant-scoped for tenant-created networks
    pub name: String,
}

impl NetworkRecord {
    /// Create a network record
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Point-in-time view of cluster resources
///
/// Implementations must be cheap to query repeatedly within one request and
/// must not mutate the underlying registry.
#[cfg_attr(test, automock)]
pub trait ClusterSnapshot: Send + Sync {
    /// All containers known to the cluster
    fn containers(&self) -> Vec<ContainerRecord>;

    /// All networks known to the cluster
    fn networks(&self) -> Vec<NetworkRecord>;
}

/// Owned snapshot, for collaborators that materialize the view up front
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotView {
    /// Containers in the snapshot
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,
    /// Networks in the snapshot
    #[serde(default)]
    pub networks: Vec<NetworkRecord>,
}

impl ClusterSnapshot for SnapshotView {
    fn containers(&self) -> Vec<ContainerRecord> {
        self.containers.clone()
    }

    fn networks(&self) -> Vec<NetworkRecord> {
        self.networks.clone()
    }
}
