//! Tenant isolation for a multi-tenant Swarm API
//!
//! Sits between an authenticated client and the container backend. Every
//! request is classified into a [`Command`], checked against the caller's
//! ownership of the resource it addresses, and the backend's answer is
//! stripped of tenancy metadata before it goes back.
//!
//! # Architecture
//!
//! ```text
//! client ──► classify ──► ownership ──► backend ──► sanitize ──► client
//!            (Command)    (snapshot)                (labels, networks)
//! ```
//!
//! # Isolation
//!
//! - Containers carry the tenant in the `com.swarm.tenant.0` label
//! - Exec sessions belong to the tenant owning their container
//! - Networks are named `s<tenant>-<name>`

#![deny(missing_docs)]

pub mod classifier;
pub mod command;
pub mod error;
pub mod gate;
pub mod matcher;
pub mod ownership;
pub mod rewrite;
pub mod sanitize;
pub mod snapshot;

pub use classifier::{Classification, Classifier, CommandTable, Rule};
pub use command::Command;
pub use error::{Error, Result};
pub use gate::{authorize_request, extract_tenant_id, Authorized, Gate};
pub use ownership::{is_resource_owner, DenialReason, OwnershipVerifier};
pub use rewrite::{resolved_resource, rewrite_request, ResolvedResource};
pub use sanitize::{filter_networks, scrub_labels, SanitizeError};
pub use snapshot::{ClusterSnapshot, ContainerRecord, NetworkRecord, ResourceKind, SnapshotView};
