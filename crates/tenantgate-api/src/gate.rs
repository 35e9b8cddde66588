//! Combined classification and tenant authorization
//!
//! A [`Gate`] runs the per-request checks in one call: classify the request,
//! read the caller's tenant from the identity header, and for commands that
//! address a single container, network or exec session, verify the tenant
//! owns it. On the way back, [`Gate::finish_response`] sanitizes the backend
//! body for that tenant.

use axum::http::{HeaderMap, Request};
use tenantgate_common::TenancyConfig;
use tracing::debug;

use crate::classifier::Classifier;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::ownership::OwnershipVerifier;
use crate::rewrite::resolved_resource;
use crate::sanitize::{filter_networks, scrub_labels};
use crate::snapshot::ClusterSnapshot;

/// Extract the tenant identity from the configured header
///
/// Blank values count as missing.
pub fn extract_tenant_id<'h>(headers: &'h HeaderMap, header_name: &str) -> Option<&'h str> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Outcome of a successful authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    /// Classified command
    pub command: Command,
    /// Tenant the request acts for
    pub tenant_id: String,
    /// Resource whose ownership was verified, if the command needed one
    pub target: Option<String>,
}

/// Per-request tenant isolation checks
#[derive(Debug, Clone)]
pub struct Gate<'c> {
    classifier: &'c Classifier,
    verifier: OwnershipVerifier,
    config: TenancyConfig,
}

impl Gate<'static> {
    /// Create a gate backed by the process-wide classifier
    pub fn new(config: TenancyConfig) -> Self {
        Self::with_classifier(Classifier::shared(), config)
    }
}

impl<'c> Gate<'c> {
    /// Create a gate using an explicitly owned classifier
    pub fn with_classifier(classifier: &'c Classifier, config: TenancyConfig) -> Self {
        Self {
            classifier,
            verifier: OwnershipVerifier::new(&config),
            config,
        }
    }

    /// Tenancy settings this gate enforces
    pub fn config(&self) -> &TenancyConfig {
        &self.config
    }

    /// Classify and authorize a request
    ///
    /// Fails with:
    /// - [`Error::UnsupportedCommand`] when no rule matches
    /// - [`Error::Unauthorized`] when the tenant header is missing
    /// - [`Error::InvalidRequest`] when an item command names no resource
    /// - [`Error::Forbidden`] when the tenant doesn't own the resource
    ///
    /// A [`ResolvedResource`](crate::rewrite::ResolvedResource) extension,
    /// when present, takes precedence over the identifier in the path.
    pub fn authorize<B, S>(&self, request: &Request<B>, snapshot: &S) -> Result<Authorized>
    where
        S: ClusterSnapshot + ?Sized,
    {
        let classification = self.classifier.classify_request(request);
        let command = classification.command;

        if !command.is_supported() {
            return Err(Error::unsupported_command(format!(
                "{} {}",
                request.method(),
                request.uri().path()
            )));
        }

        let tenant_id = extract_tenant_id(request.headers(), &self.config.tenant_header)
            .ok_or_else(|| {
                Error::unauthorized(format!("Missing {} header", self.config.tenant_header))
            })?;

        let target = match command.ownership_kind() {
            Some(kind) => {
                let resource_id = resolved_resource(request)
                    .or(classification.target)
                    .ok_or_else(|| {
                        Error::invalid_request(format!("{command} request names no {kind}"))
                    })?;

                self.verifier
                    .check(snapshot, kind, resource_id, tenant_id)
                    .map_err(|reason| {
                        Error::forbidden(format!("{kind} {resource_id}: {reason}"))
                    })?;

                Some(resource_id.to_string())
            }
            None => None,
        };

        debug!(
            command = %command,
            tenant = %tenant_id,
            target = ?target,
            "Request authorized"
        );

        Ok(Authorized {
            command,
            tenant_id: tenant_id.to_string(),
            target,
        })
    }

    /// Sanitize a backend response body before it reaches the tenant
    ///
    /// Network listings are narrowed to the tenant's networks first; every
    /// body then has its tenancy labels scrubbed.
    pub fn finish_response(
        &self,
        command: Command,
        tenant_id: &str,
        body: &[u8],
    ) -> Result<Vec<u8>> {
        let scrubbed = if command == Command::NetworksList {
            let filtered = filter_networks(body, tenant_id)?;
            scrub_labels(&filtered, &self.config.tenancy_label, tenant_id)
        } else {
            scrub_labels(body, &self.config.tenancy_label, tenant_id)
        };
        Ok(scrubbed)
    }
}

/// Classify and authorize a request with default settings
///
/// Convenience wrapper over [`Gate::authorize`] using the shared classifier.
pub fn authorize_request<B, S>(
    config: &TenancyConfig,
    request: &Request<B>,
    snapshot: &S,
) -> Result<Authorized>
where
    S: ClusterSnapshot + ?Sized,
{
    Gate::new(config.clone()).authorize(request, snapshot)
}
