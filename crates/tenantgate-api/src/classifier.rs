//! Command classification
//!
//! Turns (method, path, request URI) into exactly one [`Command`]. Rules are
//! evaluated in a single fixed order and the first that applies wins:
//!
//! | # | Method     | Rule                                                          |
//! |---|------------|---------------------------------------------------------------|
//! | 1 | DELETE     | container > network > image > volume match → `<family>delete` |
//! | 2a| GET, POST  | container `{id}/{sub}` → `container<sub>`; `{id}` → `containers<id>` |
//! | 2b| GET, POST  | image, same shapes → `image<sub>` / `images<id>`             |
//! | 2c| GET, POST  | path ends in `/networks` → `networkslist`                     |
//! | 2d| GET, POST  | network `{id}/{sub}` → create or inspect; `{id}` → `network<id>` |
//! | 2e| GET, POST  | ends in `/volumes` or `/volumes/`, or URI has `/volumes?` → `volumeslist` |
//! | 2f| GET, POST  | volume match → `volumecreate` or `volumeinspect`             |
//! | 2g| GET, POST  | generic `/{head}/{action}` → `exec<action>` or `<action>`    |
//! | 3 | other      | unsupported                                                   |
//!
//! Collection endpoints share prefixes with item endpoints, so the suffix
//! checks (2c, 2e) run before the corresponding family patterns, and every
//! named family runs before the generic fallback. Composed identifiers are
//! resolved through a [`CommandTable`]; anything outside the vocabulary is
//! [`Command::Unsupported`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use axum::http::{Method, Request};
use tracing::debug;

use crate::command::Command;
use crate::matcher::{Family, PathMatcher, PathMatches};

/// Generic actions that address an exec session
const EXEC_ACTIONS: [&str; 3] = ["start", "resize", "json"];

/// Process-wide classifier, compiled on first use
static SHARED: LazyLock<Classifier> = LazyLock::new(Classifier::new);

// =============================================================================
// Command Table
// =============================================================================

/// Immutable mapping from identifier strings to commands
#[derive(Debug, Clone)]
pub struct CommandTable {
    by_name: HashMap<&'static str, Command>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    /// Build the table from the full command vocabulary
    pub fn new() -> Self {
        let by_name = Command::ALL
            .iter()
            .map(|command| (command.as_str(), *command))
            .collect();
        Self { by_name }
    }

    /// Look up an identifier; unknown identifiers are [`Command::Unsupported`]
    pub fn resolve(&self, name: &str) -> Command {
        self.by_name
            .get(name)
            .copied()
            .unwrap_or(Command::Unsupported)
    }

    /// Number of known identifiers
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// =============================================================================
// Classification
// =============================================================================

/// The routing rule that decided a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// DELETE on a family match
    Delete(Family),
    /// Container `{id}/{sub}` shape
    ContainerItem,
    /// Container `{id}` shape (`containers` + id)
    ContainerCollection,
    /// Image `{id}/{sub}` shape
    ImageItem,
    /// Image `{id}` shape (`images` + id)
    ImageCollection,
    /// Path ends in the networks collection
    NetworksList,
    /// Network `{id}/{sub}` shape
    NetworkItem,
    /// Network `{id}` shape (`network` + id)
    ///
    /// Only the literal segments `create`, `connect` and `disconnect` resolve
    /// here. A real network id composes an identifier outside the vocabulary,
    /// so inspecting a network by id is unsupported.
    NetworkBare,
    /// Path ends in the volumes collection or queries it
    VolumesList,
    /// Any volume family match
    Volume,
    /// Generic two-segment fallback
    Generic,
    /// GET/POST/DELETE path that no pattern matched
    Unmatched,
    /// Method outside DELETE, GET and POST
    UnsupportedMethod,
}

/// Outcome of classifying one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'p> {
    /// The canonical command
    pub command: Command,
    /// Which rule produced it
    pub rule: Rule,
    /// Identifier of the resource the path refers to, when it names one
    pub target: Option<&'p str>,
}

/// Identifier chosen by a rule, before resolution against the table
struct Route<'p> {
    name: Cow<'p, str>,
    rule: Rule,
    target: Option<&'p str>,
}

impl<'p> Route<'p> {
    fn fixed(command: Command, rule: Rule, target: Option<&'p str>) -> Self {
        Self {
            name: Cow::Borrowed(command.as_str()),
            rule,
            target,
        }
    }

    fn composed(name: String, rule: Rule, target: Option<&'p str>) -> Self {
        Self {
            name: Cow::Owned(name),
            rule,
            target,
        }
    }
}

/// Classifies requests against the fixed API surface
///
/// Holds compiled patterns and the command table; both are immutable after
/// construction, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    matcher: PathMatcher,
    table: CommandTable,
}

impl Classifier {
    /// Compile patterns and build the command table
    pub fn new() -> Self {
        Self {
            matcher: PathMatcher::new(),
            table: CommandTable::new(),
        }
    }

    /// Process-wide instance, initialized exactly once
    pub fn shared() -> &'static Classifier {
        &SHARED
    }

    /// The command table used for resolution
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Classify an HTTP request
    pub fn classify_request<'r, B>(&self, request: &'r Request<B>) -> Classification<'r> {
        let uri = request.uri();
        let path = uri.path();
        let request_uri = uri.path_and_query().map_or(path, |pq| pq.as_str());
        self.classify(request.method(), path, request_uri)
    }

    /// Classify a request and return only the command
    pub fn command(&self, method: &Method, path: &str, request_uri: &str) -> Command {
        self.classify(method, path, request_uri).command
    }

    /// Classify from method, path and raw request URI (path plus query)
    pub fn classify<'p>(
        &self,
        method: &Method,
        path: &'p str,
        request_uri: &str,
    ) -> Classification<'p> {
        let matches = self.matcher.match_all(path);

        let route = if *method == Method::DELETE {
            route_delete(&matches)
        } else if *method == Method::GET || *method == Method::POST {
            route_read_write(path, request_uri, &matches)
        } else {
            None
        };

        let classification = match route {
            Some(route) => Classification {
                command: self.table.resolve(&route.name),
                rule: route.rule,
                target: route.target,
            },
            None => Classification {
                command: Command::Unsupported,
                rule: if is_routed_method(method) {
                    Rule::Unmatched
                } else {
                    Rule::UnsupportedMethod
                },
                target: None,
            },
        };

        debug!(
            method = %method,
            path = %path,
            command = %classification.command,
            rule = ?classification.rule,
            target = ?classification.target,
            "Classified request"
        );

        classification
    }
}

fn is_routed_method(method: &Method) -> bool {
    *method == Method::DELETE || *method == Method::GET || *method == Method::POST
}

/// Rule 1: DELETE
fn route_delete<'p>(matches: &PathMatches<'p>) -> Option<Route<'p>> {
    [
        (Family::Container, Command::ContainerDelete),
        (Family::Network, Command::NetworkDelete),
        (Family::Image, Command::ImageDelete),
        (Family::Volume, Command::VolumeDelete),
    ]
    .into_iter()
    .find_map(|(family, command)| {
        matches
            .family(family)
            .map(|m| Route::fixed(command, Rule::Delete(family), m.resource_id()))
    })
}

/// Rule 2: GET and POST
fn route_read_write<'p>(
    path: &'p str,
    request_uri: &str,
    matches: &PathMatches<'p>,
) -> Option<Route<'p>> {
    // 2a, 2b: container and image families share the same two-branch shape
    for (family, item_rule, collection_rule) in [
        (Family::Container, Rule::ContainerItem, Rule::ContainerCollection),
        (Family::Image, Rule::ImageItem, Rule::ImageCollection),
    ] {
        if let Some(m) = matches.family(family) {
            if !m.subaction.is_empty() {
                return Some(Route::composed(
                    format!("{}{}", family.singular(), m.subaction),
                    item_rule,
                    m.resource_id(),
                ));
            }
            if !m.bare_id.is_empty() {
                return Some(Route::composed(
                    format!("{}{}", family.collection(), m.bare_id),
                    collection_rule,
                    None,
                ));
            }
        }
    }

    // 2c
    if path.ends_with("/networks") {
        return Some(Route::fixed(Command::NetworksList, Rule::NetworksList, None));
    }

    // 2d
    if let Some(m) = matches.networks {
        if !m.subaction.is_empty() {
            let command = if m.subaction == "create" {
                Command::NetworkCreate
            } else {
                Command::NetworkInspect
            };
            return Some(Route::fixed(command, Rule::NetworkItem, m.resource_id()));
        }
        return Some(Route::composed(
            format!("network{}", m.bare_id),
            Rule::NetworkBare,
            m.resource_id(),
        ));
    }

    // 2e
    if path.ends_with("/volumes")
        || path.ends_with("/volumes/")
        || request_uri.contains("/volumes?")
    {
        return Some(Route::fixed(Command::VolumesList, Rule::VolumesList, None));
    }

    // 2f
    if let Some(m) = matches.volumes {
        let command = if m.action_segment() == "create" {
            Command::VolumeCreate
        } else {
            Command::VolumeInspect
        };
        return Some(Route::fixed(command, Rule::Volume, m.resource_id()));
    }

    // 2g
    matches.generic.map(|g| {
        if EXEC_ACTIONS.contains(&g.action) {
            Route::composed(format!("exec{}", g.action), Rule::Generic, g.resource_id())
        } else {
            Route {
                name: Cow::Borrowed(g.action),
                rule: Rule::Generic,
                target: None,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(method: Method, path: &str) -> Command {
        Classifier::new().command(&method, path, path)
    }

    fn rule_for(method: Method, path: &str) -> Rule {
        Classifier::new().classify(&method, path, path).rule
    }

    // =========================================================================
    // Command Table Tests
    // =========================================================================

    #[test]
    fn test_table_resolves_every_command() {
        let table = CommandTable::new();
        assert_eq!(table.len(), Command::ALL.len());
        for command in Command::ALL {
            assert_eq!(table.resolve(command.as_str()), *command);
        }
    }

    #[test]
    fn test_table_unknown_is_unsupported() {
        let table = CommandTable::new();
        assert_eq!(table.resolve("containerfrobnicate"), Command::Unsupported);
        assert_eq!(table.resolve(""), Command::Unsupported);
        assert_eq!(table.resolve("unsupported"), Command::Unsupported);
    }

    #[test]
    fn test_shared_classifier_is_a_single_instance() {
        assert!(std::ptr::eq(Classifier::shared(), Classifier::shared()));
        assert!(!Classifier::shared().table().is_empty());
    }

    // =========================================================================
    // DELETE Tests
    // =========================================================================

    #[test]
    fn test_delete_container() {
        assert_eq!(
            classify(Method::DELETE, "/containers/abc123"),
            Command::ContainerDelete
        );
        assert_eq!(
            classify(Method::DELETE, "/v1.24/containers/abc123"),
            Command::ContainerDelete
        );
    }

    #[test]
    fn test_delete_other_families() {
        assert_eq!(
            classify(Method::DELETE, "/networks/n1"),
            Command::NetworkDelete
        );
        assert_eq!(classify(Method::DELETE, "/images/ubuntu"), Command::ImageDelete);
        assert_eq!(
            classify(Method::DELETE, "/volumes/data"),
            Command::VolumeDelete
        );
    }

    #[test]
    fn test_delete_family_priority() {
        // Both the container and network patterns match; container wins
        let path = "/containers/abc/networks/n1";
        assert_eq!(classify(Method::DELETE, path), Command::ContainerDelete);
        assert_eq!(
            rule_for(Method::DELETE, path),
            Rule::Delete(Family::Container)
        );
    }

    #[test]
    fn test_delete_priority_between_remaining_families() {
        let cases = [
            ("/networks/n1/images/x", Command::NetworkDelete, Family::Network),
            ("/images/x/volumes/y", Command::ImageDelete, Family::Image),
            ("/volumes/v/networks/n", Command::NetworkDelete, Family::Network),
        ];
        for (path, command, family) in cases {
            assert_eq!(classify(Method::DELETE, path), command, "{path}");
            assert_eq!(rule_for(Method::DELETE, path), Rule::Delete(family), "{path}");
        }
    }

    #[test]
    fn test_delete_without_family_is_unsupported() {
        assert_eq!(classify(Method::DELETE, "/exec/e1"), Command::Unsupported);
        assert_eq!(rule_for(Method::DELETE, "/exec/e1"), Rule::Unmatched);
    }

    #[test]
    fn test_delete_target_is_resource_id() {
        let classifier = Classifier::new();
        let c = classifier.classify(&Method::DELETE, "/containers/abc123", "/containers/abc123");
        assert_eq!(c.target, Some("abc123"));
    }

    // =========================================================================
    // Container Tests
    // =========================================================================

    #[test]
    fn test_container_item_actions() {
        for (path, expected) in [
            ("/containers/abc/start", Command::ContainerStart),
            ("/containers/abc/stop", Command::ContainerStop),
            ("/containers/abc/json", Command::ContainerJson),
            ("/containers/abc/logs", Command::ContainerLogs),
            ("/containers/abc/exec", Command::ContainerExec),
            ("/containers/abc/archive", Command::ContainerArchive),
            ("/v1.24/containers/abc/attach", Command::ContainerAttach),
        ] {
            assert_eq!(classify(Method::POST, path), expected, "path {path}");
        }
    }

    #[test]
    fn test_container_collection_actions() {
        assert_eq!(
            classify(Method::GET, "/containers/json"),
            Command::ContainersJson
        );
        assert_eq!(
            classify(Method::POST, "/v1.24/containers/create"),
            Command::ContainersCreate
        );
        assert_eq!(classify(Method::GET, "/containers/ps"), Command::ContainersPs);
    }

    #[test]
    fn test_container_singular_plural_asymmetry() {
        // The item branch is singular, the bare-id branch plural
        assert_eq!(
            classify(Method::GET, "/containers/abc/json"),
            Command::ContainerJson
        );
        assert_eq!(
            classify(Method::GET, "/containers/json"),
            Command::ContainersJson
        );
    }

    #[test]
    fn test_container_unknown_action_does_not_fall_through() {
        let path = "/containers/abc/networks";
        assert_eq!(classify(Method::GET, path), Command::Unsupported);
        assert_eq!(rule_for(Method::GET, path), Rule::ContainerItem);
    }

    #[test]
    fn test_container_target() {
        let classifier = Classifier::new();
        let c = classifier.classify(
            &Method::POST,
            "/containers/abc/start",
            "/containers/abc/start",
        );
        assert_eq!(c.target, Some("abc"));
        let c = classifier.classify(&Method::GET, "/containers/json", "/containers/json?all=1");
        assert_eq!(c.target, None);
    }

    // =========================================================================
    // Image Tests
    // =========================================================================

    #[test]
    fn test_image_actions() {
        assert_eq!(classify(Method::GET, "/images/json"), Command::ImagesJson);
        assert_eq!(
            classify(Method::POST, "/images/create"),
            Command::ImagesCreate
        );
        assert_eq!(
            classify(Method::GET, "/images/search"),
            Command::ImagesSearch
        );
        assert_eq!(
            classify(Method::GET, "/images/ubuntu/json"),
            Command::ImageJson
        );
        assert_eq!(
            classify(Method::GET, "/images/library/nginx/history"),
            Command::ImageHistory
        );
    }

    // =========================================================================
    // Network Tests
    // =========================================================================

    #[test]
    fn test_networks_list() {
        assert_eq!(classify(Method::GET, "/networks"), Command::NetworksList);
        assert_eq!(
            classify(Method::GET, "/v1.24/networks"),
            Command::NetworksList
        );
    }

    #[test]
    fn test_networks_list_precedes_network_pattern() {
        // Matches the network pattern's item shape and the list suffix
        let path = "/networks/abc/networks";
        assert!(PathMatcher::new()
            .match_family(Family::Network, path)
            .is_some());
        assert_eq!(classify(Method::GET, path), Command::NetworksList);
        assert_eq!(rule_for(Method::GET, path), Rule::NetworksList);
    }

    #[test]
    fn test_network_subaction_is_inspect_unless_create() {
        assert_eq!(
            classify(Method::GET, "/networks/abc/connect"),
            Command::NetworkInspect
        );
        assert_eq!(
            classify(Method::POST, "/networks/abc/disconnect"),
            Command::NetworkInspect
        );
        assert_eq!(
            classify(Method::POST, "/networks/abc/create"),
            Command::NetworkCreate
        );
    }

    #[test]
    fn test_network_bare_id_is_composed() {
        assert_eq!(
            classify(Method::POST, "/networks/create"),
            Command::NetworkCreate
        );
        assert_eq!(rule_for(Method::POST, "/networks/create"), Rule::NetworkBare);
        assert_eq!(
            classify(Method::GET, "/networks/abc123"),
            Command::Unsupported
        );
        assert_eq!(
            rule_for(Method::GET, "/networks/abc123"),
            Rule::NetworkBare
        );
    }

    #[test]
    fn test_network_bare_vocabulary_words() {
        assert_eq!(
            classify(Method::POST, "/networks/connect"),
            Command::NetworkConnect
        );
        assert_eq!(
            classify(Method::POST, "/networks/disconnect"),
            Command::NetworkDisconnect
        );
    }

    #[test]
    fn test_network_target() {
        let classifier = Classifier::new();
        let c = classifier.classify(
            &Method::GET,
            "/networks/abc/connect",
            "/networks/abc/connect",
        );
        assert_eq!(c.target, Some("abc"));
    }

    // =========================================================================
    // Volume Tests
    // =========================================================================

    #[test]
    fn test_volumes_list_suffixes() {
        assert_eq!(classify(Method::GET, "/volumes"), Command::VolumesList);
        assert_eq!(classify(Method::GET, "/volumes/"), Command::VolumesList);
        assert_eq!(
            classify(Method::GET, "/v1.24/volumes"),
            Command::VolumesList
        );
    }

    #[test]
    fn test_volumes_list_from_query() {
        let classifier = Classifier::new();
        let c = classifier.classify(
            &Method::GET,
            "/v1.24/volumes/x",
            "/v1.24/volumes?filters=%7B%7D",
        );
        assert_eq!(c.command, Command::VolumesList);
        assert_eq!(c.rule, Rule::VolumesList);
    }

    #[test]
    fn test_volume_create_and_inspect() {
        assert_eq!(
            classify(Method::POST, "/volumes/create"),
            Command::VolumeCreate
        );
        assert_eq!(classify(Method::GET, "/volumes/data"), Command::VolumeInspect);
        assert_eq!(
            classify(Method::GET, "/volumes/data/details"),
            Command::VolumeInspect
        );
    }

    // =========================================================================
    // Generic Fallback Tests
    // =========================================================================

    #[test]
    fn test_exec_actions() {
        assert_eq!(classify(Method::POST, "/exec/e1/start"), Command::ExecStart);
        assert_eq!(
            classify(Method::POST, "/v1.24/exec/e1/resize"),
            Command::ExecResize
        );
        assert_eq!(classify(Method::GET, "/exec/e1/json"), Command::ExecJson);
    }

    #[test]
    fn test_exec_target_is_session_id() {
        let classifier = Classifier::new();
        let c = classifier.classify(
            &Method::POST,
            "/v1.24/exec/e1/start",
            "/v1.24/exec/e1/start",
        );
        assert_eq!(c.target, Some("e1"));
    }

    #[test]
    fn test_global_actions_pass_through() {
        assert_eq!(classify(Method::GET, "/v1.24/info"), Command::Info);
        assert_eq!(classify(Method::GET, "/v1.24/version"), Command::Version);
        assert_eq!(classify(Method::GET, "/v1.24/events"), Command::Events);
        assert_eq!(classify(Method::GET, "/v1.24/ping"), Command::Ping);
    }

    #[test]
    fn test_unknown_generic_action_is_unsupported() {
        assert_eq!(classify(Method::GET, "/v1.24/swarm"), Command::Unsupported);
        assert_eq!(rule_for(Method::GET, "/v1.24/swarm"), Rule::Generic);
    }

    #[test]
    fn test_single_segment_path_is_unsupported() {
        assert_eq!(classify(Method::GET, "/_ping"), Command::Unsupported);
        assert_eq!(rule_for(Method::GET, "/_ping"), Rule::Unmatched);
        assert_eq!(classify(Method::GET, ""), Command::Unsupported);
    }

    // =========================================================================
    // Method Tests
    // =========================================================================

    #[test]
    fn test_other_methods_are_unsupported() {
        for method in [Method::PUT, Method::PATCH, Method::HEAD, Method::OPTIONS] {
            assert_eq!(
                classify(method.clone(), "/containers/abc/start"),
                Command::Unsupported
            );
            assert_eq!(
                rule_for(method, "/containers/abc/start"),
                Rule::UnsupportedMethod
            );
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = Classifier::new();
        for _ in 0..3 {
            assert_eq!(
                classifier.command(&Method::POST, "/containers/abc/start", "/containers/abc/start"),
                Command::ContainerStart
            );
        }
    }

    // =========================================================================
    // Request Tests
    // =========================================================================

    #[test]
    fn test_classify_request_uses_query_for_volume_listing() {
        let request = Request::builder()
            .method("GET")
            .uri("/v1.24/volumes/x?dangling=true")
            .body(())
            .unwrap();
        // The path alone is a volume inspect; only the raw URI contains "/volumes?"
        assert_eq!(
            Classifier::shared().classify_request(&request).command,
            Command::VolumeInspect
        );

        let request = Request::builder()
            .method("GET")
            .uri("/v1.24/volumes?dangling=true")
            .body(())
            .unwrap();
        assert_eq!(
            Classifier::shared().classify_request(&request).command,
            Command::VolumesList
        );
    }
}
