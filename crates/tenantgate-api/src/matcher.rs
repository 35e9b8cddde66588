//! Path pattern matching
//!
//! Extracts which resource family a path addresses and which positional
//! segments are present, without deciding the action. Each family pattern
//! captures two alternative shapes:
//!
//! ```text
//! /containers/(.*)/(.*)  |  /containers/(\w+)
//!             item  sub                bare id
//! ```
//!
//! Patterns are unanchored, so API version prefixes (`/v1.24/containers/...`)
//! match transparently. Greedy groups mean the sub-action is always the last
//! path segment. A generic `/(.*)/(.*)` pattern covers exec and global
//! actions that belong to no named family.

use std::fmt;

use regex::{Captures, Regex};

/// Resource families with a dedicated path pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `/containers/...`
    Container,
    /// `/networks/...`
    Network,
    /// `/volumes/...`
    Volume,
    /// `/images/...`
    Image,
}

impl Family {
    /// Path segment naming the family's collection
    pub const fn collection(&self) -> &'static str {
        match self {
            Family::Container => "containers",
            Family::Network => "networks",
            Family::Volume => "volumes",
            Family::Image => "images",
        }
    }

    /// Singular prefix used in command identifiers
    pub const fn singular(&self) -> &'static str {
        match self {
            Family::Container => "container",
            Family::Network => "network",
            Family::Volume => "volume",
            Family::Image => "image",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Submatch groups of a family pattern. Absent groups are empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyMatch<'p> {
    /// Item segment(s) of the `family/{item}/{sub}` shape
    pub item: &'p str,
    /// Trailing sub-action of the `family/{item}/{sub}` shape
    pub subaction: &'p str,
    /// Single segment of the `family/{id}` shape
    pub bare_id: &'p str,
}

impl<'p> FamilyMatch<'p> {
    /// The resource identifier this match refers to
    ///
    /// The item group when the `family/{item}/{sub}` shape matched, else the
    /// bare id. `None` when both are empty (e.g. `/networks/abc/`).
    pub fn resource_id(&self) -> Option<&'p str> {
        [self.item, self.bare_id].into_iter().find(|s| !s.is_empty())
    }

    /// The sub-action if present, else the bare id
    pub fn action_segment(&self) -> &'p str {
        if self.subaction.is_empty() {
            self.bare_id
        } else {
            self.subaction
        }
    }
}

/// Submatch groups of the generic two-segment pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericMatch<'p> {
    /// Everything between the first `/` and the last `/`
    pub head: &'p str,
    /// Last path segment
    pub action: &'p str,
}

impl<'p> GenericMatch<'p> {
    /// Last segment of the head, e.g. the exec ID in `/exec/{id}/start`
    pub fn resource_id(&self) -> Option<&'p str> {
        self.head.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// Compiled family and generic patterns
#[derive(Debug, Clone)]
pub struct PathMatcher {
    containers: Regex,
    networks: Regex,
    volumes: Regex,
    images: Regex,
    generic: Regex,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMatcher {
    /// Compile all patterns
    pub fn new() -> Self {
        Self {
            containers: compile(&family_pattern(Family::Container)),
            networks: compile(&family_pattern(Family::Network)),
            volumes: compile(&family_pattern(Family::Volume)),
            images: compile(&family_pattern(Family::Image)),
            generic: compile("/(.*)/(.*)"),
        }
    }

    /// Match a path against one family pattern
    pub fn match_family<'p>(&self, family: Family, path: &'p str) -> Option<FamilyMatch<'p>> {
        let regex = match family {
            Family::Container => &self.containers,
            Family::Network => &self.networks,
            Family::Volume => &self.volumes,
            Family::Image => &self.images,
        };
        regex.captures(path).map(|caps| FamilyMatch {
            item: group(&caps, 1),
            subaction: group(&caps, 2),
            bare_id: group(&caps, 3),
        })
    }

    /// Match a path against the generic two-segment pattern
    pub fn match_generic<'p>(&self, path: &'p str) -> Option<GenericMatch<'p>> {
        self.generic.captures(path).map(|caps| GenericMatch {
            head: group(&caps, 1),
            action: group(&caps, 2),
        })
    }

    /// Match a path against every pattern at once
    pub fn match_all<'p>(&self, path: &'p str) -> PathMatches<'p> {
        PathMatches {
            containers: self.match_family(Family::Container, path),
            networks: self.match_family(Family::Network, path),
            volumes: self.match_family(Family::Volume, path),
            images: self.match_family(Family::Image, path),
            generic: self.match_generic(path),
        }
    }
}

/// Results of every pattern for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatches<'p> {
    /// Container family match
    pub containers: Option<FamilyMatch<'p>>,
    /// Network family match
    pub networks: Option<FamilyMatch<'p>>,
    /// Volume family match
    pub volumes: Option<FamilyMatch<'p>>,
    /// Image family match
    pub images: Option<FamilyMatch<'p>>,
    /// Generic two-segment match
    pub generic: Option<GenericMatch<'p>>,
}

impl<'p> PathMatches<'p> {
    /// Match for a given family
    pub fn family(&self, family: Family) -> Option<FamilyMatch<'p>> {
        match family {
            Family::Container => self.containers,
            Family::Network => self.networks,
            Family::Volume => self.volumes,
            Family::Image => self.images,
        }
    }
}

/// `\w` restricted to ASCII word characters
fn family_pattern(family: Family) -> String {
    let c = family.collection();
    format!("/{c}/(.*)/(.*)|/{c}/([0-9A-Za-z_]+)")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in path pattern must compile")
}

fn group<'p>(caps: &Captures<'p>, index: usize) -> &'p str {
    caps.get(index).map_or("", |m| m.as_str())
}
