//! Element category configuration.
//!
//! Maps each element category (conduits, junctions, ...) to the network
//! sections that compose it, the report blocks that augment it and whether
//! its elements are links with path geometry. A registry is built once and
//! shared read-only by every assembly.

use crate::error::{Result, SwmmError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a network section joins onto the tables before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionJoin {
    /// Outer join: the section may introduce elements of its own
    Outer,
    /// Left join: the section is shared between categories (e.g. `XSECTIONS`)
    /// and only annotates elements already present
    Lookup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSection {
    pub name: String,
    pub join: SectionJoin,
}

impl NetworkSection {
    pub fn outer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            join: SectionJoin::Outer,
        }
    }

    pub fn lookup(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            join: SectionJoin::Lookup,
        }
    }
}

/// Sections composing one element category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    network_sections: Vec<NetworkSection>,
    results_sections: Vec<String>,
    link_like: bool,
}

impl CategoryConfig {
    /// Category whose network sections are all outer-joined, in order
    pub fn new<N, R>(network_sections: N, results_sections: R) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            network_sections: network_sections
                .into_iter()
                .map(NetworkSection::outer)
                .collect(),
            results_sections: results_sections.into_iter().map(Into::into).collect(),
            link_like: false,
        }
    }

    /// Mark the category as connecting an inlet and an outlet node
    pub fn link_like(mut self) -> Self {
        self.link_like = true;
        self
    }

    /// Append a shared section that is left-joined
    pub fn with_lookup_section(mut self, name: impl Into<String>) -> Self {
        self.network_sections.push(NetworkSection::lookup(name));
        self
    }

    pub fn network_sections(&self) -> &[NetworkSection] {
        &self.network_sections
    }

    pub fn results_sections(&self) -> &[String] {
        &self.results_sections
    }

    pub fn is_link_like(&self) -> bool {
        self.link_like
    }
}

/// Immutable lookup from category name to its configuration
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: HashMap<String, CategoryConfig>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category; names are stored lower-cased
    pub fn register(mut self, name: &str, config: CategoryConfig) -> Self {
        self.categories.insert(name.to_lowercase(), config);
        self
    }

    /// Case-insensitive category lookup
    pub fn get(&self, name: &str) -> Result<&CategoryConfig> {
        self.categories
            .get(&name.to_lowercase())
            .ok_or_else(|| SwmmError::UnknownCategory {
                category: name.to_string(),
            })
    }

    /// Registered category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Built-in categories of a SWMM 5 model
    pub fn swmm() -> Self {
        const LINK_RESULTS: [&str; 1] = ["Link Flow Summary"];
        const NODE_RESULTS: [&str; 2] = ["Node Depth Summary", "Node Inflow Summary"];

        Self::new()
            .register(
                "conduits",
                CategoryConfig::new(
                    ["CONDUITS"],
                    ["Link Flow Summary", "Conduit Surcharge Summary"],
                )
                .with_lookup_section("XSECTIONS")
                .with_lookup_section("LOSSES")
                .link_like(),
            )
            .register(
                "orifices",
                CategoryConfig::new(["ORIFICES"], LINK_RESULTS)
                    .with_lookup_section("XSECTIONS")
                    .link_like(),
            )
            .register(
                "weirs",
                CategoryConfig::new(["WEIRS"], LINK_RESULTS)
                    .with_lookup_section("XSECTIONS")
                    .link_like(),
            )
            .register(
                "pumps",
                CategoryConfig::new(["PUMPS"], LINK_RESULTS).link_like(),
            )
            .register(
                "outlets",
                CategoryConfig::new(["OUTLETS"], LINK_RESULTS).link_like(),
            )
            .register(
                "junctions",
                CategoryConfig::new(
                    ["JUNCTIONS"],
                    [
                        "Node Depth Summary",
                        "Node Inflow Summary",
                        "Node Flooding Summary",
                        "Node Surcharge Summary",
                    ],
                ),
            )
            .register("outfalls", CategoryConfig::new(["OUTFALLS"], NODE_RESULTS))
            .register(
                "storage",
                CategoryConfig::new(
                    ["STORAGE"],
                    [
                        "Node Depth Summary",
                        "Node Inflow Summary",
                        "Node Flooding Summary",
                    ],
                ),
            )
            .register("dividers", CategoryConfig::new(["DIVIDERS"], NODE_RESULTS))
            .register(
                "subcatchments",
                CategoryConfig::new(
                    ["SUBCATCHMENTS", "SUBAREAS", "INFILTRATION"],
                    ["Subcatchment Runoff Summary"],
                ),
            )
    }
}
