// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine Resolver / Query Engine
//!
//! Selects a subset of the inventory's machines by instance, base role and
//! copy, minus an exclude list. Matching works on the structured fields of
//! each machine rather than on its name string.
//!
//! # Filter Semantics
//!
//! - An empty filter list places no restriction
//! - Filters apply in order: instances, guests, copies, exclude
//! - A singleton role (copies ≤ 1) matches a copy filter only when it contains 1
//! - Infrastructure machines belong to no instance and are singletons
//! - Matching nothing is an error, never an empty selection
//!
//! # Example
//!
//! ```rust
//! use cyber_range_topology::{
//!     GuestSettings, Inventory, MachineQuery, NetworkSettings, ScenarioDescription,
//! };
//!
//! let description = ScenarioDescription::new("udelar", "lab01", 2)
//!     .with_guest(GuestSettings::new("attacker"))
//!     .with_guest(GuestSettings::new("victim").with_copies(2))
//!     .with_network(NetworkSettings::new("internal", ["attacker", "victim"]));
//! let inventory = Inventory::compile(&description).unwrap();
//!
//! let names = inventory
//!     .resolve(&MachineQuery::new().guests(["victim"]).copies([2]))
//!     .unwrap();
//! assert_eq!(names, ["udelar-lab01-1-victim-2", "udelar-lab01-2-victim-2"]);
//!
//! assert!(inventory.resolve(&MachineQuery::new().copies([3])).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::compiler::{GuestRole, Inventory};
use crate::domain::{RoleKind, Slug};
use crate::errors::{TopologyError, TopologyResult};

/// Parameters of a machine resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineQuery {
    pub instances: Vec<u32>,
    pub guests: Vec<String>,
    pub copies: Vec<u32>,
    pub only_instances: bool,
    pub exclude: Vec<String>,
}

impl Default for MachineQuery {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            guests: Vec::new(),
            copies: Vec::new(),
            only_instances: true,
            exclude: Vec::new(),
        }
    }
}

impl MachineQuery {
    /// Query matching every scenario guest
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(mut self, instances: impl IntoIterator<Item = u32>) -> Self {
        self.instances = instances.into_iter().collect();
        self
    }

    pub fn guests<S: Into<String>>(mut self, guests: impl IntoIterator<Item = S>) -> Self {
        self.guests = guests.into_iter().map(Into::into).collect();
        self
    }

    pub fn copies(mut self, copies: impl IntoIterator<Item = u32>) -> Self {
        self.copies = copies.into_iter().collect();
        self
    }

    pub fn only_instances(mut self, only_instances: bool) -> Self {
        self.only_instances = only_instances;
        self
    }

    pub fn exclude<S: Into<String>>(mut self, exclude: impl IntoIterator<Item = S>) -> Self {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }
}

/// Canonical role key a filter value refers to
fn role_key(kind: RoleKind, raw: &str) -> String {
    match kind {
        RoleKind::Infrastructure(service) => service.as_str().to_string(),
        RoleKind::Scenario { .. } => Slug::new(raw).map(String::from).unwrap_or_default(),
    }
}

/// Key an exclude entry may match: the raw value and its slug
fn exclude_keys(raw: &str) -> [Option<String>; 2] {
    [Some(raw.to_string()), Slug::new(raw).ok().map(String::from)]
}

/// Validated filters, ready to test machines against
struct Filters {
    instances: HashSet<u32>,
    roles: HashSet<String>,
    copies: HashSet<u32>,
    exclude: HashSet<String>,
}

impl Filters {
    fn validate(inventory: &Inventory, query: &MachineQuery) -> TopologyResult<Self> {
        let instance_number = inventory.instance_number();
        if let Some(bad) = query
            .instances
            .iter()
            .find(|instance| **instance == 0 || **instance > instance_number)
        {
            return Err(TopologyError::InvalidFilter(format!(
                "instance {bad} is outside 1..={instance_number}"
            )));
        }

        let mut kinds = Vec::with_capacity(query.guests.len());
        let mut roles = HashSet::new();
        for guest in &query.guests {
            let kind = inventory
                .role_kind(guest, query.only_instances)
                .ok_or_else(|| TopologyError::InvalidFilter(format!("unknown guest: {guest}")))?;
            roles.insert(role_key(kind, guest));
            kinds.push(kind);
        }

        if !query.copies.is_empty() {
            let max_copy = if kinds.is_empty() {
                inventory
                    .machines(query.only_instances)
                    .iter()
                    .map(|machine| match machine {
                        GuestRole::Scenario(guest) => guest.role.expanded_copies(),
                        GuestRole::Infrastructure(_) => 1,
                    })
                    .max()
                    .unwrap_or(0)
            } else {
                kinds.iter().map(RoleKind::max_copy).max().unwrap_or(0)
            };

            if let Some(bad) = query
                .copies
                .iter()
                .find(|copy| **copy == 0 || **copy > max_copy)
            {
                return Err(TopologyError::InvalidFilter(format!(
                    "copy {bad} exceeds the maximum of {max_copy} for the selected guests"
                )));
            }
        }

        Ok(Self {
            instances: query.instances.iter().copied().collect(),
            roles,
            copies: query.copies.iter().copied().collect(),
            exclude: query
                .exclude
                .iter()
                .flat_map(|raw| exclude_keys(raw))
                .flatten()
                .collect(),
        })
    }

    fn matches_instance(&self, machine: &GuestRole<'_>) -> bool {
        if self.instances.is_empty() {
            return true;
        }
        machine
            .instance()
            .is_some_and(|instance| self.instances.contains(&instance))
    }

    fn matches_role(&self, machine: &GuestRole<'_>) -> bool {
        self.roles.is_empty() || self.roles.contains(machine.base_name())
    }

    fn matches_copy(&self, machine: &GuestRole<'_>) -> bool {
        if self.copies.is_empty() {
            return true;
        }
        match machine {
            // Singleton names carry no suffix; they stand for copy 1
            GuestRole::Scenario(guest) if guest.is_singleton() => self.copies.contains(&1),
            GuestRole::Scenario(guest) => self.copies.contains(&guest.copy),
            GuestRole::Infrastructure(_) => self.copies.contains(&1),
        }
    }

    fn is_excluded(&self, machine: &GuestRole<'_>) -> bool {
        self.exclude.contains(machine.base_name())
    }
}

impl Inventory {
    /// Resolve a query to machine names, in inventory order
    ///
    /// # Errors
    /// - `InvalidFilter` when an instance, guest or copy is not in the inventory
    /// - `NoMatch` when the filters leave nothing
    pub fn resolve(&self, query: &MachineQuery) -> TopologyResult<Vec<String>> {
        let filters = Filters::validate(self, query).inspect_err(|err| {
            warn!(error = %err, "rejected machine query");
        })?;

        let names: Vec<String> = self
            .machines(query.only_instances)
            .into_iter()
            .filter(|machine| filters.matches_instance(machine))
            .filter(|machine| filters.matches_role(machine))
            .filter(|machine| filters.matches_copy(machine))
            .filter(|machine| !filters.is_excluded(machine))
            .map(|machine| machine.name().to_string())
            .collect();

        debug!(?query, matched = names.len(), "resolved machine query");

        if names.is_empty() {
            warn!(?query, "machine query matched nothing");
            return Err(TopologyError::NoMatch);
        }
        Ok(names)
    }

    /// Positional form of [`Inventory::resolve`]
    pub fn resolve_with(
        &self,
        instances: Option<&[u32]>,
        guests: Option<&[&str]>,
        copies: Option<&[u32]>,
        only_instances: bool,
        exclude: &[&str],
    ) -> TopologyResult<Vec<String>> {
        let query = MachineQuery::new()
            .instances(instances.unwrap_or_default().iter().copied())
            .guests(guests.unwrap_or_default().iter().copied())
            .copies(copies.unwrap_or_default().iter().copied())
            .only_instances(only_instances)
            .exclude(exclude.iter().copied());
        self.resolve(&query)
    }
}
