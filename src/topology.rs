// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Model
//!
//! Holds the declarative base guest roles and base networks of a scenario,
//! validated and in declaration order. Declaration order is load bearing:
//! a network's position fixes its subnet and a member's position fixes its
//! host address, so nothing here ever re-sorts.

use std::collections::HashSet;

use crate::config::{GuestSettings, NetworkSettings};
use crate::domain::invariants::{
    validate_copies, validate_members_declared, validate_members_unique, validate_not_service_name,
    validate_unique_names,
};
use crate::domain::{BaseGuestRole, BaseNetwork, Slug};
use crate::errors::TopologyResult;

/// Validated base roles and base networks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    roles: Vec<BaseGuestRole>,
    networks: Vec<BaseNetwork>,
}

impl Topology {
    /// Build a topology from roles and `(network, declared members)` pairs
    ///
    /// Each declared member is expanded to one entry per copy of its role.
    ///
    /// # Invariants
    /// - Role and network names are unique
    /// - No role takes an infrastructure service name
    /// - No role declares more than `MAX_COPIES` copies
    /// - Every member is a declared role, declared at most once per network
    pub fn new(roles: Vec<BaseGuestRole>, networks: Vec<(Slug, Vec<Slug>)>) -> TopologyResult<Self> {
        validate_unique_names("guest", roles.iter().map(|role| &role.name))?;
        for role in &roles {
            validate_not_service_name(&role.name)?;
            validate_copies(role)?;
        }
        validate_unique_names("network", networks.iter().map(|(name, _)| name))?;

        let declared: HashSet<&Slug> = roles.iter().map(|role| &role.name).collect();

        let mut base_networks = Vec::with_capacity(networks.len());
        for (index, (name, members)) in networks.into_iter().enumerate() {
            validate_members_declared(&name, &members, &declared)?;
            validate_members_unique(&name, &members)?;

            let mut expanded = Vec::new();
            for member in members {
                let copies = roles
                    .iter()
                    .find(|role| role.name == member)
                    .map(BaseGuestRole::expanded_copies)
                    .unwrap_or(1);
                expanded.extend(std::iter::repeat(member).take(copies as usize));
            }

            base_networks.push(BaseNetwork::new(name, index, expanded));
        }

        Ok(Self {
            roles,
            networks: base_networks,
        })
    }

    /// Build a topology from scenario file settings, slugifying every name
    pub fn from_settings(guests: &[GuestSettings], networks: &[NetworkSettings]) -> TopologyResult<Self> {
        let roles = guests
            .iter()
            .map(|guest| -> TopologyResult<BaseGuestRole> {
                Ok(BaseGuestRole::builder(Slug::new(&guest.name)?)
                    .copies(guest.copies)
                    .sizing(guest.vcpu, guest.memory, guest.disk)
                    .entry_point(guest.entry_point)
                    .internet_access(guest.internet_access)
                    .os(guest.base_os.clone())
                    .build())
            })
            .collect::<TopologyResult<Vec<_>>>()?;

        let networks = networks
            .iter()
            .map(|network| -> TopologyResult<(Slug, Vec<Slug>)> {
                let members = network
                    .members
                    .iter()
                    .map(Slug::new)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((Slug::new(&network.name)?, members))
            })
            .collect::<TopologyResult<Vec<_>>>()?;

        Self::new(roles, networks)
    }

    /// Base roles in declaration order
    pub fn roles(&self) -> &[BaseGuestRole] {
        &self.roles
    }

    /// Base networks in declaration order
    pub fn networks(&self) -> &[BaseNetwork] {
        &self.networks
    }

    /// Look up a role by slug
    pub fn role(&self, name: &Slug) -> Option<&BaseGuestRole> {
        self.roles.iter().find(|role| &role.name == name)
    }

    /// Networks a role is attached to, in declaration order
    pub fn networks_of<'a>(&'a self, role: &'a Slug) -> impl Iterator<Item = &'a BaseNetwork> + 'a {
        self.networks.iter().filter(move |network| network.contains(role))
    }

    /// Largest declared copy count, with zero-copy roles counting as one
    pub fn max_copies(&self) -> u32 {
        self.roles
            .iter()
            .map(BaseGuestRole::expanded_copies)
            .max()
            .unwrap_or(0)
    }

    /// Concrete guests per instance
    pub fn guests_per_instance(&self) -> usize {
        self.roles
            .iter()
            .map(|role| role.expanded_copies() as usize)
            .sum()
    }
}
