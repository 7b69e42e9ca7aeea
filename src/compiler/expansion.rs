// Copyright (c) 2025 - Cowboy AI, Inc.
//! Guest Expansion Engine
//!
//! Multiplies every base role by the instance count and its copy count.
//! Expansion order is instance, then role declaration order, then copy, and
//! every expanded guest carries its own copy of the role attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{BaseGuestRole, InfrastructureService, NetworkInterface, Slug};
use crate::naming::{service_name, MachineName};
use crate::topology::Topology;

/// Institution and lab slugs every name in a scenario starts with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamingContext {
    pub institution: Slug,
    pub lab: Slug,
}

impl NamingContext {
    pub fn new(institution: Slug, lab: Slug) -> Self {
        Self { institution, lab }
    }

    /// Machine name for one copy of a role in one instance
    pub fn machine(&self, instance: u32, role: &BaseGuestRole, copy: u32) -> MachineName {
        MachineName::new(
            self.institution.clone(),
            self.lab.clone(),
            instance,
            role.name.clone(),
            copy,
            role.copies,
        )
    }

    /// Machine name of an infrastructure service
    pub fn service(&self, service: InfrastructureService) -> String {
        service_name(&self.institution, &self.lab, service)
    }
}

/// Concrete scenario guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInstance {
    /// Canonical machine name
    pub name: String,
    /// 1-based instance number
    pub instance: u32,
    /// 1-based copy number (1 for singleton roles)
    pub copy: u32,
    /// Role attributes at expansion time
    pub role: BaseGuestRole,
    /// Interfaces keyed by interface name
    pub interfaces: BTreeMap<String, NetworkInterface>,
}

impl GuestInstance {
    pub fn base_name(&self) -> &Slug {
        &self.role.name
    }

    /// Whether the name of this guest omits the copy suffix
    pub fn is_singleton(&self) -> bool {
        self.role.is_singleton()
    }

    /// Interfaces ordered by index
    pub fn interfaces_in_order(&self) -> Vec<&NetworkInterface> {
        let mut interfaces: Vec<&NetworkInterface> = self.interfaces.values().collect();
        interfaces.sort_by_key(|interface| interface.index);
        interfaces
    }
}

/// Infrastructure pseudo-guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceGuest {
    pub name: String,
    pub service: InfrastructureService,
}

/// Any machine in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestRole<'a> {
    Scenario(&'a GuestInstance),
    Infrastructure(&'a ServiceGuest),
}

impl<'a> GuestRole<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Scenario(guest) => &guest.name,
            Self::Infrastructure(service) => &service.name,
        }
    }

    /// Base role the machine was expanded from
    pub fn base_name(&self) -> &'a str {
        match *self {
            Self::Scenario(guest) => guest.role.name.as_str(),
            Self::Infrastructure(service) => service.service.as_str(),
        }
    }

    /// Instance number; infrastructure machines belong to no instance
    pub fn instance(&self) -> Option<u32> {
        match *self {
            Self::Scenario(guest) => Some(guest.instance),
            Self::Infrastructure(_) => None,
        }
    }
}

/// Expand every role of `topology` for instances `1..=instances`
///
/// Interfaces are left empty; the allocator fills them in.
pub fn expand_guests(context: &NamingContext, topology: &Topology, instances: u32) -> Vec<GuestInstance> {
    let mut guests = Vec::new();

    for instance in 1..=instances {
        for role in topology.roles() {
            for copy in 1..=role.expanded_copies() {
                guests.push(GuestInstance {
                    name: context.machine(instance, role, copy).to_string(),
                    instance,
                    copy,
                    role: role.clone(),
                    interfaces: BTreeMap::new(),
                });
            }
        }
    }

    guests
}

/// Build the enabled infrastructure pseudo-guests
pub fn expand_services(
    context: &NamingContext,
    services: impl IntoIterator<Item = InfrastructureService>,
) -> Vec<ServiceGuest> {
    services
        .into_iter()
        .map(|service| ServiceGuest {
            name: context.service(service),
            service,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GuestSettings, NetworkSettings};
    use pretty_assertions::assert_eq;

    fn context() -> NamingContext {
        NamingContext::new(Slug::new("udelar").unwrap(), Slug::new("lab01").unwrap())
    }

    fn topology(guests: Vec<GuestSettings>) -> Topology {
        Topology::from_settings(&guests, &[] as &[NetworkSettings]).unwrap()
    }

    #[test]
    fn test_expansion_order_and_names() {
        let topology = topology(vec![
            GuestSettings::new("attacker"),
            GuestSettings::new("victim").with_copies(2),
            GuestSettings::new("server"),
        ]);

        let names: Vec<String> = expand_guests(&context(), &topology, 2)
            .into_iter()
            .map(|guest| guest.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "udelar-lab01-1-attacker",
                "udelar-lab01-1-victim-1",
                "udelar-lab01-1-victim-2",
                "udelar-lab01-1-server",
                "udelar-lab01-2-attacker",
                "udelar-lab01-2-victim-1",
                "udelar-lab01-2-victim-2",
                "udelar-lab01-2-server",
            ]
        );
    }

    #[test]
    fn test_zero_copies_expands_once_without_suffix() {
        let topology = topology(vec![GuestSettings::new("optional").with_copies(0)]);
        let guests = expand_guests(&context(), &topology, 3);

        assert_eq!(guests.len(), 3);
        assert!(guests.iter().all(|guest| guest.copy == 1 && guest.is_singleton()));
        assert_eq!(guests[2].name, "udelar-lab01-3-optional");
    }

    #[test]
    fn test_total_count() {
        let topology = topology(vec![
            GuestSettings::new("a").with_copies(0),
            GuestSettings::new("b").with_copies(1),
            GuestSettings::new("c").with_copies(4),
        ]);
        assert_eq!(expand_guests(&context(), &topology, 5).len(), 5 * (1 + 1 + 4));
        assert!(expand_guests(&context(), &topology, 0).is_empty());
    }

    #[test]
    fn test_guests_own_role_attributes() {
        let mut topology_roles = vec![GuestSettings::new("victim").with_copies(2)];
        let topology_a = topology(topology_roles.clone());
        let guests = expand_guests(&context(), &topology_a, 1);

        topology_roles[0].memory = 8192;
        let topology_b = topology(topology_roles);

        assert_eq!(guests[0].role.sizing.memory, 1024);
        assert_eq!(topology_b.roles()[0].sizing.memory, 8192);
    }

    #[test]
    fn test_expand_services() {
        let services = expand_services(
            &context(),
            [InfrastructureService::StudentAccess, InfrastructureService::Elastic],
        );
        assert_eq!(services[0].name, "udelar-lab01-student_access");
        assert_eq!(services[1].name, "udelar-lab01-elastic");

        let machine = GuestRole::Infrastructure(&services[1]);
        assert_eq!(machine.base_name(), "elastic");
        assert_eq!(machine.instance(), None);
    }
}
