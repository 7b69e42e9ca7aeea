// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Compiler
//!
//! Turns a [`ScenarioDescription`] into an immutable [`Inventory`]:
//!
//! ```text
//! ScenarioDescription
//!     ↓
//! Topology (validated roles and networks)
//!     ↓
//! CidrPlan (subnet per instance and network)
//!     ↓
//! Guest expansion (instance × role × copy)
//!     ↓
//! Interface allocation (one per guest per member network)
//!     ↓
//! Inventory
//! ```
//!
//! Compilation is all-or-nothing and a pure function of the description.
//! A changed description is compiled into a new inventory; an existing one is
//! never updated in place.

pub mod expansion;
pub mod interfaces;

use ipnet::Ipv4Net;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::cidr::CidrPlan;
use crate::config::{ScenarioDescription, ServiceSettings};
use crate::domain::invariants::validate_scenario_identity;
use crate::domain::{parse_root_block, InfrastructureService, RoleKind, ScenarioNetwork, Slug};
use crate::errors::TopologyResult;
use crate::naming::format_network_name;
use crate::topology::Topology;

pub use expansion::{GuestInstance, GuestRole, NamingContext, ServiceGuest};

use expansion::{expand_guests, expand_services};
use interfaces::allocate_interfaces;

/// Every network, guest and service of one scenario run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    context: NamingContext,
    instance_number: u32,
    random_seed: Option<u64>,
    topology: Topology,
    plan: CidrPlan,
    networks: Vec<ScenarioNetwork>,
    guests: Vec<GuestInstance>,
    services: Vec<ServiceGuest>,
    guest_index: HashMap<String, usize>,
}

impl Inventory {
    /// Compile a scenario description
    ///
    /// # Errors
    /// Any naming, partitioning or allocation error aborts the whole
    /// compilation.
    pub fn compile(description: &ScenarioDescription) -> TopologyResult<Self> {
        let context = NamingContext::new(
            Slug::new(&description.institution)?,
            Slug::new(&description.lab_name)?,
        );
        validate_scenario_identity(&context.institution, &context.lab)?;

        let root = parse_root_block(&description.network_cidr_block)?;
        let topology = Topology::from_settings(&description.guest_settings, &description.topology)?;

        Self::build(
            context,
            description.instance_number,
            root,
            topology,
            description.services,
            description.interface_index_offset,
            description.random_seed,
        )
    }

    /// Compile from already validated parts
    pub fn build(
        context: NamingContext,
        instance_number: u32,
        root: Ipv4Net,
        topology: Topology,
        services: ServiceSettings,
        interface_index_offset: u32,
        random_seed: Option<u64>,
    ) -> TopologyResult<Self> {
        let plan = CidrPlan::partition(root, instance_number, topology.networks().len())?;

        let mut by_key = BTreeMap::new();
        for instance in 1..=instance_number {
            for base in topology.networks() {
                let Some(cidr) = plan.subnet(instance, base.index) else {
                    continue;
                };
                let network = ScenarioNetwork {
                    name: format_network_name(&context.institution, &context.lab, instance, &base.name),
                    base_name: base.name.clone(),
                    instance,
                    cidr,
                    members: base.members.clone(),
                };
                debug!(network = %network.name, cidr = %network.cidr, "scenario network");
                by_key.insert((instance, base.index), network);
            }
        }

        let mut guests = expand_guests(&context, &topology, instance_number);
        for guest in &mut guests {
            guest.interfaces = allocate_interfaces(guest, &topology, &by_key, interface_index_offset)?;
        }

        let services = expand_services(&context, services.enabled());

        let guest_index = guests
            .iter()
            .enumerate()
            .map(|(position, guest)| (guest.name.clone(), position))
            .collect();

        info!(
            institution = %context.institution,
            lab = %context.lab,
            instances = instance_number,
            networks = by_key.len(),
            guests = guests.len(),
            services = services.len(),
            "compiled scenario inventory"
        );

        Ok(Self {
            context,
            instance_number,
            random_seed,
            topology,
            plan,
            networks: by_key.into_values().collect(),
            guests,
            services,
            guest_index,
        })
    }

    pub fn institution(&self) -> &Slug {
        &self.context.institution
    }

    pub fn lab_name(&self) -> &Slug {
        &self.context.lab
    }

    pub fn instance_number(&self) -> u32 {
        self.instance_number
    }

    /// Seed shared with collaborators; it has no influence on the topology
    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Block 0 of the partition, free for shared services
    pub fn reserved_block(&self) -> Option<Ipv4Net> {
        self.plan.reserved_block()
    }

    /// Scenario networks, ordered by instance then declaration
    pub fn networks(&self) -> &[ScenarioNetwork] {
        &self.networks
    }

    /// Scenario guests, ordered by instance, role declaration and copy
    pub fn guests(&self) -> &[GuestInstance] {
        &self.guests
    }

    /// Enabled infrastructure services
    pub fn services(&self) -> &[ServiceGuest] {
        &self.services
    }

    pub fn guest(&self, name: &str) -> Option<&GuestInstance> {
        self.guest_index.get(name).map(|position| &self.guests[*position])
    }

    pub fn network(&self, name: &str) -> Option<&ScenarioNetwork> {
        self.networks.iter().find(|network| network.name == name)
    }

    /// Scenario network derived from base network `base` in `instance`
    pub fn network_for(&self, instance: u32, base: &str) -> Option<&ScenarioNetwork> {
        let base = Slug::new(base).ok()?;
        self.networks
            .iter()
            .find(|network| network.instance == instance && network.base_name == base)
    }

    pub fn guests_for_instance(&self, instance: u32) -> impl Iterator<Item = &GuestInstance> {
        self.guests.iter().filter(move |guest| guest.instance == instance)
    }

    /// Guests reachable from outside the lab network
    pub fn entry_points(&self) -> impl Iterator<Item = &GuestInstance> {
        self.guests.iter().filter(|guest| guest.role.entry_point)
    }

    /// Guests with outbound internet access
    pub fn internet_facing(&self) -> impl Iterator<Item = &GuestInstance> {
        self.guests.iter().filter(|guest| guest.role.internet_access)
    }

    /// Scenario guests followed, unless `only_instances`, by services
    pub fn machines(&self, only_instances: bool) -> Vec<GuestRole<'_>> {
        let guests = self.guests.iter().map(GuestRole::Scenario);
        if only_instances {
            return guests.collect();
        }
        guests
            .chain(self.services.iter().map(GuestRole::Infrastructure))
            .collect()
    }

    pub fn machine_names(&self, only_instances: bool) -> Vec<String> {
        self.machines(only_instances)
            .into_iter()
            .map(|machine| machine.name().to_string())
            .collect()
    }

    /// What a role name refers to in this inventory
    ///
    /// Service identifiers are only recognised when the service is enabled
    /// and `only_instances` is false.
    pub fn role_kind(&self, name: &str, only_instances: bool) -> Option<RoleKind> {
        if !only_instances {
            if let Ok(service) = name.parse::<InfrastructureService>() {
                if self.services.iter().any(|enabled| enabled.service == service) {
                    return Some(RoleKind::Infrastructure(service));
                }
            }
        }

        let slug = Slug::new(name).ok()?;
        self.topology
            .role(&slug)
            .map(|role| RoleKind::Scenario { copies: role.copies })
    }
}
