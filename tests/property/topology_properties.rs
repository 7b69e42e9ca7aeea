// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Topology Compiler
//!
//! Generates random but valid scenarios and checks the properties every
//! compiled inventory must satisfy: determinism, counts, address uniqueness,
//! name round-trips, stability under a growing instance count and filter
//! monotonicity.

use cyber_range_topology::{
    GuestSettings, Inventory, MachineName, MachineQuery, NetworkSettings, ScenarioDescription, Slug,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Roles `role0..roleN` with 0 to 4 declared copies each
fn role_copies() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..5, 1..6)
}

/// Roles plus, per network, which roles are members
fn topology_shape() -> impl Strategy<Value = (Vec<u32>, Vec<Vec<bool>>)> {
    role_copies().prop_flat_map(|copies| {
        let roles = copies.len();
        (
            Just(copies),
            prop::collection::vec(prop::collection::vec(any::<bool>(), roles), 1..5),
        )
    })
}

/// Scenario with up to 6 instances in the default /16
fn scenario() -> impl Strategy<Value = ScenarioDescription> {
    (topology_shape(), 0u32..7).prop_map(|((copies, memberships), instances)| {
        build_scenario(&copies, &memberships, instances)
    })
}

/// Scenario with at least one instance
fn populated_scenario() -> impl Strategy<Value = ScenarioDescription> {
    scenario().prop_filter("needs an instance", |description| description.instance_number >= 1)
}

fn build_scenario(copies: &[u32], memberships: &[Vec<bool>], instances: u32) -> ScenarioDescription {
    let mut description = ScenarioDescription::new("udelar", "lab01", instances);

    for (index, copies) in copies.iter().enumerate() {
        description = description.with_guest(GuestSettings::new(format!("role{index}")).with_copies(*copies));
    }

    for (index, members) in memberships.iter().enumerate() {
        let members = members
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(|(role, _)| format!("role{role}"));
        description = description.with_network(NetworkSettings::new(format!("net{index}"), members));
    }

    description
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Compilation is deterministic
    ///
    /// The same description always yields the same inventory.
    #[test]
    fn prop_compilation_is_deterministic(description in scenario()) {
        let first = Inventory::compile(&description);
        let second = Inventory::compile(&description);

        prop_assert!(first.is_ok());
        prop_assert_eq!(first, second, "Same description must produce same inventory");
    }

    /// Property: Guest count
    ///
    /// Every instance holds max(1, copies) guests per role.
    #[test]
    fn prop_guest_count(description in scenario()) {
        let inventory = Inventory::compile(&description).unwrap();
        let per_instance: u32 = description
            .guest_settings
            .iter()
            .map(|guest| guest.copies.max(1))
            .sum();

        prop_assert_eq!(
            inventory.guests().len(),
            (description.instance_number * per_instance) as usize
        );
        prop_assert_eq!(
            inventory.networks().len(),
            description.instance_number as usize * description.topology.len()
        );
    }

    /// Property: No address collisions
    ///
    /// Addresses on one network are unique, usable and inside its subnet.
    #[test]
    fn prop_no_address_collisions(description in scenario()) {
        let inventory = Inventory::compile(&description).unwrap();

        for network in inventory.networks() {
            let mut seen = HashSet::new();
            let interfaces = inventory
                .guests()
                .iter()
                .flat_map(|guest| guest.interfaces.values())
                .filter(|interface| interface.network == network.name);

            for interface in interfaces {
                prop_assert!(seen.insert(interface.ip), "duplicate {}", interface.ip);
                prop_assert!(network.cidr.contains(&interface.ip));
                prop_assert_ne!(interface.ip, network.cidr.network());
                prop_assert_ne!(interface.ip, network.cidr.broadcast());
                prop_assert_eq!(interface.mask, network.cidr.prefix_len());
            }
        }
    }

    /// Property: Subnets are disjoint
    ///
    /// No two scenario networks overlap, and none overlaps the reserved block.
    #[test]
    fn prop_subnets_disjoint(description in scenario()) {
        let inventory = Inventory::compile(&description).unwrap();
        let networks = inventory.networks();

        for (i, a) in networks.iter().enumerate() {
            if let Some(reserved) = inventory.reserved_block() {
                prop_assert!(!reserved.contains(&a.cidr));
            }
            for b in &networks[i + 1..] {
                prop_assert!(!a.cidr.contains(&b.cidr) && !b.cidr.contains(&a.cidr));
            }
        }
    }

    /// Property: Names round-trip
    ///
    /// Every machine name parses back to its instance, role and copy, and
    /// singleton names carry no copy suffix.
    #[test]
    fn prop_names_round_trip(description in scenario()) {
        let inventory = Inventory::compile(&description).unwrap();

        for guest in inventory.guests() {
            let parsed = MachineName::parse(&guest.name).unwrap();
            prop_assert_eq!(parsed.instance, guest.instance);
            prop_assert_eq!(&parsed.base, guest.base_name());
            prop_assert_eq!(parsed.copy_number(), guest.copy);
            prop_assert_eq!(parsed.copy.is_none(), guest.is_singleton());
            prop_assert_eq!(parsed.to_string(), guest.name.clone());
        }
    }

    /// Property: Adding instances keeps existing ones intact
    ///
    /// Growing the instance count never renames or readdresses earlier guests.
    #[test]
    fn prop_instances_are_stable(
        (copies, memberships) in topology_shape(),
        instances in 1u32..6,
    ) {
        let smaller = Inventory::compile(&build_scenario(&copies, &memberships, instances)).unwrap();
        let larger = Inventory::compile(&build_scenario(&copies, &memberships, instances + 1)).unwrap();

        let smaller_records = smaller.guest_records();
        prop_assert_eq!(&larger.guest_records()[..smaller_records.len()], &smaller_records[..]);
    }

    /// Property: Unfiltered resolution lists every scenario guest
    #[test]
    fn prop_unfiltered_resolution(description in scenario()) {
        let inventory = Inventory::compile(&description).unwrap();
        let names = inventory.machine_names(true);

        match inventory.resolve(&MachineQuery::new()) {
            Ok(resolved) => prop_assert_eq!(resolved, names),
            Err(_) => prop_assert!(names.is_empty()),
        }
    }

    /// Property: Excluding a role removes exactly its guests
    #[test]
    fn prop_exclude_removes_role(description in scenario(), pick in any::<prop::sample::Index>()) {
        let inventory = Inventory::compile(&description).unwrap();
        let role = pick.get(&description.guest_settings).name.clone();

        let expected: Vec<String> = inventory
            .guests()
            .iter()
            .filter(|guest| guest.base_name().as_str() != role)
            .map(|guest| guest.name.clone())
            .collect();

        match inventory.resolve(&MachineQuery::new().exclude([role])) {
            Ok(resolved) => prop_assert_eq!(resolved, expected),
            Err(_) => prop_assert!(expected.is_empty()),
        }
    }

    /// Property: The instance filter only narrows
    ///
    /// Restricting to one instance yields exactly that instance's guests,
    /// all of which the unfiltered query also returns.
    #[test]
    fn prop_instance_filter_is_monotone(description in populated_scenario(), pick in any::<prop::sample::Index>()) {
        let inventory = Inventory::compile(&description).unwrap();
        let instance = pick.index(description.instance_number as usize) as u32 + 1;

        let all = inventory.resolve(&MachineQuery::new()).unwrap();
        let narrowed = inventory.resolve(&MachineQuery::new().instances([instance])).unwrap();

        let expected: Vec<String> = inventory
            .guests_for_instance(instance)
            .map(|guest| guest.name.clone())
            .collect();
        prop_assert_eq!(&narrowed, &expected);
        prop_assert!(narrowed.iter().all(|name| all.contains(name)));
    }

    /// Property: Copy 1 selects singletons and first copies
    ///
    /// Singleton names carry no suffix but still match a copy filter of 1.
    #[test]
    fn prop_singletons_match_copy_one(description in populated_scenario()) {
        let inventory = Inventory::compile(&description).unwrap();
        let resolved = inventory.resolve(&MachineQuery::new().copies([1])).unwrap();

        let expected: Vec<String> = inventory
            .guests()
            .iter()
            .filter(|guest| guest.copy == 1)
            .map(|guest| guest.name.clone())
            .collect();
        prop_assert_eq!(&resolved, &expected);

        for guest in inventory.guests().iter().filter(|guest| guest.is_singleton()) {
            prop_assert!(resolved.contains(&guest.name), "{} missing", guest.name);
        }
    }

    /// Property: Slugs are idempotent
    #[test]
    fn prop_slug_idempotent(raw in "[A-Za-z0-9 _.-]{1,20}") {
        if let Ok(slug) = Slug::new(&raw) {
            prop_assert!(Slug::is_canonical(slug.as_str()));
            prop_assert_eq!(Slug::new(slug.as_str()).unwrap(), slug);
        }
    }
}
