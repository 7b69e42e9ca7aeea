// Copyright (c) 2025 - Cowboy AI, Inc.
//! Interface & Address Allocator
//!
//! Gives every guest one interface per network its role is a member of.
//! The host address of a guest is fixed by its role's position in the
//! network's member list:
//!
//! ```text
//! host offset = position(role) + (copy - 1) + RESERVED_HOSTS
//! ```
//!
//! Member lists hold one entry per copy, so the offsets of two guests on one
//! network never coincide.

use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::{BaseNetwork, NetworkInterface, ScenarioNetwork};
use crate::errors::{TopologyError, TopologyResult};
use crate::naming::interface_name;
use crate::topology::Topology;

use super::expansion::GuestInstance;

/// Low host addresses kept free for gateway, DNS and platform use
pub const RESERVED_HOSTS: usize = 3;

/// Zero-based host offset of one copy of a role inside a network
pub fn host_offset(network: &BaseNetwork, guest: &GuestInstance) -> TopologyResult<usize> {
    let position = network
        .position_of(guest.base_name())
        .ok_or_else(|| TopologyError::MemberNotFound {
            role: guest.base_name().to_string(),
            network: network.name.to_string(),
        })?;
    Ok(position + (guest.copy as usize - 1) + RESERVED_HOSTS)
}

/// Allocate the interface of `guest` on one scenario network
///
/// `ordinal` is the 1-based position of `network` among the guest's networks
/// and is also the interface index; `index_offset` shifts that index past
/// slots the target platform reserves for itself.
///
/// # Errors
/// `Configuration` when `ordinal + index_offset` does not fit in a `u32`.
pub fn allocate_interface(
    guest: &GuestInstance,
    ordinal: u32,
    base: &BaseNetwork,
    network: &ScenarioNetwork,
    index_offset: u32,
) -> TopologyResult<NetworkInterface> {
    let offset = host_offset(base, guest)?;
    let index = ordinal.checked_add(index_offset).ok_or_else(|| {
        TopologyError::Configuration(format!(
            "interface index {ordinal} + offset {index_offset} overflows"
        ))
    })?;
    let ip = network
        .nth_host(offset)
        .ok_or_else(|| TopologyError::AddressOutOfRange {
            cidr: network.cidr,
            offset,
            usable: network.usable_hosts(),
        })?;

    Ok(NetworkInterface {
        name: interface_name(&guest.name, ordinal)?,
        index,
        ip,
        mask: network.cidr.prefix_len(),
        network: network.name.clone(),
    })
}

/// Allocate every interface of `guest`, in network declaration order
pub fn allocate_interfaces(
    guest: &GuestInstance,
    topology: &Topology,
    networks: &BTreeMap<(u32, usize), ScenarioNetwork>,
    index_offset: u32,
) -> TopologyResult<BTreeMap<String, NetworkInterface>> {
    let mut interfaces = BTreeMap::new();

    for (position, base) in topology.networks_of(guest.base_name()).enumerate() {
        let network = networks.get(&(guest.instance, base.index)).ok_or_else(|| {
            TopologyError::Configuration(format!(
                "no subnet for network {} of instance {}",
                base.name, guest.instance
            ))
        })?;

        let interface = allocate_interface(guest, position as u32 + 1, base, network, index_offset)?;
        debug!(
            guest = %guest.name,
            interface = %interface.name,
            ip = %interface.ip,
            "allocated interface"
        );
        interfaces.insert(interface.name.clone(), interface);
    }

    Ok(interfaces)
}
