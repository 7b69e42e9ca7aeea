// Copyright (c) 2025 - Cowboy AI, Inc.
//! CIDR Partitioner
//!
//! Carves the root block of a scenario into per-instance blocks and each
//! instance block into per-network subnets.
//!
//! ```text
//! 10.0.0.0/16
//! ├── 10.0.0.0/24    reserved (shared services)
//! ├── 10.0.1.0/24    instance 1
//! │   ├── 10.0.1.0/25      base network index 0
//! │   └── 10.0.1.128/25    base network index 1
//! └── 10.0.2.0/24    instance 2
//!     └── ...
//! ```
//!
//! Positions depend only on the root block, the instance number and the base
//! network's declared index, never on iteration order.

use ipnet::Ipv4Net;
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::{TopologyError, TopologyResult};

/// Prefix bits added to the root block to obtain instance blocks
pub const INSTANCE_PREFIX_STEP: u8 = 8;

/// Bits needed to address `count` equal subnets (`ceil(log2(count))`)
fn split_bits(count: usize) -> u32 {
    count.next_power_of_two().trailing_zeros()
}

/// Subnet assignment for every (instance, base network index) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CidrPlan {
    root: Ipv4Net,
    subnets: BTreeMap<(u32, usize), Ipv4Net>,
}

impl CidrPlan {
    /// Partition `root` for `instances` instances of `networks` base networks
    ///
    /// # Errors
    /// `AddressSpaceExhausted` when the root block cannot hold `instances + 1`
    /// instance blocks, or an instance block cannot hold `networks` subnets.
    /// Both conditions are checked before any subnet is computed.
    pub fn partition(root: Ipv4Net, instances: u32, networks: usize) -> TopologyResult<Self> {
        let root = root.trunc();
        if instances == 0 || networks == 0 {
            return Ok(Self {
                root,
                subnets: BTreeMap::new(),
            });
        }

        let instance_prefix = root.prefix_len() + INSTANCE_PREFIX_STEP;
        let instance_blocks = instances as usize + 1;
        if instance_prefix > 32 || instance_blocks > 1usize << INSTANCE_PREFIX_STEP {
            return Err(TopologyError::AddressSpaceExhausted {
                block: root,
                requested: instance_blocks,
                prefix: instance_prefix.min(32),
            });
        }

        let network_bits = split_bits(networks);
        let network_prefix = u32::from(instance_prefix) + network_bits;
        if network_prefix > 32 {
            return Err(TopologyError::AddressSpaceExhausted {
                block: root,
                requested: networks,
                prefix: 32,
            });
        }
        let network_prefix = network_prefix as u8;

        let exhausted = |_| TopologyError::AddressSpaceExhausted {
            block: root,
            requested: networks,
            prefix: network_prefix,
        };

        let mut subnets = BTreeMap::new();
        // Block 0 is reserved, blocks 1..=N belong to instances 1..=N
        let blocks = root
            .subnets(instance_prefix)
            .map_err(exhausted)?
            .skip(1)
            .take(instances as usize);
        for (instance, block) in (1..=instances).zip(blocks) {
            let per_network = block.subnets(network_prefix).map_err(exhausted)?;
            for (index, subnet) in per_network.take(networks).enumerate() {
                debug!(instance, index, %subnet, "partitioned subnet");
                subnets.insert((instance, index), subnet);
            }
        }

        Ok(Self { root, subnets })
    }

    /// Root block this plan was derived from
    pub fn root(&self) -> Ipv4Net {
        self.root
    }

    /// Subnet for a base network of one instance
    pub fn subnet(&self, instance: u32, network_index: usize) -> Option<Ipv4Net> {
        self.subnets.get(&(instance, network_index)).copied()
    }

    /// Block 0 of the partition, left for shared services
    pub fn reserved_block(&self) -> Option<Ipv4Net> {
        let prefix = self.root.prefix_len() + INSTANCE_PREFIX_STEP;
        self.root.subnets(prefix).ok()?.next()
    }

    /// All assignments, ordered by instance then network index
    pub fn iter(&self) -> impl Iterator<Item = ((u32, usize), Ipv4Net)> + '_ {
        self.subnets.iter().map(|(key, subnet)| (*key, *subnet))
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }
}
