// Copyright (c) 2025 - Cowboy AI, Inc.
//! Serializable inventory records
//!
//! Flat views of a compiled [`Inventory`] for provisioning tools. Records
//! are plain data: addresses render as strings and every name is final.

use serde::{Deserialize, Serialize};

use crate::compiler::{GuestInstance, Inventory};
use crate::domain::{NetworkInterface, ScenarioNetwork};
use crate::errors::TopologyResult;

/// One interface of a guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub index: u32,
    pub ip: String,
    /// Prefix length of the network
    pub mask: u8,
    pub network: String,
}

impl From<&NetworkInterface> for InterfaceRecord {
    fn from(interface: &NetworkInterface) -> Self {
        Self {
            name: interface.name.clone(),
            index: interface.index,
            ip: interface.ip.to_string(),
            mask: interface.mask,
            network: interface.network.clone(),
        }
    }
}

/// One scenario guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub name: String,
    pub base_name: String,
    pub instance: u32,
    pub copy: u32,
    pub os: String,
    pub vcpu: u32,
    /// Memory in MiB
    pub memory: u32,
    /// Disk in GiB
    pub disk: u32,
    pub entry_point: bool,
    pub internet_access: bool,
    /// Interfaces ordered by index
    pub interfaces: Vec<InterfaceRecord>,
}

impl From<&GuestInstance> for GuestRecord {
    fn from(guest: &GuestInstance) -> Self {
        Self {
            name: guest.name.clone(),
            base_name: guest.base_name().to_string(),
            instance: guest.instance,
            copy: guest.copy,
            os: guest.role.os.clone(),
            vcpu: guest.role.sizing.vcpu,
            memory: guest.role.sizing.memory,
            disk: guest.role.sizing.disk,
            entry_point: guest.role.entry_point,
            internet_access: guest.role.internet_access,
            interfaces: guest
                .interfaces_in_order()
                .into_iter()
                .map(InterfaceRecord::from)
                .collect(),
        }
    }
}

/// One scenario network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub name: String,
    pub base_name: String,
    pub instance: u32,
    pub cidr: String,
    pub members: Vec<String>,
}

impl From<&ScenarioNetwork> for NetworkRecord {
    fn from(network: &ScenarioNetwork) -> Self {
        let mut members: Vec<String> = Vec::with_capacity(network.members.len());
        for member in &network.members {
            // Member lists repeat a role once per copy
            if !members.iter().any(|seen| seen == member.as_str()) {
                members.push(member.to_string());
            }
        }

        Self {
            name: network.name.clone(),
            base_name: network.base_name.to_string(),
            instance: network.instance,
            cidr: network.cidr.to_string(),
            members,
        }
    }
}

/// Whole inventory as one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub institution: String,
    pub lab_name: String,
    pub instance_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_block: Option<String>,
    pub networks: Vec<NetworkRecord>,
    pub guests: Vec<GuestRecord>,
    /// Machine names of the enabled infrastructure services
    pub services: Vec<String>,
}

impl Inventory {
    /// Per-guest records, in inventory order
    pub fn guest_records(&self) -> Vec<GuestRecord> {
        self.guests().iter().map(GuestRecord::from).collect()
    }

    pub fn network_records(&self) -> Vec<NetworkRecord> {
        self.networks().iter().map(NetworkRecord::from).collect()
    }

    pub fn to_record(&self) -> InventoryRecord {
        InventoryRecord {
            institution: self.institution().to_string(),
            lab_name: self.lab_name().to_string(),
            instance_number: self.instance_number(),
            random_seed: self.random_seed(),
            reserved_block: self.reserved_block().map(|block| block.to_string()),
            networks: self.network_records(),
            guests: self.guest_records(),
            services: self
                .services()
                .iter()
                .map(|service| service.name.clone())
                .collect(),
        }
    }

    /// Pretty-printed JSON of [`Inventory::to_record`]
    pub fn to_json(&self) -> TopologyResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GuestSettings, NetworkSettings, ScenarioDescription};
    use pretty_assertions::assert_eq;

    fn inventory() -> Inventory {
        let description = ScenarioDescription::new("udelar", "lab01", 1)
            .with_random_seed(42)
            .with_guest(GuestSettings::new("attacker").with_entry_point(true))
            .with_guest(GuestSettings::new("victim").with_copies(2))
            .with_network(NetworkSettings::new("internal", ["attacker", "victim"]));
        Inventory::compile(&description).unwrap()
    }

    #[test]
    fn test_guest_records() {
        let records = inventory().guest_records();
        assert_eq!(records.len(), 3);

        let victim = &records[2];
        assert_eq!(victim.name, "udelar-lab01-1-victim-2");
        assert_eq!(victim.base_name, "victim");
        assert_eq!(victim.copy, 2);
        assert_eq!(victim.os, "ubuntu22");
        assert_eq!(
            victim.interfaces,
            vec![InterfaceRecord {
                name: "udelar-lab01-1-victim-2-1".to_string(),
                index: 1,
                ip: "10.0.1.6".to_string(),
                mask: 24,
                network: "udelar-lab01-1-internal".to_string(),
            }]
        );
        assert!(records[0].entry_point);
    }

    #[test]
    fn test_network_members_listed_once() {
        let networks = inventory().network_records();
        assert_eq!(networks[0].cidr, "10.0.1.0/24");
        assert_eq!(networks[0].members, vec!["attacker", "victim"]);
    }

    #[test]
    fn test_to_json() {
        let json = inventory().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["random_seed"], 42);
        assert_eq!(value["reserved_block"], "10.0.0.0/24");
        assert_eq!(value["guests"][0]["interfaces"][0]["ip"], "10.0.1.4");
        assert_eq!(value["services"][0], "udelar-lab01-student_access");

        let record: InventoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, inventory().to_record());
    }
}
