// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cyber-range topology compiler
//!
//! Compiles a declarative scenario (guest roles, networks, sizing and
//! instance count) into a deterministic inventory of concrete machines,
//! networks and interfaces with names and IPv4 addresses, and resolves
//! filtered selections of machines from that inventory.
//!
//! ```text
//! ScenarioDescription ──compile──▶ Inventory ──resolve(MachineQuery)──▶ names
//!                                      │
//!                                      └──guest_records / to_json──▶ records
//! ```
//!
//! The crate performs no I/O. The same description always yields the same
//! inventory.

pub mod cidr;
pub mod compiler;
pub mod config;
pub mod domain;
pub mod errors;
pub mod naming;
pub mod records;
pub mod resolver;
pub mod topology;

// Re-export commonly used types
pub use cidr::CidrPlan;
pub use compiler::{GuestInstance, GuestRole, Inventory, NamingContext, ServiceGuest};
pub use config::{EditionOverrides, GuestSettings, NetworkSettings, ScenarioDescription, ServiceSettings};
pub use domain::{
    BaseGuestRole, BaseNetwork, InfrastructureService, NetworkInterface, RoleKind, ScenarioNetwork,
    Sizing, Slug,
};
pub use errors::{TopologyError, TopologyResult};
pub use naming::{machine_name, network_name, MachineName};
pub use records::{GuestRecord, InterfaceRecord, InventoryRecord, NetworkRecord};
pub use resolver::MachineQuery;
pub use topology::Topology;
