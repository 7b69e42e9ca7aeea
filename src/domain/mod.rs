// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Value objects and declarative entities the compiler works on.
//!
//! # Value Objects with Invariants
//!
//! - [`Slug`] - Slugified, non-empty name component
//! - [`NetworkInterface`] - Guest interface with host address and prefix
//! - [`Sizing`] - Guest compute sizing
//!
//! # Declarative Entities
//!
//! - [`BaseGuestRole`] - Un-expanded guest role
//! - [`BaseNetwork`] - Un-expanded network with its member roles
//! - [`InfrastructureService`] - Pseudo-roles outside the per-instance expansion
//!
//! # Derived Entities
//!
//! - [`ScenarioNetwork`] - Per-instance network with its subnet

pub mod invariants;
pub mod network;
pub mod role;
pub mod slug;

pub use invariants::ValidationResult;
pub use network::{
    parse_root_block, usable_hosts, BaseNetwork, NetworkError, NetworkInterface, ScenarioNetwork,
};
pub use role::{BaseGuestRole, BaseGuestRoleBuilder, InfrastructureService, RoleKind, Sizing};
pub use slug::{Slug, SlugError};
