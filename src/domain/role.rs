// Copyright (c) 2025 - Cowboy AI, Inc.
//! Guest Role Domain Model
//!
//! A base guest role is the un-expanded definition of a lab machine: sizing,
//! operating system, copy count and exposure flags. Infrastructure services
//! (student access host, monitoring stack, ...) are a closed taxonomy of
//! pseudo-roles that share the machine namespace without taking part in the
//! per-instance expansion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Slug;

/// Compute sizing for a guest role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sizing {
    /// Virtual CPUs
    pub vcpu: u32,
    /// Memory in MiB
    pub memory: u32,
    /// Disk in GiB
    pub disk: u32,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            vcpu: 1,
            memory: 1024,
            disk: 10,
        }
    }
}

/// Declarative, un-expanded guest role
///
/// # Invariants
/// - `name` is a non-empty slug
/// - `copies == 0` behaves as a single unnumbered copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseGuestRole {
    pub name: Slug,
    pub sizing: Sizing,
    pub copies: u32,
    pub entry_point: bool,
    pub internet_access: bool,
    pub os: String,
}

impl BaseGuestRole {
    /// Default operating system for roles that do not declare one
    pub const DEFAULT_OS: &'static str = "ubuntu22";

    /// Create a single-copy role with default sizing
    pub fn new(name: Slug) -> Self {
        Self {
            name,
            sizing: Sizing::default(),
            copies: 1,
            entry_point: false,
            internet_access: false,
            os: Self::DEFAULT_OS.to_string(),
        }
    }

    /// Builder pattern for fluent construction
    pub fn builder(name: Slug) -> BaseGuestRoleBuilder {
        BaseGuestRoleBuilder {
            role: Self::new(name),
        }
    }

    /// Number of concrete guests one instance gets for this role
    pub fn expanded_copies(&self) -> u32 {
        self.copies.max(1)
    }

    /// Whether names for this role carry no copy suffix
    pub fn is_singleton(&self) -> bool {
        self.copies <= 1
    }
}

/// Builder for BaseGuestRole with fluent API
pub struct BaseGuestRoleBuilder {
    role: BaseGuestRole,
}

impl BaseGuestRoleBuilder {
    pub fn copies(mut self, copies: u32) -> Self {
        self.role.copies = copies;
        self
    }

    pub fn sizing(mut self, vcpu: u32, memory: u32, disk: u32) -> Self {
        self.role.sizing = Sizing { vcpu, memory, disk };
        self
    }

    pub fn entry_point(mut self, entry_point: bool) -> Self {
        self.role.entry_point = entry_point;
        self
    }

    pub fn internet_access(mut self, internet_access: bool) -> Self {
        self.role.internet_access = internet_access;
        self
    }

    pub fn os(mut self, os: impl Into<String>) -> Self {
        self.role.os = os.into();
        self
    }

    pub fn build(self) -> BaseGuestRole {
        self.role
    }
}

/// Infrastructure pseudo-roles that live beside the scenario guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfrastructureService {
    /// Bastion host students connect through
    StudentAccess,
    /// Bastion host for instructors
    TeacherAccess,
    /// Elastic monitoring stack
    Elastic,
    /// Caldera adversary emulation server
    Caldera,
}

impl InfrastructureService {
    /// All services, in inventory order
    pub const ALL: [InfrastructureService; 4] = [
        Self::StudentAccess,
        Self::TeacherAccess,
        Self::Elastic,
        Self::Caldera,
    ];

    /// Get the canonical identifier used in machine names and filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentAccess => "student_access",
            Self::TeacherAccess => "teacher_access",
            Self::Elastic => "elastic",
            Self::Caldera => "caldera",
        }
    }
}

impl fmt::Display for InfrastructureService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfrastructureService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| format!("Unknown infrastructure service: {s}"))
    }
}

/// What a role name passed to a filter refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// A declared scenario role, with its declared copy count
    Scenario { copies: u32 },
    /// An infrastructure pseudo-role
    Infrastructure(InfrastructureService),
}

impl RoleKind {
    /// Largest copy number a machine of this role can carry
    pub fn max_copy(&self) -> u32 {
        match self {
            Self::Scenario { copies } => (*copies).max(1),
            Self::Infrastructure(_) => 1,
        }
    }
}
