// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scenario description and lab-edition overrides
//!
//! The description is the single, explicit input of the compiler. It is a
//! plain value: overrides produce a new description instead of mutating the
//! original.

use serde::{Deserialize, Serialize};

use crate::domain::{BaseGuestRole, InfrastructureService, Sizing};
use crate::errors::TopologyResult;

/// Settings for one declared guest role, as written in a scenario file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSettings {
    pub name: String,

    #[serde(default = "default_vcpu")]
    pub vcpu: u32,

    #[serde(default = "default_memory")]
    pub memory: u32,

    #[serde(default = "default_disk")]
    pub disk: u32,

    #[serde(default = "default_copies")]
    pub copies: u32,

    #[serde(default)]
    pub entry_point: bool,

    #[serde(default)]
    pub internet_access: bool,

    #[serde(default = "default_os")]
    pub base_os: String,
}

fn default_vcpu() -> u32 {
    Sizing::default().vcpu
}

fn default_memory() -> u32 {
    Sizing::default().memory
}

fn default_disk() -> u32 {
    Sizing::default().disk
}

fn default_copies() -> u32 {
    1
}

fn default_os() -> String {
    BaseGuestRole::DEFAULT_OS.to_string()
}

impl GuestSettings {
    /// Single-copy role with default sizing
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vcpu: default_vcpu(),
            memory: default_memory(),
            disk: default_disk(),
            copies: default_copies(),
            entry_point: false,
            internet_access: false,
            base_os: default_os(),
        }
    }

    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }

    pub fn with_entry_point(mut self, entry_point: bool) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn with_internet_access(mut self, internet_access: bool) -> Self {
        self.internet_access = internet_access;
        self
    }

    pub fn with_sizing(mut self, vcpu: u32, memory: u32, disk: u32) -> Self {
        self.vcpu = vcpu;
        self.memory = memory;
        self.disk = disk;
        self
    }

    pub fn with_os(mut self, base_os: impl Into<String>) -> Self {
        self.base_os = base_os.into();
        self
    }
}

/// One declared network and the roles attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl NetworkSettings {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Which infrastructure pseudo-machines exist beside the scenario guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub student_access: bool,
    pub teacher_access: bool,
    pub elastic: bool,
    pub caldera: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            student_access: true,
            teacher_access: false,
            elastic: false,
            caldera: false,
        }
    }
}

impl ServiceSettings {
    /// Whether a service is enabled
    pub fn is_enabled(&self, service: InfrastructureService) -> bool {
        match service {
            InfrastructureService::StudentAccess => self.student_access,
            InfrastructureService::TeacherAccess => self.teacher_access,
            InfrastructureService::Elastic => self.elastic,
            InfrastructureService::Caldera => self.caldera,
        }
    }

    /// Enabled services, in inventory order
    pub fn enabled(&self) -> Vec<InfrastructureService> {
        InfrastructureService::ALL
            .into_iter()
            .filter(|service| self.is_enabled(*service))
            .collect()
    }
}

/// Declarative scenario description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDescription {
    pub institution: String,
    pub lab_name: String,
    pub instance_number: u32,

    #[serde(default = "default_cidr_block")]
    pub network_cidr_block: String,

    /// Shared context for collaborators; the topology does not depend on it
    #[serde(default)]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub guest_settings: Vec<GuestSettings>,

    #[serde(default)]
    pub topology: Vec<NetworkSettings>,

    #[serde(default)]
    pub services: ServiceSettings,

    /// Interface slots reserved by the target platform before guest interfaces
    #[serde(default)]
    pub interface_index_offset: u32,
}

fn default_cidr_block() -> String {
    ScenarioDescription::DEFAULT_CIDR_BLOCK.to_string()
}

impl ScenarioDescription {
    /// Root block used when a description does not declare one
    pub const DEFAULT_CIDR_BLOCK: &'static str = "10.0.0.0/16";

    /// Create an empty description for one lab
    pub fn new(institution: impl Into<String>, lab_name: impl Into<String>, instance_number: u32) -> Self {
        Self {
            institution: institution.into(),
            lab_name: lab_name.into(),
            instance_number,
            network_cidr_block: default_cidr_block(),
            random_seed: None,
            guest_settings: Vec::new(),
            topology: Vec::new(),
            services: ServiceSettings::default(),
            interface_index_offset: 0,
        }
    }

    /// Parse a description from JSON
    pub fn from_json_str(json: &str) -> TopologyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_cidr_block(mut self, cidr: impl Into<String>) -> Self {
        self.network_cidr_block = cidr.into();
        self
    }

    pub fn with_guest(mut self, guest: GuestSettings) -> Self {
        self.guest_settings.push(guest);
        self
    }

    pub fn with_network(mut self, network: NetworkSettings) -> Self {
        self.topology.push(network);
        self
    }

    pub fn with_services(mut self, services: ServiceSettings) -> Self {
        self.services = services;
        self
    }

    pub fn with_interface_index_offset(mut self, offset: u32) -> Self {
        self.interface_index_offset = offset;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Apply lab-edition overrides, returning a new description
    pub fn with_overrides(&self, overrides: &EditionOverrides) -> Self {
        let mut description = self.clone();
        if let Some(instance_number) = overrides.instance_number {
            description.instance_number = instance_number;
        }
        if let Some(teacher_access) = overrides.teacher_access {
            description.services.teacher_access = teacher_access;
        }
        if let Some(elastic) = overrides.elastic {
            description.services.elastic = elastic;
        }
        if let Some(caldera) = overrides.caldera {
            description.services.caldera = caldera;
        }
        description
    }
}

/// Per-edition overrides of a scenario description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditionOverrides {
    pub instance_number: Option<u32>,
    pub teacher_access: Option<bool>,
    pub elastic: Option<bool>,
    pub caldera: Option<bool>,
}

impl EditionOverrides {
    /// Parse overrides from JSON
    pub fn from_json_str(json: &str) -> TopologyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
