// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cyber-range-topology
//!
//! Provides deterministic scenario descriptions for compiler and resolver tests.
//!
//! # Design Principles
//! - Fixtures are the ONLY place that constructs scenario descriptions
//! - Tests use fixtures, never direct construction
//! - The JSON fixture and the builder fixture describe the same scenario

#![allow(dead_code)]

use cyber_range_topology::{GuestSettings, NetworkSettings, ScenarioDescription, ServiceSettings};

pub const INSTITUTION: &str = "udelar";
pub const LAB_NAME: &str = "lab01";

/// Two instances of attacker, victim (two copies) and server on two networks
pub const LAB01_JSON: &str = r#"{
    "institution": "udelar",
    "lab_name": "lab01",
    "instance_number": 2,
    "network_cidr_block": "10.0.0.0/16",
    "guest_settings": [
        { "name": "attacker", "entry_point": true },
        { "name": "victim", "copies": 2 },
        { "name": "server", "internet_access": true }
    ],
    "topology": [
        { "name": "internal", "members": ["attacker", "victim", "server"] },
        { "name": "dmz", "members": ["server"] }
    ]
}"#;

/// Same scenario as [`LAB01_JSON`], built in code
pub fn lab01() -> ScenarioDescription {
    ScenarioDescription::new(INSTITUTION, LAB_NAME, 2)
        .with_guest(GuestSettings::new("attacker").with_entry_point(true))
        .with_guest(GuestSettings::new("victim").with_copies(2))
        .with_guest(GuestSettings::new("server").with_internet_access(true))
        .with_network(NetworkSettings::new("internal", ["attacker", "victim", "server"]))
        .with_network(NetworkSettings::new("dmz", ["server"]))
}

/// [`lab01`] with every infrastructure service enabled
pub fn lab01_all_services() -> ScenarioDescription {
    lab01().with_services(ServiceSettings {
        student_access: true,
        teacher_access: true,
        elastic: true,
        caldera: true,
    })
}

/// Names the example scenario expands to, in inventory order
pub fn lab01_machine_names() -> Vec<&'static str> {
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
}
