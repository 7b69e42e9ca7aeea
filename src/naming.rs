// Copyright (c) 2025 - Cowboy AI, Inc.

//! Canonical naming scheme for machines, networks and interfaces
//!
//! External tools key their state off these names, so every function here is
//! pure and total over valid input: the same arguments always produce the same
//! string.
//!
//! # Name Patterns
//!
//! ```text
//! machine    {institution}-{lab}-{instance}-{base}            (singleton role)
//! machine    {institution}-{lab}-{instance}-{base}-{copy}     (multi-copy role)
//! network    {institution}-{lab}-{instance}-{base_network}
//! interface  {machine}-{ordinal}
//! service    {institution}-{lab}-{service}
//! ```
//!
//! # Examples
//!
//! ```rust
//! use cyber_range_topology::naming::{machine_name, parse_copy};
//!
//! let single = machine_name("UdelaR", "lab 01", 1, "attacker", 1, 1).unwrap();
//! assert_eq!(single, "udelar-lab01-1-attacker");
//!
//! let copy = machine_name("udelar", "lab01", 2, "victim", 2, 2).unwrap();
//! assert_eq!(copy, "udelar-lab01-2-victim-2");
//! assert_eq!(parse_copy(&copy).unwrap(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{InfrastructureService, Slug};
use crate::errors::{TopologyError, TopologyResult};

/// Separator between name components
pub const SEPARATOR: char = '-';

/// Structured form of a scenario machine name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineName {
    pub institution: Slug,
    pub lab: Slug,
    pub instance: u32,
    pub base: Slug,
    /// `None` for singleton roles, whose names carry no copy suffix
    pub copy: Option<u32>,
}

impl MachineName {
    /// Build the name of one copy of a role
    ///
    /// The copy suffix is only emitted when the role declares more than one copy.
    pub fn new(institution: Slug, lab: Slug, instance: u32, base: Slug, copy: u32, copies: u32) -> Self {
        Self {
            institution,
            lab,
            instance,
            base,
            copy: (copies > 1).then_some(copy),
        }
    }

    /// Copy number, with singleton names reporting copy 1
    pub fn copy_number(&self) -> u32 {
        self.copy.unwrap_or(1)
    }

    /// Parse a canonical machine name back into its components
    pub fn parse(name: &str) -> TopologyResult<Self> {
        let invalid = || TopologyError::InvalidName(format!("not a scenario machine name: {name}"));

        let parts: Vec<&str> = name.split(SEPARATOR).collect();
        if parts.len() != 4 && parts.len() != 5 {
            return Err(invalid());
        }

        let slug = |part: &str| {
            if Slug::is_canonical(part) {
                Slug::new(part).map_err(|_| invalid())
            } else {
                Err(invalid())
            }
        };
        let number = |part: &str| match parse_ordinal(part) {
            Some(n) => Ok(n),
            None => Err(invalid()),
        };

        Ok(Self {
            institution: slug(parts[0])?,
            lab: slug(parts[1])?,
            instance: number(parts[2])?,
            base: slug(parts[3])?,
            copy: parts.get(4).copied().map(number).transpose()?,
        })
    }
}

impl fmt::Display for MachineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.institution, self.lab, self.instance, self.base
        )?;
        if let Some(copy) = self.copy {
            write!(f, "{SEPARATOR}{copy}")?;
        }
        Ok(())
    }
}

impl FromStr for MachineName {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 1-based decimal number without sign or leading zeros
fn parse_ordinal(part: &str) -> Option<u32> {
    if part.is_empty() || part.starts_with('0') || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Compose a machine name, slugifying every textual component
pub fn machine_name(
    institution: &str,
    lab: &str,
    instance: u32,
    base: &str,
    copy: u32,
    copies: u32,
) -> TopologyResult<String> {
    let name = MachineName::new(
        Slug::new(institution)?,
        Slug::new(lab)?,
        instance,
        Slug::new(base)?,
        copy,
        copies,
    );
    Ok(name.to_string())
}

/// Compose a per-instance network name
pub fn network_name(institution: &str, lab: &str, instance: u32, base_network: &str) -> TopologyResult<String> {
    Ok(format_network_name(
        &Slug::new(institution)?,
        &Slug::new(lab)?,
        instance,
        &Slug::new(base_network)?,
    ))
}

/// Network name from already validated components
pub fn format_network_name(institution: &Slug, lab: &Slug, instance: u32, base_network: &Slug) -> String {
    format!("{institution}{SEPARATOR}{lab}{SEPARATOR}{instance}{SEPARATOR}{base_network}")
}

/// Compose an interface name from its guest name and 1-based ordinal
pub fn interface_name(guest_name: &str, ordinal: u32) -> TopologyResult<String> {
    if guest_name.is_empty() {
        return Err(TopologyError::InvalidName("interface owner name is empty".to_string()));
    }
    Ok(format!("{guest_name}{SEPARATOR}{ordinal}"))
}

/// Compose the machine name of an infrastructure service
pub fn service_name(institution: &Slug, lab: &Slug, service: InfrastructureService) -> String {
    format!("{institution}{SEPARATOR}{lab}{SEPARATOR}{service}")
}

/// Instance number embedded in a machine name
pub fn parse_instance(name: &str) -> TopologyResult<u32> {
    MachineName::parse(name).map(|parsed| parsed.instance)
}

/// Base role name embedded in a machine name
pub fn parse_base_name(name: &str) -> TopologyResult<Slug> {
    MachineName::parse(name).map(|parsed| parsed.base)
}

/// Copy number embedded in a machine name (1 for singleton names)
pub fn parse_copy(name: &str) -> TopologyResult<u32> {
    MachineName::parse(name).map(|parsed| parsed.copy_number())
}
