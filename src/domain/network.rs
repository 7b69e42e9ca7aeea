// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use thiserror::Error;

use super::Slug;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Only IPv4 blocks are supported: {0}")]
    NotIpv4(String),

    #[error("CIDR block has host bits set: {0} (network is {1})")]
    HostBitsSet(String, Ipv4Net),
}

/// Parse a root address block such as `10.0.0.0/16`
///
/// # Invariants
/// - Valid CIDR notation with explicit prefix
/// - IPv4 only
/// - Address is the network address of the block
///
/// # Examples
///
/// ```rust
/// use cyber_range_topology::domain::parse_root_block;
///
/// let block = parse_root_block("10.0.0.0/16").unwrap();
/// assert_eq!(block.prefix_len(), 16);
/// assert!(parse_root_block("10.0.0.1/16").is_err());
/// assert!(parse_root_block("fd00::/64").is_err());
/// ```
pub fn parse_root_block(cidr: &str) -> Result<Ipv4Net, NetworkError> {
    let (addr_str, _) = cidr
        .split_once('/')
        .ok_or_else(|| NetworkError::InvalidCidr(cidr.to_string()))?;

    if let Ok(IpAddr::V6(_)) = IpAddr::from_str(addr_str) {
        return Err(NetworkError::NotIpv4(cidr.to_string()));
    }

    let block = Ipv4Net::from_str(cidr).map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

    // Invariant: no host bits, so the partition is anchored where the caller expects
    if block.addr() != block.network() {
        return Err(NetworkError::HostBitsSet(cidr.to_string(), block.trunc()));
    }

    Ok(block)
}

/// Number of usable host addresses in a block
///
/// Network and broadcast addresses are excluded except for /31 and /32,
/// where every address is usable.
pub fn usable_hosts(block: &Ipv4Net) -> usize {
    match block.prefix_len() {
        32 => 1,
        31 => 2,
        prefix => (1usize << (32 - prefix)) - 2,
    }
}

/// Declarative, un-expanded network
///
/// `members` holds one entry per copy of each attached role, in declaration
/// order, so that a role's position plus its copy offset is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseNetwork {
    pub name: Slug,
    pub index: usize,
    pub members: Vec<Slug>,
}

impl BaseNetwork {
    pub fn new(name: Slug, index: usize, members: Vec<Slug>) -> Self {
        Self {
            name,
            index,
            members,
        }
    }

    /// Position of the first member entry for `role`
    pub fn position_of(&self, role: &Slug) -> Option<usize> {
        self.members.iter().position(|member| member == role)
    }

    /// Whether `role` is attached to this network
    pub fn contains(&self, role: &Slug) -> bool {
        self.members.contains(role)
    }
}

/// Concrete per-instance network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioNetwork {
    /// Canonical network name
    pub name: String,
    /// Base network this was derived from
    pub base_name: Slug,
    /// 1-based instance number
    pub instance: u32,
    /// Subnet carved from the root block
    pub cidr: Ipv4Net,
    /// Member roles, copied from the base network
    pub members: Vec<Slug>,
}

impl ScenarioNetwork {
    /// Host address at zero-based `offset` among the usable hosts
    pub fn nth_host(&self, offset: usize) -> Option<Ipv4Addr> {
        if offset >= usable_hosts(&self.cidr) {
            return None;
        }
        self.cidr.hosts().nth(offset)
    }

    /// Number of usable host addresses
    pub fn usable_hosts(&self) -> usize {
        usable_hosts(&self.cidr)
    }
}

/// One guest interface attached to a scenario network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Canonical interface name (`{guest}-{ordinal}`)
    pub name: String,
    /// Ordinal plus any platform reserved slots
    pub index: u32,
    /// Host address inside the owning network
    pub ip: Ipv4Addr,
    /// Prefix length of the owning network
    pub mask: u8,
    /// Name of the owning scenario network
    pub network: String,
}

impl NetworkInterface {
    /// Dotted-quad netmask
    pub fn netmask(&self) -> Ipv4Addr {
        Ipv4Net::new(self.ip, self.mask)
            .map(|net| net.netmask())
            .unwrap_or(Ipv4Addr::BROADCAST)
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        format!("{}/{}", self.ip, self.mask)
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.as_cidr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_root_block() {
        let block = parse_root_block("10.0.0.0/16").unwrap();
        assert_eq!(block.network(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(block.prefix_len(), 16);
    }

    #[test]
    fn test_invalid_root_block() {
        assert!(matches!(
            parse_root_block("10.0.0.0"),
            Err(NetworkError::InvalidCidr(_))
        ));
        assert!(matches!(
            parse_root_block("999.0.0.0/16"),
            Err(NetworkError::InvalidCidr(_))
        ));
        assert!(matches!(
            parse_root_block("10.0.0.0/33"),
            Err(NetworkError::InvalidCidr(_))
        ));
        assert!(matches!(
            parse_root_block("2001:db8::/48"),
            Err(NetworkError::NotIpv4(_))
        ));
        assert!(matches!(
            parse_root_block("10.0.3.0/16"),
            Err(NetworkError::HostBitsSet(_, _))
        ));
    }

    #[test_case("10.0.1.0/24", 254)]
    #[test_case("10.0.1.0/25", 126)]
    #[test_case("10.0.1.0/30", 2)]
    #[test_case("10.0.1.0/31", 2)]
    #[test_case("10.0.1.1/32", 1)]
    fn test_usable_hosts(cidr: &str, expected: usize) {
        let block: Ipv4Net = cidr.parse().unwrap();
        assert_eq!(usable_hosts(&block), expected);
    }

    #[test]
    fn test_nth_host() {
        let network = ScenarioNetwork {
            name: "udelar-lab01-1-dmz".to_string(),
            base_name: Slug::new("dmz").unwrap(),
            instance: 1,
            cidr: "10.0.1.128/25".parse().unwrap(),
            members: vec![],
        };

        assert_eq!(network.nth_host(0), Some(Ipv4Addr::new(10, 0, 1, 129)));
        assert_eq!(network.nth_host(3), Some(Ipv4Addr::new(10, 0, 1, 132)));
        assert_eq!(network.nth_host(125), Some(Ipv4Addr::new(10, 0, 1, 254)));
        assert_eq!(network.nth_host(126), None);
    }

    #[test]
    fn test_base_network_position() {
        let slug = |s: &str| Slug::new(s).unwrap();
        let network = BaseNetwork::new(
            slug("internal"),
            0,
            vec![slug("attacker"), slug("victim"), slug("victim"), slug("server")],
        );

        assert_eq!(network.position_of(&slug("attacker")), Some(0));
        assert_eq!(network.position_of(&slug("victim")), Some(1));
        assert_eq!(network.position_of(&slug("server")), Some(3));
        assert_eq!(network.position_of(&slug("ghost")), None);
        assert!(network.contains(&slug("server")));
    }

    #[test]
    fn test_interface_netmask() {
        let interface = NetworkInterface {
            name: "udelar-lab01-1-server-1".to_string(),
            index: 0,
            ip: Ipv4Addr::new(10, 0, 1, 7),
            mask: 25,
            network: "udelar-lab01-1-internal".to_string(),
        };

        assert_eq!(interface.netmask(), Ipv4Addr::new(255, 255, 255, 128));
        assert_eq!(interface.as_cidr(), "10.0.1.7/25");
    }
}
