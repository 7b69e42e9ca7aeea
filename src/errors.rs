// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology compilation and machine resolution

use ipnet::Ipv4Net;
use thiserror::Error;

use crate::domain::{NetworkError, SlugError};

/// Errors that can occur while compiling a scenario or resolving machines
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A name is empty after slugification, or a composed name is malformed
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Two declared entities share the same slug
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// The root block cannot hold the requested partition
    #[error("Address space exhausted: cannot split {block} into {requested} subnets of /{prefix}")]
    AddressSpaceExhausted {
        block: Ipv4Net,
        requested: usize,
        prefix: u8,
    },

    /// A host offset falls outside the usable hosts of a subnet
    #[error("Host offset {offset} is out of range for {cidr} ({usable} usable hosts)")]
    AddressOutOfRange {
        cidr: Ipv4Net,
        offset: usize,
        usable: usize,
    },

    /// A guest role is not a member of the network it is being attached to
    #[error("Guest role {role} is not a member of network {network}")]
    MemberNotFound { role: String, network: String },

    /// A network declares a member that is not a declared guest role
    #[error("Network {network} declares undeclared member {member}")]
    UndeclaredMember { network: String, member: String },

    /// Root CIDR block could not be parsed or is not IPv4
    #[error("Invalid CIDR block: {0}")]
    InvalidCidr(String),

    /// A resolver filter references an unknown instance, guest or copy
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A resolver query matched no machines
    #[error("No machines match the given filters")]
    NoMatch,

    /// Scenario description is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl From<SlugError> for TopologyError {
    fn from(err: SlugError) -> Self {
        TopologyError::InvalidName(err.to_string())
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Serialization(err.to_string())
    }
}

impl From<NetworkError> for TopologyError {
    fn from(err: NetworkError) -> Self {
        TopologyError::InvalidCidr(err.to_string())
    }
}
