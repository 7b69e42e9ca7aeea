// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Topology Invariants
//!
//! Business rules a scenario description must satisfy before it is expanded.
//! All functions are pure and fail with the first violation found, in
//! declaration order, so the same broken description always reports the same
//! error.

use std::collections::HashSet;

use crate::errors::{TopologyError, TopologyResult};

use super::{BaseGuestRole, InfrastructureService, Slug};

/// Largest copy count of one role
///
/// A /24 network has 254 usable hosts, 3 of them reserved.
pub const MAX_COPIES: u32 = 251;

/// Validation result
pub type ValidationResult = TopologyResult<()>;

/// Validate that no two declared entities of one kind share a slug
///
/// # Rules
/// - Names are compared after slugification, so `web-server` and `webserver`
///   collide
pub fn validate_unique_names<'a>(
    kind: &'static str,
    names: impl IntoIterator<Item = &'a Slug>,
) -> ValidationResult {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(TopologyError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate that every declared member of a network is a declared role
pub fn validate_members_declared(
    network: &Slug,
    members: &[Slug],
    roles: &HashSet<&Slug>,
) -> ValidationResult {
    match members.iter().find(|member| !roles.contains(member)) {
        Some(member) => Err(TopologyError::UndeclaredMember {
            network: network.to_string(),
            member: member.to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate that a role is attached to a network at most once
///
/// # Rules
/// - Copies are expanded by the topology model; declaring a role twice would
///   shift every later member's address
pub fn validate_members_unique(network: &Slug, members: &[Slug]) -> ValidationResult {
    validate_unique_names("member", members).map_err(|err| match err {
        TopologyError::DuplicateName { name, .. } => TopologyError::DuplicateName {
            kind: "member",
            name: format!("{network}/{name}"),
        },
        other => other,
    })
}

/// Validate that no role takes the name of an infrastructure service
///
/// # Rules
/// - Checked whether or not the service is enabled, so enabling it later
///   never changes what a role name resolves to
pub fn validate_not_service_name(role: &Slug) -> ValidationResult {
    match InfrastructureService::ALL
        .into_iter()
        .find(|service| service.as_str() == role.as_str())
    {
        Some(service) => Err(TopologyError::DuplicateName {
            kind: "service",
            name: service.as_str().to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate that a role's copy count stays within [`MAX_COPIES`]
pub fn validate_copies(role: &BaseGuestRole) -> ValidationResult {
    if role.copies > MAX_COPIES {
        return Err(TopologyError::Configuration(format!(
            "guest {} declares {} copies, at most {MAX_COPIES} are supported",
            role.name, role.copies
        )));
    }
    Ok(())
}

/// Validate the identity fields of a scenario
pub fn validate_scenario_identity(institution: &Slug, lab_name: &Slug) -> ValidationResult {
    // Every machine name starts with `{institution}-{lab}`
    if institution.as_str().len() + lab_name.as_str().len() + 1 > 253 {
        return Err(TopologyError::InvalidName(format!(
            "{institution}-{lab_name} is too long to prefix machine names"
        )));
    }
    Ok(())
}
