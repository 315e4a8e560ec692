//! Role resolution and capability checks for the active organization.
//!
//! The role is always resolved from the currently loaded roster. While the
//! roster is empty (e.g. right after an organization switch) the caller is
//! treated as [`DEFAULT_ROLE`], which grants no admin capability.

use thiserror::Error;

use crate::types::{OrgMember, OrgRole};

/// Role assumed when the roster has no entry for the current user.
pub const DEFAULT_ROLE: OrgRole = OrgRole::Member;

/// Admin-gated surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageTeam,
    ManageOrganization,
    ViewBilling,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageTeam => "manage team",
            Capability::ManageOrganization => "manage organization",
            Capability::ViewBilling => "view billing",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("{role} role cannot {capability}")]
    Forbidden { capability: Capability, role: OrgRole },
}

/// Role of `user_id` in the given roster.
pub fn resolve_role(roster: &[OrgMember], user_id: Option<&str>) -> OrgRole {
    user_id
        .and_then(|id| roster.iter().find(|m| m.user_id == id))
        .map(|m| m.role)
        .unwrap_or(DEFAULT_ROLE)
}

pub fn can(role: OrgRole, capability: Capability) -> bool {
    match capability {
        Capability::ManageTeam | Capability::ManageOrganization | Capability::ViewBilling => {
            role.is_admin()
        }
    }
}

pub fn authorize(role: OrgRole, capability: Capability) -> Result<(), AccessError> {
    if can(role, capability) {
        Ok(())
    } else {
        Err(AccessError::Forbidden { capability, role })
    }
}

/// Label shown next to the user in navigation ("Admin", "Member", ...).
pub fn role_label(role: OrgRole) -> &'static str {
    match role {
        OrgRole::Admin => "Admin",
        OrgRole::Member => "Member",
        OrgRole::Viewer => "Viewer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemberStatus;
    use chrono::Utc;

    fn member(user_id: &str, role: OrgRole) -> OrgMember {
        OrgMember {
            user_id: user_id.to_string(),
            name: user_id.to_string(),
            email: format!("{}@acme.com", user_id),
            role,
            avatar: None,
            status: MemberStatus::Active,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_role() {
        let roster = vec![member("u1", OrgRole::Admin), member("u2", OrgRole::Viewer)];
        assert_eq!(resolve_role(&roster, Some("u1")), OrgRole::Admin);
        assert_eq!(resolve_role(&roster, Some("u2")), OrgRole::Viewer);
        assert_eq!(resolve_role(&roster, Some("u3")), DEFAULT_ROLE);
        assert_eq!(resolve_role(&roster, None), DEFAULT_ROLE);
    }

    #[test]
    fn test_empty_roster_grants_nothing() {
        let role = resolve_role(&[], Some("u1"));
        assert!(!can(role, Capability::ManageTeam));
        assert!(!can(role, Capability::ManageOrganization));
        assert!(!can(role, Capability::ViewBilling));
    }

    #[test]
    fn test_authorize() {
        assert!(authorize(OrgRole::Admin, Capability::ManageTeam).is_ok());

        let err = authorize(OrgRole::Viewer, Capability::ViewBilling).unwrap_err();
        assert_eq!(err.to_string(), "viewer role cannot view billing");
    }
}
