//! Organization context: the organization list, the active organization,
//! its categories, settings and member roster.

use tracing::{debug, info, warn};

use super::{FetchOutcome, MEMBERS, ORGANIZATIONS, Store, StoreError, StoreResult};
use crate::access::Capability;
use crate::types::{
    OrgMember, OrgRole, Organization, OrganizationUpdate, ValidationError, require, validate_email,
    validate_slug,
};

impl Store {
    /// Make `org_id` the active organization.
    ///
    /// The organization must already be loaded. Everything scoped to the
    /// previous organization, the roster included, is cleared so nothing from
    /// it is shown under the new one, and the display currency follows the
    /// new organization.
    pub fn set_active_organization(&self, org_id: &str) -> StoreResult<()> {
        let mut state = self.write();

        let currency = state
            .orgs
            .organizations
            .get(org_id)
            .map(|org| org.currency)
            .ok_or_else(|| StoreError::UnknownOrganization(org_id.to_string()))?;

        let previous = state.orgs.active_organization_id.replace(org_id.to_string());
        state.reset_scoped();
        state.preferences.currency = currency;

        info!(org_id, previous = ?previous, "active organization changed");
        Ok(())
    }

    /// Replace the organization list. If the active organization is no longer
    /// in it, its scoped data is dropped. If none is active afterwards, the
    /// first one returned becomes active.
    pub async fn load_my_organizations(&self) -> StoreResult<usize> {
        self.write().orgs.organizations.begin_load();

        let result = self.backend.list_my_organizations().await;

        let first = {
            let mut state = self.write();
            match result {
                Ok(orgs) => {
                    let count = orgs.len();
                    let first = orgs.first().map(|o| o.id.clone());
                    state.orgs.organizations.finish_load(orgs);
                    debug!(kind = ORGANIZATIONS, count, "fetch applied");

                    let vanished = state
                        .orgs
                        .active_organization_id
                        .clone()
                        .filter(|id| state.orgs.organizations.get(id.as_str()).is_none());
                    if let Some(org_id) = vanished {
                        warn!(org_id = %org_id, "active organization no longer available");
                        state.orgs.active_organization_id = None;
                        state.reset_scoped();
                    }

                    first.filter(|_| state.orgs.active_organization_id.is_none())
                }
                Err(err) => {
                    state.orgs.organizations.fail_load(&err);
                    warn!(kind = ORGANIZATIONS, error = %err, "fetch failed");
                    return Err(err.into());
                }
            }
        };

        if let Some(org_id) = first {
            self.set_active_organization(&org_id)?;
        }

        Ok(self.read().orgs.organizations.len())
    }

    /// Create an organization and switch to it.
    pub async fn create_organization(&self, name: &str, slug: &str) -> StoreResult<Organization> {
        require("name", name)?;
        validate_slug("slug", slug)?;

        let org = self
            .backend
            .create_organization(name.trim(), slug)
            .await
            .inspect_err(|err| warn!(error = %err, "create organization failed"))?;

        self.write().orgs.organizations.append(org.clone());
        self.set_active_organization(&org.id)?;
        info!(org_id = %org.id, slug, "organization created");

        if let Err(err) = self.refresh_organization_data().await {
            warn!(org_id = %org.id, error = %err, "could not load new organization");
        }

        Ok(org)
    }

    /// Add a category to the active organization.
    ///
    /// Adding an existing category changes nothing. Returns whether the
    /// stored set changed.
    pub async fn add_category(&self, name: &str) -> StoreResult<bool> {
        require("category", name)?;
        let org_id = self.require_active()?;
        self.authorize(Capability::ManageOrganization)?;

        let name = self.backend.add_category(&org_id, name.trim()).await?;

        let mut changed = false;
        self.apply_if_active(&org_id, ORGANIZATIONS, |state| {
            if let Some(org) = state.orgs.organizations.get_mut(org_id.as_str()) {
                changed = org.add_category(&name);
            }
        });
        Ok(changed)
    }

    /// Remove a category from the active organization. Removing one that is
    /// not there changes nothing.
    pub async fn remove_category(&self, name: &str) -> StoreResult<bool> {
        require("category", name)?;
        let org_id = self.require_active()?;
        self.authorize(Capability::ManageOrganization)?;

        let name = self.backend.remove_category(&org_id, name.trim()).await?;

        let mut changed = false;
        self.apply_if_active(&org_id, ORGANIZATIONS, |state| {
            if let Some(org) = state.orgs.organizations.get_mut(org_id.as_str()) {
                changed = org.remove_category(&name);
            }
        });
        Ok(changed)
    }

    pub async fn update_organization_settings(
        &self,
        update: &OrganizationUpdate,
    ) -> StoreResult<Organization> {
        update.validate()?;
        let org_id = self.require_active()?;
        self.authorize(Capability::ManageOrganization)?;

        let org = self
            .backend
            .update_organization(&org_id, update)
            .await
            .inspect_err(|err| {
                warn!(org_id = %org_id, error = %err, "update organization failed")
            })?;

        self.apply_if_active(&org_id, ORGANIZATIONS, |state| {
            state.orgs.organizations.replace(org.clone());
            if update.currency.is_some() {
                state.preferences.currency = org.currency;
            }
        });
        info!(org_id = %org_id, "organization settings updated");
        Ok(org)
    }

    // ==================== Team ====================

    pub async fn fetch_members(&self) -> StoreResult<FetchOutcome> {
        let Some(org_id) = self.begin_fetch(MEMBERS, |s| &mut s.orgs.members) else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.backend.get_members(&org_id).await;
        self.settle_fetch(&org_id, MEMBERS, |s| &mut s.orgs.members, result)
    }

    /// Invite someone to the active organization by email.
    pub async fn invite_member(&self, email: &str, role: OrgRole) -> StoreResult<OrgMember> {
        validate_email("email", email)?;
        let org_id = self.require_active()?;
        self.authorize(Capability::ManageTeam)?;

        let email = email.trim();
        let already_member = self.with_state(|s| {
            s.orgs
                .members
                .iter()
                .any(|m| m.email.eq_ignore_ascii_case(email))
        });
        if already_member {
            let err = ValidationError::new("email", "is already a member of this organization");
            return Err(err.into());
        }

        let member = self
            .backend
            .invite_member(&org_id, email, role)
            .await
            .inspect_err(|err| warn!(org_id = %org_id, error = %err, "invite failed"))?;

        self.apply_if_active(&org_id, MEMBERS, |state| {
            state.orgs.members.append(member.clone());
        });
        info!(org_id = %org_id, user_id = %member.user_id, role = %role, "member invited");
        Ok(member)
    }

    pub async fn update_member_role(&self, user_id: &str, role: OrgRole) -> StoreResult<OrgMember> {
        let org_id = self.require_active()?;
        self.authorize(Capability::ManageTeam)?;

        let member = self
            .backend
            .update_member_role(&org_id, user_id, role)
            .await?;

        self.apply_if_active(&org_id, MEMBERS, |state| {
            state.orgs.members.replace(member.clone());
        });
        info!(org_id = %org_id, user_id, role = %role, "member role updated");
        Ok(member)
    }

    /// Remove a member from the active organization. Members cannot remove
    /// themselves.
    pub async fn remove_member(&self, user_id: &str) -> StoreResult<()> {
        let org_id = self.require_active()?;
        self.authorize(Capability::ManageTeam)?;

        if self.with_state(|s| s.current_user_id() == Some(user_id)) {
            return Err(ValidationError::new("userId", "you cannot remove yourself").into());
        }

        let removed = self.backend.remove_member(&org_id, user_id).await?;

        self.apply_if_active(&org_id, MEMBERS, |state| {
            state.orgs.members.remove(removed.as_str());
        });
        info!(org_id = %org_id, user_id, "member removed");
        Ok(())
    }
}
