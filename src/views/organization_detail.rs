use super::{Confirm, Route};
use crate::error::{AppError, AppResult};
use crate::models::{
    InviteMemberRequest, MemberRole, Organization, OrganizationMember, UpdateOrganizationRequest,
};
use crate::services::OrganizationService;
use crate::toast::Toaster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Redirect(Route),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteForm {
    pub email: String,
    pub role: MemberRole,
}

impl InviteForm {
    pub fn validate(&self) -> AppResult<InviteMemberRequest> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        if !self.role.is_assignable() {
            return Err(AppError::Validation(format!(
                "The {} role cannot be assigned",
                self.role
            )));
        }
        Ok(InviteMemberRequest {
            email: email.to_string(),
            role: self.role,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOrganizationForm {
    pub name: String,
    pub description: String,
}

impl EditOrganizationForm {
    fn from_organization(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            description: org.description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> AppResult<UpdateOrganizationRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Organization name is required".to_string(),
            ));
        }
        Ok(UpdateOrganizationRequest {
            name: Some(name.to_string()),
            description: Some(self.description.trim().to_string()),
        })
    }
}

/// One organization and its members.
pub struct OrganizationDetail {
    service: OrganizationService,
    toaster: Toaster,
    org_id: String,
    organization: Option<Organization>,
    members: Vec<OrganizationMember>,
    loading: bool,
    invite_open: bool,
    invite_form: InviteForm,
    edit_open: bool,
    edit_form: EditOrganizationForm,
}

impl OrganizationDetail {
    pub fn new(service: OrganizationService, toaster: Toaster, org_id: impl Into<String>) -> Self {
        Self {
            service,
            toaster,
            org_id: org_id.into(),
            organization: None,
            members: Vec::new(),
            loading: false,
            invite_open: false,
            invite_form: InviteForm::default(),
            edit_open: false,
            edit_form: EditOrganizationForm::default(),
        }
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    pub fn members(&self) -> &[OrganizationMember] {
        &self.members
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Options for the invite and role selects.
    pub fn assignable_roles(&self) -> [MemberRole; 3] {
        MemberRole::assignable()
    }

    /// OWNER rows get no role select and no remove button.
    pub fn can_edit(&self, member: &OrganizationMember) -> bool {
        !member.is_owner()
    }

    /// Fetches the organization and its members side by side.
    pub async fn load(&mut self) -> LoadOutcome {
        self.loading = true;
        let (org, members) = tokio::join!(
            self.service.get_by_id(&self.org_id),
            self.service.get_members(&self.org_id)
        );
        self.loading = false;

        match members {
            Ok(members) => self.members = members,
            Err(e) => {
                tracing::warn!("Failed to load members of {}: {}", self.org_id, e);
                self.toaster.error(e.user_message("Failed to load members"));
            }
        }

        match org {
            Ok(org) => {
                self.organization = Some(org);
                LoadOutcome::Ready
            }
            Err(e) => {
                tracing::warn!("Failed to load organization {}: {}", self.org_id, e);
                self.toaster
                    .error(e.user_message("Failed to load organization"));
                LoadOutcome::Redirect(Route::Organizations)
            }
        }
    }

    pub async fn refresh_members(&mut self) -> AppResult<()> {
        match self.service.get_members(&self.org_id).await {
            Ok(members) => {
                self.members = members;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load members of {}: {}", self.org_id, e);
                self.toaster.error(e.user_message("Failed to load members"));
                Err(e)
            }
        }
    }

    pub fn is_invite_open(&self) -> bool {
        self.invite_open
    }

    pub fn invite_form(&self) -> &InviteForm {
        &self.invite_form
    }

    pub fn invite_form_mut(&mut self) -> &mut InviteForm {
        &mut self.invite_form
    }

    pub fn open_invite(&mut self) {
        self.invite_open = true;
    }

    pub fn close_invite(&mut self) {
        self.invite_open = false;
        self.invite_form = InviteForm::default();
    }

    pub async fn submit_invite(&mut self) -> AppResult<()> {
        let request = match self.invite_form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.toaster.error(e.user_message("Invalid form"));
                return Err(e);
            }
        };

        match self.service.invite_member(&self.org_id, &request).await {
            Ok(_) => {
                self.toaster.success("Invitation sent successfully");
                let _ = self.refresh_members().await;
                self.close_invite();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to invite {}: {}", request.email, e);
                self.toaster.error(e.user_message("Failed to send invitation"));
                Err(e)
            }
        }
    }

    fn find_member(&self, member_id: &str) -> AppResult<&OrganizationMember> {
        self.members
            .iter()
            .find(|m| m.id == member_id)
            .ok_or_else(|| AppError::Validation("Member not found".to_string()))
    }

    fn reject(&self, e: AppError) -> AppResult<()> {
        self.toaster.error(e.user_message("Invalid action"));
        Err(e)
    }

    pub async fn change_role(&mut self, member_id: &str, role: MemberRole) -> AppResult<()> {
        let member = match self.find_member(member_id) {
            Ok(member) => member,
            Err(e) => return self.reject(e),
        };
        if !self.can_edit(member) {
            return self.reject(AppError::Validation(
                "The owner's role cannot be changed".to_string(),
            ));
        }
        if !role.is_assignable() {
            return self.reject(AppError::Validation(format!(
                "The {} role cannot be assigned",
                role
            )));
        }

        match self
            .service
            .update_member_role(&self.org_id, member_id, role)
            .await
        {
            Ok(_) => {
                self.toaster.success("Member role updated");
                let _ = self.refresh_members().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to change role of {}: {}", member_id, e);
                self.toaster.error(e.user_message("Failed to update role"));
                Err(e)
            }
        }
    }

    /// Returns Ok(false) when the user declines the prompt.
    pub async fn remove_member(&mut self, member_id: &str, confirm: &dyn Confirm) -> AppResult<bool> {
        let member = match self.find_member(member_id) {
            Ok(member) => member,
            Err(e) => return self.reject(e).map(|_| false),
        };
        if !self.can_edit(member) {
            return self
                .reject(AppError::Validation(
                    "The owner cannot be removed".to_string(),
                ))
                .map(|_| false);
        }

        let prompt = format!(
            "Are you sure you want to remove {} from this organization?",
            member.user.display_name()
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        match self.service.remove_member(&self.org_id, member_id).await {
            Ok(_) => {
                self.toaster.success("Member removed successfully");
                let _ = self.refresh_members().await;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Failed to remove member {}: {}", member_id, e);
                self.toaster.error(e.user_message("Failed to remove member"));
                Err(e)
            }
        }
    }

    pub fn is_edit_open(&self) -> bool {
        self.edit_open
    }

    pub fn edit_form_mut(&mut self) -> &mut EditOrganizationForm {
        &mut self.edit_form
    }

    /// Pre-fills the form from the loaded organization.
    pub fn open_edit(&mut self) {
        self.edit_form = self
            .organization
            .as_ref()
            .map(EditOrganizationForm::from_organization)
            .unwrap_or_default();
        self.edit_open = true;
    }

    pub fn close_edit(&mut self) {
        self.edit_open = false;
        self.edit_form = EditOrganizationForm::default();
    }

    pub async fn submit_edit(&mut self) -> AppResult<()> {
        let request = match self.edit_form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.toaster.error(e.user_message("Invalid form"));
                return Err(e);
            }
        };

        match self.service.update(&self.org_id, &request).await {
            Ok(org) => {
                self.organization = Some(org);
                self.toaster.success("Organization updated successfully");
                self.close_edit();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to update organization {}: {}", self.org_id, e);
                self.toaster
                    .error(e.user_message("Failed to update organization"));
                Err(e)
            }
        }
    }
}
