use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::http_client::{segment, ApiRequest, ApiTransport};
use crate::models::{
    ApiEnvelope, CreateOrganizationRequest, InviteMemberRequest, MemberRole, Organization,
    OrganizationMember, UpdateMemberRoleRequest, UpdateOrganizationRequest,
};

/// Thin wrapper over the `/organizations` endpoints.
#[derive(Clone)]
pub struct OrganizationService {
    transport: Arc<dyn ApiTransport>,
}

impl OrganizationService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    fn org_path(id: &str) -> String {
        format!("/organizations/{}", segment(id))
    }

    fn member_path(org_id: &str, member_id: &str) -> String {
        format!(
            "/organizations/{}/members/{}",
            segment(org_id),
            segment(member_id)
        )
    }

    pub async fn list(&self) -> AppResult<Vec<Organization>> {
        let value = self.transport.send(ApiRequest::get("/organizations")).await?;
        ApiEnvelope::from_value(value)?.into_data()
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Organization> {
        let value = self.transport.send(ApiRequest::get(Self::org_path(id))).await?;
        ApiEnvelope::from_value(value)?.into_data()
    }

    pub async fn create(&self, data: &CreateOrganizationRequest) -> AppResult<Organization> {
        let request = ApiRequest::post("/organizations").json(data)?;
        let value = self.transport.send(request).await?;
        let org: Organization = ApiEnvelope::from_value(value)?.into_data()?;
        tracing::info!("Organization created: id={}, name={}", org.id, org.name);
        Ok(org)
    }

    pub async fn update(
        &self,
        id: &str,
        data: &UpdateOrganizationRequest,
    ) -> AppResult<Organization> {
        let request = ApiRequest::patch(Self::org_path(id)).json(data)?;
        let value = self.transport.send(request).await?;
        ApiEnvelope::from_value(value)?.into_data()
    }

    pub async fn delete(&self, id: &str) -> AppResult<String> {
        let value = self
            .transport
            .send(ApiRequest::delete(Self::org_path(id)))
            .await?;
        let message = ApiEnvelope::<Value>::from_value(value)?.into_message()?;
        tracing::info!("Organization deleted: id={}", id);
        Ok(message)
    }

    pub async fn get_members(&self, org_id: &str) -> AppResult<Vec<OrganizationMember>> {
        let request = ApiRequest::get(format!("{}/members", Self::org_path(org_id)));
        let value = self.transport.send(request).await?;
        ApiEnvelope::from_value(value)?.into_data()
    }

    pub async fn invite_member(
        &self,
        org_id: &str,
        data: &InviteMemberRequest,
    ) -> AppResult<String> {
        ensure_assignable(data.role)?;

        let request =
            ApiRequest::post(format!("{}/invite", Self::org_path(org_id))).json(data)?;
        let value = self.transport.send(request).await?;
        // Callers refetch members; the invitation record shape varies by backend.
        let message = ApiEnvelope::<Value>::from_value(value)?.into_message()?;
        tracing::info!(
            "Member invited: org={}, email={}, role={}",
            org_id,
            data.email,
            data.role
        );
        Ok(message)
    }

    pub async fn update_member_role(
        &self,
        org_id: &str,
        member_id: &str,
        role: MemberRole,
    ) -> AppResult<String> {
        ensure_assignable(role)?;

        let request = ApiRequest::patch(Self::member_path(org_id, member_id))
            .json(&UpdateMemberRoleRequest { role })?;
        let value = self.transport.send(request).await?;
        ApiEnvelope::<Value>::from_value(value)?.into_message()
    }

    pub async fn remove_member(&self, org_id: &str, member_id: &str) -> AppResult<String> {
        let value = self
            .transport
            .send(ApiRequest::delete(Self::member_path(org_id, member_id)))
            .await?;
        ApiEnvelope::<Value>::from_value(value)?.into_message()
    }
}

fn ensure_assignable(role: MemberRole) -> AppResult<()> {
    if role.is_assignable() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "The {} role cannot be assigned",
            role
        )))
    }
}
