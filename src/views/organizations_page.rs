use super::Confirm;
use crate::error::{AppError, AppResult};
use crate::models::{CreateOrganizationRequest, Organization};
use crate::services::OrganizationService;
use crate::toast::Toaster;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOrganizationForm {
    pub name: String,
    pub description: String,
}

impl CreateOrganizationForm {
    pub fn validate(&self) -> AppResult<CreateOrganizationRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Organization name is required".to_string(),
            ));
        }

        let description = self.description.trim();
        Ok(CreateOrganizationRequest {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

/// Organization grid with a create modal.
pub struct OrganizationsPage {
    service: OrganizationService,
    toaster: Toaster,
    organizations: Vec<Organization>,
    loading: bool,
    create_open: bool,
    form: CreateOrganizationForm,
    submitting: bool,
}

impl OrganizationsPage {
    pub fn new(service: OrganizationService, toaster: Toaster) -> Self {
        Self {
            service,
            toaster,
            organizations: Vec::new(),
            loading: false,
            create_open: false,
            form: CreateOrganizationForm::default(),
            submitting: false,
        }
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_create_open(&self) -> bool {
        self.create_open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn form(&self) -> &CreateOrganizationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CreateOrganizationForm {
        &mut self.form
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.service.list().await;
        self.loading = false;

        match result {
            Ok(organizations) => {
                self.organizations = organizations;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load organizations: {}", e);
                self.toaster
                    .error(e.user_message("Failed to load organizations"));
                Err(e)
            }
        }
    }

    pub fn open_create(&mut self) {
        self.create_open = true;
    }

    /// Closing the modal discards whatever was typed.
    pub fn close_create(&mut self) {
        self.create_open = false;
        self.form = CreateOrganizationForm::default();
    }

    pub async fn submit_create(&mut self) -> AppResult<Organization> {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.toaster.error(e.user_message("Invalid form"));
                return Err(e);
            }
        };

        self.submitting = true;
        let result = self.service.create(&request).await;
        self.submitting = false;

        match result {
            Ok(org) => {
                self.toaster.success("Organization created successfully");
                // Refetch failure is toasted by load(); the create itself succeeded.
                let _ = self.load().await;
                self.close_create();
                Ok(org)
            }
            Err(e) => {
                tracing::warn!("Failed to create organization: {}", e);
                self.toaster
                    .error(e.user_message("Failed to create organization"));
                Err(e)
            }
        }
    }

    /// Returns Ok(false) when the user declines the prompt.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> AppResult<bool> {
        let name = self
            .organizations
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "this organization".to_string());

        let prompt = format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            name
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        match self.service.delete(id).await {
            Ok(_) => {
                self.toaster.success("Organization deleted successfully");
                let _ = self.load().await;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Failed to delete organization {}: {}", id, e);
                self.toaster
                    .error(e.user_message("Failed to delete organization"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake_api::{organization, FakeApi};
    use crate::toast::ToastKind;
    use reqwest::Method;
    use std::cell::RefCell;
    use std::sync::Arc;

    fn page_over(api: &Arc<FakeApi>) -> (OrganizationsPage, Toaster) {
        let toaster = Toaster::new();
        let page = OrganizationsPage::new(OrganizationService::new(api.clone()), toaster.clone());
        (page, toaster)
    }

    #[test]
    fn test_form_validation() {
        let form = CreateOrganizationForm {
            name: "   ".to_string(),
            description: "x".to_string(),
        };
        assert!(form.validate().unwrap_err().is_validation());

        let form = CreateOrganizationForm {
            name: " Acme ".to_string(),
            description: " ".to_string(),
        };
        let req = form.validate().unwrap();
        assert_eq!(req.name, "Acme");
        assert_eq!(req.description, None);
    }

    #[tokio::test]
    async fn test_empty_name_rejected_without_request() {
        let api = Arc::new(FakeApi::new());
        let (mut page, toaster) = page_over(&api);
        page.open_create();

        let err = page.submit_create().await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(api.request_count(), 0);
        assert!(page.is_create_open());
        assert_eq!(
            toaster.last_message(),
            Some((ToastKind::Error, "Organization name is required".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_refetches_closes_and_resets() {
        let api = Arc::new(FakeApi::new());
        let (mut page, _) = page_over(&api);
        page.load().await.unwrap();

        page.open_create();
        page.form_mut().name = "Acme".to_string();
        page.submit_create().await.unwrap();

        assert_eq!(page.organizations().len(), 1);
        assert_eq!(page.organizations()[0].name, "Acme");
        assert!(!page.is_create_open());
        assert_eq!(page.form(), &CreateOrganizationForm::default());
        assert_eq!(api.requests_to(Method::GET, "/organizations"), 2);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_modal_and_form() {
        let api = Arc::new(FakeApi::new());
        api.fail(Method::POST, "/organizations");
        let (mut page, _) = page_over(&api);

        page.open_create();
        page.form_mut().name = "Acme".to_string();
        assert!(page.submit_create().await.is_err());

        assert!(page.is_create_open());
        assert_eq!(page.form().name, "Acme");
        assert!(!page.is_submitting());
    }

    #[tokio::test]
    async fn test_delete_declined_sends_nothing() {
        let api = Arc::new(FakeApi::with_organization(organization("o1", "Acme"), vec![]));
        let (mut page, _) = page_over(&api);
        page.load().await.unwrap();

        let prompts = RefCell::new(Vec::new());
        let decline = |p: &str| {
            prompts.borrow_mut().push(p.to_string());
            false
        };

        assert!(!page.delete("o1", &decline).await.unwrap());
        assert_eq!(api.requests_to(Method::DELETE, "/organizations/o1"), 0);
        assert!(prompts.borrow()[0].contains("Acme"));
        assert_eq!(page.organizations().len(), 1);
    }

    #[tokio::test]
    async fn test_create_invite_delete_lifecycle() {
        use crate::models::MemberRole;
        use crate::views::{LoadOutcome, OrganizationDetail};

        let api = Arc::new(FakeApi::new());
        let toaster = Toaster::new();
        let service = OrganizationService::new(api.clone());
        let mut list = OrganizationsPage::new(service.clone(), toaster.clone());
        list.load().await.unwrap();

        list.open_create();
        list.form_mut().name = "Acme".to_string();
        list.form_mut().description = String::new();
        list.submit_create().await.unwrap();

        let acme = list
            .organizations()
            .iter()
            .find(|o| o.name == "Acme")
            .cloned()
            .unwrap();
        assert!(acme.description.is_none());
        assert!(!acme.created_at.format("%Y-%m-%d").to_string().is_empty());

        let mut detail = OrganizationDetail::new(service, toaster.clone(), acme.id.clone());
        assert_eq!(detail.load().await, LoadOutcome::Ready);
        detail.open_invite();
        detail.invite_form_mut().email = "a@b.com".to_string();
        detail.invite_form_mut().role = MemberRole::Member;
        detail.submit_invite().await.unwrap();
        assert!(detail
            .members()
            .iter()
            .any(|m| m.user.email == "a@b.com" && m.role == MemberRole::Member));

        assert!(list.delete(&acme.id, &|_: &str| true).await.unwrap());
        assert!(list.organizations().iter().all(|o| o.name != "Acme"));
    }

    #[tokio::test]
    async fn test_delete_confirmed_refetches() {
        let api = Arc::new(FakeApi::with_organization(organization("o1", "Acme"), vec![]));
        let (mut page, _) = page_over(&api);
        page.load().await.unwrap();

        assert!(page.delete("o1", &|_: &str| true).await.unwrap());
        assert!(page.organizations().is_empty());
        assert_eq!(api.requests_to(Method::GET, "/organizations"), 2);
    }
}
