pub mod notification_service;
pub mod organization_service;

#[cfg(test)]
pub(crate) mod fake_api;

pub use notification_service::NotificationService;
pub use organization_service::OrganizationService;
