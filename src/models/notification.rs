use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ProposalReceived,
    ProposalAccepted,
    ProposalRejected,
    ContractCreated,
    ContractSigned,
    ContractCompleted,
    PaymentReceived,
    MilestoneCompleted,
    OrganizationInvite,
    MessageReceived,
    System,
}

impl NotificationType {
    pub const ALL: [NotificationType; 11] = [
        NotificationType::ProposalReceived,
        NotificationType::ProposalAccepted,
        NotificationType::ProposalRejected,
        NotificationType::ContractCreated,
        NotificationType::ContractSigned,
        NotificationType::ContractCompleted,
        NotificationType::PaymentReceived,
        NotificationType::MilestoneCompleted,
        NotificationType::OrganizationInvite,
        NotificationType::MessageReceived,
        NotificationType::System,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NotificationType::ProposalReceived => "Proposal received",
            NotificationType::ProposalAccepted => "Proposal accepted",
            NotificationType::ProposalRejected => "Proposal rejected",
            NotificationType::ContractCreated => "Contract created",
            NotificationType::ContractSigned => "Contract signed",
            NotificationType::ContractCompleted => "Contract completed",
            NotificationType::PaymentReceived => "Payment received",
            NotificationType::MilestoneCompleted => "Milestone completed",
            NotificationType::OrganizationInvite => "Organization invite",
            NotificationType::MessageReceived => "Message received",
            NotificationType::System => "System",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of `GET /notifications`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub pagination: Pagination,
}
