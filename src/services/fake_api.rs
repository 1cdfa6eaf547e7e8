use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::http_client::{ApiRequest, ApiTransport};
use crate::models::{
    MemberRole, MemberUser, Notification, NotificationType, Organization, OrganizationCounts,
    OrganizationMember,
};

pub(crate) fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub(crate) fn notification(id: &str, read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        user_id: "u1".to_string(),
        kind: NotificationType::System,
        title: format!("Title {}", id),
        message: format!("Message {}", id),
        read,
        metadata: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub(crate) fn organization(id: &str, name: &str) -> Organization {
    Organization {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        created_at: ts(),
        updated_at: ts(),
        counts: Some(OrganizationCounts {
            members: 1,
            proposals: 0,
            contracts: 0,
        }),
    }
}

pub(crate) fn member(id: &str, org_id: &str, role: MemberRole, email: &str) -> OrganizationMember {
    OrganizationMember {
        id: id.to_string(),
        organization_id: org_id.to_string(),
        user_id: format!("user-{}", id),
        role,
        user: MemberUser {
            id: Some(format!("user-{}", id)),
            email: email.to_string(),
            first_name: None,
            last_name: None,
        },
        joined_at: ts(),
    }
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub notifications: Vec<Notification>,
    pub organizations: Vec<Organization>,
    pub members: HashMap<String, Vec<OrganizationMember>>,
    pub requests: Vec<ApiRequest>,
    failures: Vec<(Method, String)>,
    replies: Vec<(Method, String, Value)>,
    next_id: u64,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(notifications: Vec<Notification>) -> Self {
        let api = Self::new();
        api.state.lock().unwrap().notifications = notifications;
        api
    }

    pub fn with_organization(org: Organization, members: Vec<OrganizationMember>) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().unwrap();
            state.members.insert(org.id.clone(), members);
            state.organizations.push(org);
        }
        api
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Every subsequent request matching method and exact path answers 500.
    pub fn fail(&self, method: Method, path: &str) {
        self.state().failures.push((method, path.to_string()));
    }

    /// The request is still applied, but answers with `body` instead of the usual reply.
    pub fn reply_with(&self, method: Method, path: &str, body: Value) {
        self.state().replies.push((method, path.to_string(), body));
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

fn ok(data: Value) -> AppResult<Value> {
    Ok(json!({ "success": true, "data": data }))
}

fn ok_message(message: &str) -> AppResult<Value> {
    Ok(json!({ "success": true, "message": message }))
}

fn not_found(what: &str) -> AppResult<Value> {
    Err(AppError::Api {
        status: StatusCode::NOT_FOUND,
        message: Some(format!("{} not found", what)),
    })
}

fn query_u32(request: &ApiRequest, key: &str, default: u32) -> u32 {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(default)
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn route(&mut self, request: &ApiRequest) -> AppResult<Value> {
        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["notifications"]) => {
                let page = query_u32(request, "page", 1).max(1);
                let limit = query_u32(request, "limit", 20).max(1);
                let total = self.notifications.len() as u32;
                let start = ((page - 1) * limit) as usize;
                let items: Vec<&Notification> = self
                    .notifications
                    .iter()
                    .skip(start)
                    .take(limit as usize)
                    .collect();
                Ok(json!({
                    "success": true,
                    "data": items,
                    "pagination": {
                        "page": page,
                        "limit": limit,
                        "total": total,
                        "totalPages": total.div_ceil(limit),
                    }
                }))
            }
            ("GET", ["notifications", "unread-count"]) => {
                let count = self.notifications.iter().filter(|n| !n.read).count();
                ok(json!({ "count": count }))
            }
            ("POST", ["notifications", "mark-all-read"]) => {
                self.notifications.iter_mut().for_each(|n| n.read = true);
                ok_message("All notifications marked as read")
            }
            ("PATCH", ["notifications", id, "read"]) => {
                match self.notifications.iter_mut().find(|n| n.id == *id) {
                    Some(n) => {
                        n.read = true;
                        ok(serde_json::to_value(&*n)?)
                    }
                    None => not_found("Notification"),
                }
            }
            ("DELETE", ["notifications", id]) => {
                let before = self.notifications.len();
                self.notifications.retain(|n| n.id != *id);
                if self.notifications.len() == before {
                    return not_found("Notification");
                }
                ok_message("Notification deleted")
            }
            ("GET", ["organizations"]) => ok(serde_json::to_value(&self.organizations)?),
            ("POST", ["organizations"]) => {
                let id = self.next_id("org");
                let now = Utc::now();
                let org = Organization {
                    id: id.clone(),
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    description: body["description"].as_str().map(|s| s.to_string()),
                    created_at: now,
                    updated_at: now,
                    counts: Some(OrganizationCounts {
                        members: 1,
                        ..Default::default()
                    }),
                };
                let owner = member(&self.next_id("mem"), &id, MemberRole::Owner, "owner@example.com");
                self.members.insert(id, vec![owner]);
                self.organizations.push(org.clone());
                ok(serde_json::to_value(org)?)
            }
            ("GET", ["organizations", id]) => {
                match self.organizations.iter().find(|o| o.id == *id) {
                    Some(org) => ok(serde_json::to_value(org)?),
                    None => not_found("Organization"),
                }
            }
            ("PATCH", ["organizations", id]) => {
                match self.organizations.iter_mut().find(|o| o.id == *id) {
                    Some(org) => {
                        if let Some(name) = body["name"].as_str() {
                            org.name = name.to_string();
                        }
                        if let Some(description) = body["description"].as_str() {
                            org.description = Some(description.to_string());
                        }
                        org.updated_at = Utc::now();
                        ok(serde_json::to_value(&*org)?)
                    }
                    None => not_found("Organization"),
                }
            }
            ("DELETE", ["organizations", id]) => {
                let before = self.organizations.len();
                self.organizations.retain(|o| o.id != *id);
                if self.organizations.len() == before {
                    return not_found("Organization");
                }
                self.members.remove(*id);
                ok_message("Organization deleted")
            }
            ("GET", ["organizations", id, "members"]) => match self.members.get(*id) {
                Some(members) => ok(serde_json::to_value(members)?),
                None => not_found("Organization"),
            },
            ("POST", ["organizations", id, "invite"]) => {
                if !self.members.contains_key(*id) {
                    return not_found("Organization");
                }
                let role: MemberRole = serde_json::from_value(body["role"].clone())?;
                let email = body["email"].as_str().unwrap_or_default().to_string();
                let new_id = self.next_id("mem");
                let invited = member(&new_id, id, role, &email);
                if let Some(members) = self.members.get_mut(*id) {
                    members.push(invited.clone());
                }
                ok(serde_json::to_value(invited)?)
            }
            ("PATCH", ["organizations", id, "members", member_id]) => {
                let role: MemberRole = serde_json::from_value(body["role"].clone())?;
                let found = self
                    .members
                    .get_mut(*id)
                    .and_then(|members| members.iter_mut().find(|m| m.id == *member_id));
                match found {
                    Some(m) => {
                        m.role = role;
                        ok(serde_json::to_value(&*m)?)
                    }
                    None => not_found("Member"),
                }
            }
            ("DELETE", ["organizations", id, "members", member_id]) => {
                let Some(members) = self.members.get_mut(*id) else {
                    return not_found("Organization");
                };
                let before = members.len();
                members.retain(|m| m.id != *member_id);
                if members.len() == before {
                    return not_found("Member");
                }
                ok_message("Member removed")
            }
            _ => Err(AppError::Api {
                status: StatusCode::NOT_FOUND,
                message: Some(format!("No route for {} {}", request.method, request.path)),
            }),
        }
    }
}

#[async_trait]
impl ApiTransport for FakeApi {
    async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state
            .failures
            .iter()
            .any(|(m, p)| *m == request.method && *p == request.path)
        {
            return Err(AppError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: Some("Internal server error".to_string()),
            });
        }

        let routed = state.route(&request)?;
        let replaced = state
            .replies
            .iter()
            .find(|(m, p, _)| *m == request.method && *p == request.path)
            .map(|(_, _, body)| body.clone());
        Ok(replaced.unwrap_or(routed))
    }
}
