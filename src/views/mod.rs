pub mod notification_dropdown;
pub mod notifications_page;
pub mod organization_detail;
pub mod organizations_page;
pub mod pagination;

pub use notification_dropdown::NotificationDropdown;
pub use notifications_page::{NotificationFilter, NotificationsPage};
pub use organization_detail::{
    EditOrganizationForm, InviteForm, LoadOutcome, OrganizationDetail,
};
pub use organizations_page::{CreateOrganizationForm, OrganizationsPage};
pub use pagination::Pager;

use crate::models::Notification;

/// Yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Where a controller asks the shell to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Organizations,
    Organization(String),
}

fn mark_read_locally(items: &mut [Notification], id: &str) -> bool {
    match items.iter_mut().find(|n| n.id == id) {
        Some(n) => {
            n.read = true;
            true
        }
        None => false,
    }
}

fn mark_all_read_locally(items: &mut [Notification]) {
    items.iter_mut().for_each(|n| n.read = true);
}

fn remove_locally(items: &mut Vec<Notification>, id: &str) -> bool {
    let before = items.len();
    items.retain(|n| n.id != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake_api::notification;

    fn ids(items: &[Notification]) -> Vec<&str> {
        items.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_mark_read_touches_only_target() {
        let mut items = vec![
            notification("a", false),
            notification("b", false),
            notification("c", true),
        ];
        let before = items.clone();

        assert!(mark_read_locally(&mut items, "b"));
        assert!(items[1].read);
        assert_eq!(items[0], before[0]);
        assert_eq!(items[2], before[2]);

        assert!(!mark_read_locally(&mut items, "zzz"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut items = vec![
            notification("a", false),
            notification("b", true),
            notification("c", false),
            notification("d", true),
        ];
        assert!(remove_locally(&mut items, "b"));
        assert_eq!(ids(&items), vec!["a", "c", "d"]);
        assert!(!remove_locally(&mut items, "b"));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_mark_all_read() {
        let mut items = vec![notification("a", false), notification("b", true)];
        mark_all_read_locally(&mut items);
        assert!(items.iter().all(|n| n.read));
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        let no = |prompt: &str| prompt.is_empty();
        assert!(yes.confirm("Delete?"));
        assert!(!no.confirm("Delete?"));
    }
}
