use super::{mark_all_read_locally, mark_read_locally, remove_locally, Pager};
use crate::error::AppResult;
use crate::models::Notification;
use crate::services::NotificationService;
use crate::toast::Toaster;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.read,
        }
    }
}

/// Full-page inbox. The filter only narrows the page that is already loaded.
pub struct NotificationsPage {
    service: NotificationService,
    toaster: Toaster,
    limit: u32,
    pager: Pager,
    filter: NotificationFilter,
    notifications: Vec<Notification>,
    total: u64,
    loading: bool,
}

impl NotificationsPage {
    pub fn new(service: NotificationService, toaster: Toaster, limit: u32) -> Self {
        Self {
            service,
            toaster,
            limit,
            pager: Pager::new(),
            filter: NotificationFilter::All,
            notifications: Vec::new(),
            total: 0,
            loading: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.pager.page()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn filter(&self) -> NotificationFilter {
        self.filter
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn visible(&self) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| self.filter.matches(n))
            .collect()
    }

    pub fn unread_on_page(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.service.list(self.pager.page(), self.limit).await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.notifications = page.items;
                self.total = page.pagination.total;
                self.pager.set_total_pages(page.pagination.total_pages);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load notifications page {}: {}", self.pager.page(), e);
                self.toaster
                    .error(e.user_message("Failed to load notifications"));
                Err(e)
            }
        }
    }

    pub async fn set_filter(&mut self, filter: NotificationFilter) -> AppResult<()> {
        if filter == self.filter {
            return Ok(());
        }
        self.filter = filter;
        self.load().await
    }

    /// Loads the page the pager just moved to, stepping back to `previous` on failure.
    async fn load_moved(&mut self, previous: u32) -> AppResult<()> {
        if let Err(e) = self.load().await {
            self.pager.go_to(previous);
            return Err(e);
        }
        Ok(())
    }

    pub async fn next_page(&mut self) -> AppResult<()> {
        let previous = self.pager.page();
        if self.pager.next() {
            self.load_moved(previous).await?;
        }
        Ok(())
    }

    pub async fn prev_page(&mut self) -> AppResult<()> {
        let previous = self.pager.page();
        if self.pager.prev() {
            self.load_moved(previous).await?;
        }
        Ok(())
    }

    pub async fn go_to_page(&mut self, page: u32) -> AppResult<()> {
        let previous = self.pager.page();
        if self.pager.go_to(page) {
            self.load_moved(previous).await?;
        }
        Ok(())
    }

    pub async fn mark_as_read(&mut self, id: &str) -> AppResult<()> {
        match self.service.mark_as_read(id).await {
            Ok(_) => {
                mark_read_locally(&mut self.notifications, id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to mark notification {} as read: {}", id, e);
                self.toaster
                    .error(e.user_message("Failed to mark notification as read"));
                Err(e)
            }
        }
    }

    pub async fn mark_all_as_read(&mut self) -> AppResult<()> {
        match self.service.mark_all_as_read().await {
            Ok(_) => {
                mark_all_read_locally(&mut self.notifications);
                self.toaster.success("All notifications marked as read");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to mark all notifications as read: {}", e);
                self.toaster
                    .error(e.user_message("Failed to mark all as read"));
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> AppResult<()> {
        match self.service.delete(id).await {
            Ok(_) => {
                if remove_locally(&mut self.notifications, id) {
                    self.total = self.total.saturating_sub(1);
                }
                self.toaster.success("Notification deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to delete notification {}: {}", id, e);
                self.toaster
                    .error(e.user_message("Failed to delete notification"));
                Err(e)
            }
        }
    }
}
