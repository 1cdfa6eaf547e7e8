use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::{mark_all_read_locally, mark_read_locally, remove_locally};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::Notification;
use crate::poller::UnreadCountPoller;
use crate::services::NotificationService;
use crate::toast::Toaster;

/// Header bell popover: the latest notifications plus a polled unread badge.
pub struct NotificationDropdown {
    service: NotificationService,
    toaster: Toaster,
    page_size: u32,
    open: bool,
    loading: bool,
    notifications: Vec<Notification>,
    unread: Arc<watch::Sender<u64>>,
    poller: Option<UnreadCountPoller>,
}

impl NotificationDropdown {
    /// Without background polling. See [`NotificationDropdown::mount`].
    pub fn new(service: NotificationService, toaster: Toaster, page_size: u32) -> Self {
        let (unread, _) = watch::channel(0);
        Self {
            service,
            toaster,
            page_size,
            open: false,
            loading: false,
            notifications: Vec::new(),
            unread: Arc::new(unread),
            poller: None,
        }
    }

    /// Starts unread-count polling; it stops when the dropdown is dropped.
    pub fn mount(service: NotificationService, toaster: Toaster, config: &Config) -> Self {
        let mut dropdown = Self::new(service, toaster, config.dropdown_page_size);
        dropdown.poller = Some(UnreadCountPoller::spawn(
            dropdown.service.clone(),
            config.unread_poll_interval(),
            dropdown.unread.clone(),
        ));
        dropdown
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> u64 {
        *self.unread.borrow()
    }

    pub fn subscribe_unread(&self) -> watch::Receiver<u64> {
        self.unread.subscribe()
    }

    pub fn unread_stream(&self) -> WatchStream<u64> {
        WatchStream::new(self.subscribe_unread())
    }

    fn set_unread(&self, count: u64) {
        self.unread.send_replace(count);
    }

    /// Opens (and loads) or closes the popover. Returns the new open state.
    pub async fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open = true;
            // Failure is already reported through a toast.
            let _ = self.load().await;
        }
        self.open
    }

    pub fn close(&mut self) {
        if self.open {
            tracing::debug!("Notification dropdown closed");
        }
        self.open = false;
    }

    /// Pointer-down anywhere in the document.
    pub fn handle_pointer_down(&mut self, inside_dropdown: bool) {
        if !inside_dropdown {
            self.close();
        }
    }

    pub fn handle_navigation(&mut self) {
        self.close();
    }

    async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.service.list(1, self.page_size).await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.notifications = page.items;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load notifications: {}", e);
                self.toaster
                    .error(e.user_message("Failed to load notifications"));
                Err(e)
            }
        }
    }

    /// Re-syncs the badge. Failures keep the last count.
    pub async fn refresh_unread_count(&mut self) -> AppResult<u64> {
        match self.service.get_unread_count().await {
            Ok(count) => {
                self.set_unread(count);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh unread count: {}", e);
                Err(e)
            }
        }
    }

    pub async fn mark_as_read(&mut self, id: &str) -> AppResult<()> {
        if let Err(e) = self.service.mark_as_read(id).await {
            tracing::warn!("Failed to mark notification {} as read: {}", id, e);
            self.toaster
                .error(e.user_message("Failed to mark notification as read"));
            return Err(e);
        }

        mark_read_locally(&mut self.notifications, id);
        let _ = self.refresh_unread_count().await;
        Ok(())
    }

    pub async fn mark_all_as_read(&mut self) -> AppResult<()> {
        match self.service.mark_all_as_read().await {
            Ok(_) => {
                mark_all_read_locally(&mut self.notifications);
                self.set_unread(0);
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
        if let Err(e) = self.service.delete(id).await {
            tracing::warn!("Failed to delete notification {}: {}", id, e);
            self.toaster
                .error(e.user_message("Failed to delete notification"));
            return Err(e);
        }

        remove_locally(&mut self.notifications, id);
        let _ = self.refresh_unread_count().await;
        Ok(())
    }
}
