//! Process-wide transient feedback messages.
//!
//! A single [`Toaster`] is shared by every view controller. Messages are
//! enqueued, broadcast to subscribers for display, and leave the queue either
//! when dismissed or when their display time runs out.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

const SUCCESS_TTL: Duration = Duration::from_secs(2);
const INFO_TTL: Duration = Duration::from_secs(3);
const ERROR_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    fn default_ttl(&self) -> Duration {
        match self {
            ToastKind::Success => SUCCESS_TTL,
            ToastKind::Info => INFO_TTL,
            ToastKind::Error => ERROR_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.ttl
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToastEvent {
    Shown(Toast),
    Dismissed(u64),
}

struct ToasterInner {
    queue: Mutex<VecDeque<Toast>>,
    next_id: AtomicU64,
    events: broadcast::Sender<ToastEvent>,
}

#[derive(Clone)]
pub struct Toaster {
    inner: Arc<ToasterInner>,
}

impl Toaster {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(ToasterInner {
                queue: Mutex::new(VecDeque::new()),
                next_id: AtomicU64::new(1),
                events,
            }),
        }
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.inner
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>, ttl: Duration) -> u64 {
        let toast = Toast {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            message: message.into(),
            created_at: Instant::now(),
            ttl,
        };
        let id = toast.id;

        tracing::debug!("toast {:?}: {}", toast.kind, toast.message);

        self.queue().push_back(toast.clone());
        // No subscribers is fine; the queue still holds the toast.
        let _ = self.inner.events.send(ToastEvent::Shown(toast));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message, ToastKind::Success.default_ttl())
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message, ToastKind::Info.default_ttl())
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message, ToastKind::Error.default_ttl())
    }

    /// Returns false if the toast was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let removed = {
            let mut queue = self.queue();
            let before = queue.len();
            queue.retain(|t| t.id != id);
            queue.len() != before
        };
        if removed {
            let _ = self.inner.events.send(ToastEvent::Dismissed(id));
        }
        removed
    }

    /// Toasts still on screen. Expired ones are dropped here.
    pub fn visible(&self) -> Vec<Toast> {
        let now = Instant::now();
        let (expired, live) = {
            let mut queue = self.queue();
            let (expired, live): (Vec<Toast>, Vec<Toast>) =
                queue.drain(..).partition(|t| t.is_expired(now));
            queue.extend(live.iter().cloned());
            (expired, live)
        };

        for toast in expired {
            let _ = self.inner.events.send(ToastEvent::Dismissed(toast.id));
        }
        live
    }

    pub fn last_message(&self) -> Option<(ToastKind, String)> {
        self.queue()
            .back()
            .map(|t| (t.kind, t.message.clone()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.inner.events.subscribe()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}
