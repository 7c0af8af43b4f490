//! Toast notification queue with timed auto-dismiss

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub variant: ToastVariant,
    /// Milliseconds before auto-dismiss; 0 keeps the toast until dismissed
    pub duration_ms: u64,
}

/// Request to show a toast
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewToast {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub variant: ToastVariant,
    pub duration_ms: Option<u64>,
}

struct Entry {
    toast: Toast,
    timer: Option<JoinHandle<()>>,
}

/// Toasts currently on screen, oldest first
#[derive(Clone, Default)]
pub struct ToastStore {
    entries: Arc<Mutex<Vec<Entry>>>,
    next_id: Arc<AtomicU64>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast and return its id. Expiring toasts spawn a timer task on
    /// the current tokio runtime.
    pub async fn push(&self, request: NewToast) -> String {
        let id = format!("t{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let duration_ms = request.duration_ms.unwrap_or(DEFAULT_DURATION_MS);

        let toast = Toast {
            id: id.clone(),
            title: request.title,
            description: request.description,
            variant: request.variant,
            duration_ms,
        };

        // Hold the lock until the entry is in place so the timer cannot run ahead of it
        let mut entries = self.entries.lock().await;
        let timer = (duration_ms > 0).then(|| {
            let store = self.clone();
            let id = id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(duration_ms)).await;
                store.expire(&id).await;
            })
        });
        entries.push(Entry { toast, timer });
        drop(entries);

        debug!(id = %id, "Toast shown");
        id
    }

    /// Remove a toast before it expires. Returns false for unknown ids.
    pub async fn dismiss(&self, id: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let Some(idx) = entries.iter().position(|e| e.toast.id == id) else {
            return false;
        };

        let entry = entries.remove(idx);
        if let Some(timer) = entry.timer {
            timer.abort();
        }
        true
    }

    async fn expire(&self, id: &str) {
        self.entries.lock().await.retain(|e| e.toast.id != id);
        debug!(id, "Toast expired");
    }

    pub async fn list(&self) -> Vec<Toast> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|e| e.toast.clone())
            .collect()
    }

    /// Drop every toast and cancel pending timers
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        for entry in entries.drain(..) {
            if let Some(timer) = entry.timer {
                timer.abort();
            }
        }
    }
}
