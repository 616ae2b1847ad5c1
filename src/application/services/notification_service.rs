use crate::domain::entities::{Severity, Toast};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory toast queue. Toasts with a duration remove themselves; a zero
/// duration makes a toast sticky until dismissed.
#[derive(Clone)]
pub struct NotificationService {
    toasts: Arc<RwLock<Vec<Toast>>>,
    default_duration: Duration,
}

impl NotificationService {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Arc::new(RwLock::new(Vec::new())),
            default_duration,
        }
    }

    pub async fn show_toast(&self, message: impl Into<String>, severity: Severity) -> Toast {
        self.show_toast_for(message, severity, self.default_duration)
            .await
    }

    pub async fn show_toast_for(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
    ) -> Toast {
        let duration_ms = (!duration.is_zero()).then(|| duration.as_millis() as u64);
        let toast = Toast::new(message, severity, duration_ms);

        self.toasts.write().await.push(toast.clone());
        tracing::debug!("Toast {} ({:?}): {}", toast.id, toast.severity, toast.message);

        if duration_ms.is_some() {
            schedule_removal(Arc::downgrade(&self.toasts), toast.id, duration);
        }

        toast
    }

    pub async fn success(&self, message: impl Into<String>) -> Toast {
        self.show_toast(message, Severity::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Toast {
        self.show_toast(message, Severity::Error).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Toast {
        self.show_toast(message, Severity::Info).await
    }

    /// Returns false when the toast was already gone.
    pub async fn remove_toast(&self, id: Uuid) -> bool {
        remove(&self.toasts, id).await
    }

    /// Active toasts, oldest first
    pub async fn toasts(&self) -> Vec<Toast> {
        self.toasts.read().await.clone()
    }
}

async fn remove(toasts: &RwLock<Vec<Toast>>, id: Uuid) -> bool {
    let mut toasts = toasts.write().await;
    let before = toasts.len();
    toasts.retain(|toast| toast.id != id);
    toasts.len() != before
}

// The timer only holds a weak handle, so a dropped queue ends it quietly.
fn schedule_removal(toasts: Weak<RwLock<Vec<Toast>>>, id: Uuid, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        if let Some(toasts) = toasts.upgrade() {
            remove(&toasts, id).await;
        }
    });
}
