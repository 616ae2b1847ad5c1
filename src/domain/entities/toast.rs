use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    /// `None` means the toast stays until dismissed.
    pub duration_ms: Option<u64>,
}

impl Toast {
    pub fn new(message: impl Into<String>, severity: Severity, duration_ms: Option<u64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
            duration_ms,
        }
    }

    /// Newlines in the message separate paragraphs; blank lines are dropped.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.message
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_split_on_newlines() {
        let toast = Toast::new(
            "Selection saved!\n\n12 categories selected for noriega",
            Severity::Success,
            Some(3000),
        );
        assert_eq!(
            toast.paragraphs(),
            vec!["Selection saved!", "12 categories selected for noriega"]
        );
    }
}
