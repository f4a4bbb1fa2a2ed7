//! Daily reminder digest pushed to a configured webhook.
//!
//! The original process pushed through a chat-vendor SDK; here the digest
//! goes to any JSON webhook endpoint supplied in configuration.

use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::reminders::{Reminder, ReminderService};
use crate::errors::ServiceError;

#[derive(Debug, Serialize, ToSchema)]
pub struct DigestOutcome {
    /// Number of reminders due today
    #[schema(example = 2)]
    pub due: usize,
    /// Whether a push was sent
    pub pushed: bool,
    #[schema(example = "2 reminders pushed")]
    pub message: String,
}

pub struct NotifyService {
    reminders: ReminderService,
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl NotifyService {
    pub fn new(
        reminders: ReminderService,
        http: reqwest::Client,
        webhook_url: Option<String>,
    ) -> Self {
        Self { reminders, http, webhook_url }
    }

    fn render_digest(date: &str, due: &[Reminder]) -> String {
        let mut text = format!("Reminders due today ({date})\n");
        for (i, reminder) in due.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. [{}] {}\n{}\n",
                i + 1,
                reminder.case_id,
                reminder.category,
                reminder.content
            ));
        }
        text
    }

    /// Collect today's pending reminders and push a text digest.
    #[instrument(skip(self))]
    pub async fn check_today(&self, today: &str) -> Result<DigestOutcome, ServiceError> {
        let webhook_url = self.webhook_url.as_deref().ok_or_else(|| {
            ServiceError::ServiceUnavailable(
                "notify webhook URL is not configured".to_string(),
            )
        })?;

        let due = self.reminders.due_on(today).await?;
        if due.is_empty() {
            return Ok(DigestOutcome {
                due: 0,
                pushed: false,
                message: "no reminders due today".to_string(),
            });
        }

        let digest = Self::render_digest(today, &due);
        let response = self
            .http
            .post(webhook_url)
            .json(&json!({ "text": digest }))
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        info!(count = due.len(), "reminder digest pushed");
        Ok(DigestOutcome {
            due: due.len(),
            pushed: true,
            message: format!("{} reminders pushed", due.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_lists_each_due_reminder() {
        let due = vec![
            Reminder {
                reminder_id: "R25-001".into(),
                case_id: "P25-001".into(),
                remind_on: "2025-04-15".into(),
                category: "manual".into(),
                content: "order flowers".into(),
                status: "pending".into(),
                created_by: "S02".into(),
            },
            Reminder {
                reminder_id: "R25-002".into(),
                case_id: "P25-002".into(),
                remind_on: "2025-04-15".into(),
                category: "ritual".into(),
                content: "seventh week".into(),
                status: "pending".into(),
                created_by: "S02".into(),
            },
        ];
        let digest = NotifyService::render_digest("2025-04-15", &due);
        assert!(digest.starts_with("Reminders due today (2025-04-15)"));
        assert!(digest.contains("1. [P25-001] manual"));
        assert!(digest.contains("2. [P25-002] ritual"));
        assert!(digest.contains("order flowers"));
    }
}
