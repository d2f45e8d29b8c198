use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Board lane a task lives in. Also keys every per-state theme map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    OnHold,
    Current,
    #[default]
    Upcoming,
    Completed,
}

impl TaskStatus {
    /// All lanes in board order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::OnHold,
        TaskStatus::Current,
        TaskStatus::Upcoming,
        TaskStatus::Completed,
    ];

    /// Wire name, as used by the API and as theme map key
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::OnHold => "ON_HOLD",
            TaskStatus::Current => "CURRENT",
            TaskStatus::Upcoming => "UPCOMING",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::OnHold => "On Hold",
            TaskStatus::Current => "Current",
            TaskStatus::Upcoming => "Upcoming",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Kebab-case form used in CSS variable names
    pub fn slug(&self) -> &'static str {
        match self {
            TaskStatus::OnHold => "on-hold",
            TaskStatus::Current => "current",
            TaskStatus::Upcoming => "upcoming",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status or priority name is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    /// Accepts `ON_HOLD`, `on_hold` and `on-hold` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                ParseEnumError::new("task status", s, "ON_HOLD, CURRENT, UPCOMING, COMPLETED")
            })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            _ => Err(ParseEnumError::new("priority", s, "LOW, MEDIUM, HIGH")),
        }
    }
}

/// A task as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Server-assigned identifier
    pub id: i64,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    /// Read-only label computed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_display: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    /// Read-only label computed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_display: Option<String>,

    /// Position within the status column (drag and drop ordering)
    #[serde(default)]
    pub order: i64,

    #[serde(default)]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable fields of a task, sent on create and full update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDraft {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: Priority,

    /// Left to the server when absent; it appends to the end of the column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(default)]
    pub completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            order: None,
            completed: false,
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            order: Some(task.order),
            completed: task.completed,
        }
    }
}

/// Partial update used when a card is dragged to another position or column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskMove {
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TaskStatus::OnHold).unwrap();
        assert_eq!(json, "\"ON_HOLD\"");
        let status: TaskStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn test_status_from_str_spellings() {
        assert_eq!("ON_HOLD".parse::<TaskStatus>().unwrap(), TaskStatus::OnHold);
        assert_eq!("on-hold".parse::<TaskStatus>().unwrap(), TaskStatus::OnHold);
        assert_eq!("current".parse::<TaskStatus>().unwrap(), TaskStatus::Current);
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("LOW, MEDIUM, HIGH"));
    }

    #[test]
    fn test_task_from_server_payload() {
        let payload = r#"{
            "id": 7,
            "title": "Write docs",
            "description": "",
            "status": "CURRENT",
            "status_display": "Current",
            "priority": "HIGH",
            "priority_display": "High",
            "order": 3,
            "completed": false,
            "created_at": "2024-03-01T10:15:00.123456Z",
            "updated_at": "2024-03-02T08:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(payload).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.status, TaskStatus::Current);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status_display.as_deref(), Some("Current"));
        assert!(task.created_at.is_some());
    }

    #[test]
    fn test_draft_defaults_and_order_omitted() {
        let draft = TaskDraft::new("Plan sprint");
        assert_eq!(draft.status, TaskStatus::Upcoming);
        assert_eq!(draft.priority, Priority::Medium);

        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("order").is_none());
        assert_eq!(value["status"], "UPCOMING");
    }
}
