use chrono::prelude::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum Status {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Closed,
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Critical" => Ok(Priority::Critical),
            _ => Err(ValidationError::InvalidPriority),
        }
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Open" => Ok(Status::Open),
            "In Progress" => Ok(Status::InProgress),
            "Completed" => Ok(Status::Completed),
            "Closed" => Ok(Status::Closed),
            _ => Err(ValidationError::InvalidStatus),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Status::InProgress => write!(f, "In Progress"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A maintenance ticket as held by the store and returned by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaintenanceRequest {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new request. The store fills in the rest.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub created_by: Option<String>,
}

/// Validated partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RequestChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl RequestChanges {
    pub fn apply_to(self, request: &mut MaintenanceRequest) {
        if let Some(title) = self.title {
            request.title = title;
        }
        if let Some(description) = self.description {
            request.description = description;
        }
        if let Some(priority) = self.priority {
            request.priority = priority;
        }
        if let Some(status) = self.status {
            request.status = status;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl RequestFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none() && self.priority.is_none()
    }

    /// Case-insensitive substring match on title or description, exact match on the enums.
    pub fn matches(&self, request: &MaintenanceRequest) -> bool {
        let matches_search = self.search.as_ref().map_or(true, |term| {
            let term = term.to_lowercase();
            request.title.to_lowercase().contains(&term)
                || request.description.to_lowercase().contains(&term)
        });
        let matches_status = self.status.map_or(true, |status| request.status == status);
        let matches_priority = self
            .priority
            .map_or(true, |priority| request.priority == priority);
        matches_search && matches_status && matches_priority
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub closed: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RequestStats {
    pub fn tally<'a>(requests: impl IntoIterator<Item = &'a MaintenanceRequest>) -> Self {
        let mut stats = RequestStats::default();
        for request in requests {
            stats.total += 1;
            match request.status {
                Status::Open => stats.open += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Completed => stats.completed += 1,
                Status::Closed => stats.closed += 1,
            }
            match request.priority {
                Priority::Critical => stats.critical += 1,
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, description: &str, priority: Priority, status: Status) -> MaintenanceRequest {
        let now = Utc::now();
        MaintenanceRequest {
            id: 1,
            title: title.to_string(),
            description: description.to_string(),
            priority,
            status,
            created_by: "Admin".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_uses_spaced_wire_name() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(Status::InProgress.to_string(), "In Progress");
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        assert_eq!("Urgent".parse::<Priority>(), Err(ValidationError::InvalidPriority));
        assert_eq!("critical".parse::<Priority>(), Err(ValidationError::InvalidPriority));
        assert_eq!("Pending".parse::<Status>(), Err(ValidationError::InvalidStatus));
    }

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let mut request = sample("Broken door", "The back door does not latch", Priority::Low, Status::Open);
        RequestChanges {
            status: Some(Status::Completed),
            ..Default::default()
        }
        .apply_to(&mut request);

        assert_eq!(request.status, Status::Completed);
        assert_eq!(request.title, "Broken door");
        assert_eq!(request.description, "The back door does not latch");
        assert_eq!(request.priority, Priority::Low);
    }

    #[test]
    fn test_filter_matches() {
        let request = sample("Water Leakage", "Ceiling drips in room 205", Priority::Critical, Status::Open);

        assert!(RequestFilter::default().matches(&request));
        assert!(RequestFilter { search: Some("LEAK".to_string()), ..Default::default() }.matches(&request));
        assert!(RequestFilter { search: Some("room 205".to_string()), ..Default::default() }.matches(&request));
        assert!(!RequestFilter { search: Some("hvac".to_string()), ..Default::default() }.matches(&request));
        assert!(!RequestFilter { status: Some(Status::Closed), ..Default::default() }.matches(&request));
        assert!(RequestFilter {
            status: Some(Status::Open),
            priority: Some(Priority::Critical),
            search: None,
        }
        .matches(&request));
    }

    #[test]
    fn test_stats_tally() {
        let requests = vec![
            sample("One", "first description", Priority::Critical, Status::Open),
            sample("Two", "second description", Priority::High, Status::InProgress),
            sample("Three", "third description", Priority::High, Status::Closed),
        ];
        let stats = RequestStats::tally(&requests);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.closed, 1);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.low, 0);
    }
}
