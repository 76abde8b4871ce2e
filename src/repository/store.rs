use chrono::prelude::*;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::error::StoreError;
use crate::models::request::{
    MaintenanceRequest, NewRequest, Priority, RequestChanges, RequestFilter, RequestStats, Status,
};

const DEFAULT_CREATOR: &str = "Admin";

struct StoreState {
    requests: Vec<MaintenanceRequest>,
    next_id: u64,
}

/// In-memory request collection. The id counter lives under the same lock as
/// the records so ids stay unique across concurrent workers.
pub struct RequestStore {
    state: Mutex<StoreState>,
}

impl RequestStore {
    pub fn new() -> Self {
        RequestStore {
            state: Mutex::new(StoreState {
                requests: vec![],
                next_id: 1,
            }),
        }
    }

    /// Store preloaded with the two sample tickets the dashboard ships with.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let samples = [
            (
                "Water Leakage in Room 205",
                "There is water leaking from the ceiling in room 205. Needs immediate attention.",
                Priority::Critical,
                Status::Open,
            ),
            (
                "HVAC System Maintenance",
                "Annual HVAC system maintenance and filter replacement needed.",
                Priority::High,
                Status::InProgress,
            ),
        ];
        if let Ok(mut state) = store.state.lock() {
            for (title, description, priority, status) in samples {
                let now = Utc::now();
                let id = state.next_id;
                state.next_id += 1;
                state.requests.push(MaintenanceRequest {
                    id,
                    title: title.to_string(),
                    description: description.to_string(),
                    priority,
                    status,
                    created_by: DEFAULT_CREATOR.to_string(),
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }

    pub fn list(&self) -> Result<Vec<MaintenanceRequest>, StoreError> {
        let state = self.lock()?;
        Ok(state.requests.clone())
    }

    pub fn search(&self, filter: &RequestFilter) -> Result<Vec<MaintenanceRequest>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .requests
            .iter()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect())
    }

    pub fn get(&self, id: u64) -> Result<Option<MaintenanceRequest>, StoreError> {
        let state = self.lock()?;
        Ok(state.requests.iter().find(|request| request.id == id).cloned())
    }

    pub fn create(&self, new_request: NewRequest) -> Result<MaintenanceRequest, StoreError> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;
        let now = Utc::now();
        let request = MaintenanceRequest {
            id,
            title: new_request.title,
            description: new_request.description,
            priority: new_request.priority,
            status: Status::Open,
            created_by: new_request
                .created_by
                .unwrap_or_else(|| DEFAULT_CREATOR.to_string()),
            created_at: now,
            updated_at: now,
        };
        state.requests.push(request.clone());
        info!(id, priority = %request.priority, "created maintenance request");
        Ok(request)
    }

    pub fn update(
        &self,
        id: u64,
        changes: RequestChanges,
    ) -> Result<Option<MaintenanceRequest>, StoreError> {
        let mut state = self.lock()?;
        let Some(request) = state.requests.iter_mut().find(|request| request.id == id) else {
            return Ok(None);
        };
        changes.apply_to(request);
        request.updated_at = Utc::now();
        info!(id, status = %request.status, "updated maintenance request");
        Ok(Some(request.clone()))
    }

    pub fn delete(&self, id: u64) -> Result<Option<MaintenanceRequest>, StoreError> {
        let mut state = self.lock()?;
        let Some(index) = state.requests.iter().position(|request| request.id == id) else {
            return Ok(None);
        };
        let removed = state.requests.remove(index);
        info!(id, "deleted maintenance request");
        Ok(Some(removed))
    }

    pub fn stats(&self) -> Result<RequestStats, StoreError> {
        let state = self.lock()?;
        Ok(RequestStats::tally(&state.requests))
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.requests.len())
    }
}
