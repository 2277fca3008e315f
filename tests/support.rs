// Shared fixtures for stage list tests
#![allow(dead_code)]

use std::sync::Mutex;
use stagectl::api::ApiError;
use stagectl::models::{Priority, Stage, StageDraft, StagePatch};
use stagectl::repo::{InMemoryRepo, StageRepository};

pub const PROJECT: &str = "p1";

pub fn stage(id: &str, order: u32) -> Stage {
    Stage {
        id: id.to_string(),
        order,
        title: format!("Stage {}", id),
        description: String::new(),
        progress_percent: 0,
        priority: Priority::Medium,
        start_date: None,
        end_date: None,
        status_id: "1".to_string(),
        stage_type_id: "1".to_string(),
    }
}

pub fn draft(title: &str) -> StageDraft {
    StageDraft {
        title: title.to_string(),
        status_id: "1".to_string(),
        stage_type_id: "2".to_string(),
        ..StageDraft::at_order(1)
    }
}

/// Seeded backend holding stages a, b, c in that order
pub fn abc_repo() -> InMemoryRepo {
    let repo = InMemoryRepo::new();
    repo.seed(PROJECT, vec![stage("a", 1), stage("b", 2), stage("c", 3)]);
    repo
}

pub fn order_of(stages: &[Stage]) -> Vec<(String, u32)> {
    stages.iter().map(|s| (s.id.clone(), s.order)).collect()
}

/// Wraps an `InMemoryRepo` and fails selected calls
#[derive(Default)]
pub struct FlakyRepo {
    pub inner: InMemoryRepo,
    fail_list: Mutex<Option<u16>>,
    fail_create: Mutex<Option<u16>>,
    fail_delete: Mutex<Option<u16>>,
    fail_updates: Mutex<Vec<String>>,
    update_status: Mutex<Option<u16>>,
}

impl FlakyRepo {
    pub fn new(inner: InMemoryRepo) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_list_with(&self, status: Option<u16>) {
        *self.fail_list.lock().unwrap() = status;
    }

    pub fn fail_create_with(&self, status: Option<u16>) {
        *self.fail_create.lock().unwrap() = status;
    }

    pub fn fail_delete_with(&self, status: Option<u16>) {
        *self.fail_delete.lock().unwrap() = status;
    }

    /// Updates of these stage ids answer HTTP 500
    pub fn fail_updates_for(&self, ids: &[&str]) {
        self.fail_updates_with(ids, 500);
    }

    pub fn fail_updates_with(&self, ids: &[&str], status: u16) {
        *self.fail_updates.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
        *self.update_status.lock().unwrap() = Some(status);
    }
}

fn error(status: u16) -> ApiError {
    ApiError::from_status(status, "/test", "injected failure")
}

impl StageRepository for FlakyRepo {
    fn list_by_project(&self, project_id: &str) -> Result<Vec<Stage>, ApiError> {
        if let Some(status) = *self.fail_list.lock().unwrap() {
            return Err(error(status));
        }
        self.inner.list_by_project(project_id)
    }

    fn create(&self, project_id: &str, draft: &StageDraft) -> Result<Stage, ApiError> {
        if let Some(status) = *self.fail_create.lock().unwrap() {
            return Err(error(status));
        }
        self.inner.create(project_id, draft)
    }

    fn update(&self, id: &str, patch: &StagePatch) -> Result<Stage, ApiError> {
        if self.fail_updates.lock().unwrap().iter().any(|f| f == id) {
            return Err(error(self.update_status.lock().unwrap().unwrap_or(500)));
        }
        self.inner.update(id, patch)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        if let Some(status) = *self.fail_delete.lock().unwrap() {
            return Err(error(status));
        }
        self.inner.delete(id)
    }
}
