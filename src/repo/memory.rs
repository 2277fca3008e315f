use std::sync::{Mutex, MutexGuard};
use crate::api::ApiError;
use crate::models::{ReferenceItem, Stage, StageDraft, StagePatch};
use crate::repo::{ReferenceRepository, StageRepository};

/// Call made against an `InMemoryRepo`, recorded in order of arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    List(String),
    Create(String),
    Update(String, StagePatch),
    Delete(String),
}

#[derive(Default)]
struct State {
    stages: Vec<(String, Stage)>,
    statuses: Vec<ReferenceItem>,
    stage_types: Vec<ReferenceItem>,
    next_id: u64,
    calls: Vec<RepoCall>,
}

/// In-process backend with the same observable behavior as the REST service:
/// unknown ids answer "not found", and deleting a stage renumbers the
/// remaining stages of its project.
///
/// # Example
///
/// ```
/// use stagectl::repo::{InMemoryRepo, StageRepository};
///
/// let repo = InMemoryRepo::new();
/// assert!(repo.list_by_project("p1").unwrap().is_empty());
/// ```
#[derive(Default)]
pub struct InMemoryRepo {
    state: Mutex<State>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Store stages for a project as-is (ids and order values untouched)
    pub fn seed(&self, project_id: &str, stages: Vec<Stage>) {
        let mut state = self.lock();
        state
            .stages
            .extend(stages.into_iter().map(|s| (project_id.to_string(), s)));
    }

    pub fn set_reference_data(&self, statuses: Vec<ReferenceItem>, stage_types: Vec<ReferenceItem>) {
        let mut state = self.lock();
        state.statuses = statuses;
        state.stage_types = stage_types;
    }

    /// Stored stages of a project, sorted by order
    pub fn stored(&self, project_id: &str) -> Vec<Stage> {
        let state = self.lock();
        let mut stages: Vec<Stage> = state
            .stages
            .iter()
            .filter(|(p, _)| p == project_id)
            .map(|(_, s)| s.clone())
            .collect();
        stages.sort_by_key(|s| s.order);
        stages
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn renumber_project(state: &mut State, project_id: &str) {
        let mut members: Vec<&mut Stage> = state
            .stages
            .iter_mut()
            .filter(|(p, _)| p == project_id)
            .map(|(_, s)| s)
            .collect();
        members.sort_by_key(|s| s.order);
        for (index, stage) in members.into_iter().enumerate() {
            stage.order = index as u32 + 1;
        }
    }
}

impl StageRepository for InMemoryRepo {
    fn list_by_project(&self, project_id: &str) -> Result<Vec<Stage>, ApiError> {
        self.lock().calls.push(RepoCall::List(project_id.to_string()));
        Ok(self.stored(project_id))
    }

    fn create(&self, project_id: &str, draft: &StageDraft) -> Result<Stage, ApiError> {
        let mut state = self.lock();
        state.calls.push(RepoCall::Create(project_id.to_string()));
        state.next_id += 1;
        let stage = Stage {
            id: format!("mem-{}", state.next_id),
            order: draft.order,
            title: draft.title.clone(),
            description: draft.description.clone(),
            progress_percent: draft.progress_percent,
            priority: draft.priority,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status_id: draft.status_id.clone(),
            stage_type_id: draft.stage_type_id.clone(),
        };
        state.stages.push((project_id.to_string(), stage.clone()));
        Ok(stage)
    }

    fn update(&self, id: &str, patch: &StagePatch) -> Result<Stage, ApiError> {
        let mut state = self.lock();
        state.calls.push(RepoCall::Update(id.to_string(), patch.clone()));
        let (_, stage) = state
            .stages
            .iter_mut()
            .find(|(_, s)| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("/etapes-projet/{}", id)))?;
        patch.apply_to(stage);
        Ok(stage.clone())
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.calls.push(RepoCall::Delete(id.to_string()));
        let position = state
            .stages
            .iter()
            .position(|(_, s)| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("/etapes-projet/{}", id)))?;
        let (project_id, _) = state.stages.remove(position);
        Self::renumber_project(&mut state, &project_id);
        Ok(())
    }
}

impl ReferenceRepository for InMemoryRepo {
    fn stage_statuses(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        Ok(self.lock().statuses.clone())
    }

    fn stage_types(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        Ok(self.lock().stage_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: &str, order: u32) -> Stage {
        Stage {
            id: id.to_string(),
            order,
            title: id.to_uppercase(),
            description: String::new(),
            progress_percent: 0,
            priority: Default::default(),
            start_date: None,
            end_date: None,
            status_id: "1".to_string(),
            stage_type_id: "1".to_string(),
        }
    }

    #[test]
    fn test_delete_renumbers_project() {
        let repo = InMemoryRepo::new();
        repo.seed("p", vec![stage("a", 1), stage("b", 2), stage("c", 3)]);
        repo.seed("q", vec![stage("z", 7)]);

        repo.delete("a").unwrap();

        let orders: Vec<(String, u32)> = repo.stored("p").into_iter().map(|s| (s.id, s.order)).collect();
        assert_eq!(orders, vec![("b".to_string(), 1), ("c".to_string(), 2)]);
        assert_eq!(repo.stored("q")[0].order, 7);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let repo = InMemoryRepo::new();
        assert!(repo.update("nope", &StagePatch::order(1)).unwrap_err().is_unavailable());
        assert!(repo.delete("nope").unwrap_err().is_unavailable());
    }
}
