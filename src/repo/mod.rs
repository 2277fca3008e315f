//! Backend access traits.
//!
//! `StageList` and `ReferenceData` only talk to these traits, so the HTTP
//! client can be swapped for `InMemoryRepo` (or any test double) at
//! construction time.

pub mod memory;

pub use memory::*;

use crate::api::ApiError;
use crate::models::{ReferenceItem, Stage, StageDraft, StagePatch};

/// Stage persistence. Implementations must be shareable across threads:
/// reorder updates are issued concurrently.
pub trait StageRepository: Send + Sync {
    /// Fetch every stage of a project, in no particular order
    fn list_by_project(&self, project_id: &str) -> Result<Vec<Stage>, ApiError>;

    /// Create a stage and return the stored record
    fn create(&self, project_id: &str, draft: &StageDraft) -> Result<Stage, ApiError>;

    /// Apply a partial update and return the stored record
    fn update(&self, id: &str, patch: &StagePatch) -> Result<Stage, ApiError>;

    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Read-only enumerations used for display
pub trait ReferenceRepository {
    fn stage_statuses(&self) -> Result<Vec<ReferenceItem>, ApiError>;
    fn stage_types(&self) -> Result<Vec<ReferenceItem>, ApiError>;
}

impl<T: StageRepository + ?Sized> StageRepository for &T {
    fn list_by_project(&self, project_id: &str) -> Result<Vec<Stage>, ApiError> {
        (**self).list_by_project(project_id)
    }

    fn create(&self, project_id: &str, draft: &StageDraft) -> Result<Stage, ApiError> {
        (**self).create(project_id, draft)
    }

    fn update(&self, id: &str, patch: &StagePatch) -> Result<Stage, ApiError> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id)
    }
}

impl<T: ReferenceRepository + ?Sized> ReferenceRepository for &T {
    fn stage_statuses(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        (**self).stage_statuses()
    }

    fn stage_types(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        (**self).stage_types()
    }
}
