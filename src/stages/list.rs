use std::thread;
use crate::api::ApiError;
use crate::models::{Stage, StageDraft, StageId, StagePatch, ValidationError, ValidationRules};
use crate::repo::StageRepository;
use crate::stages::notice::{Notice, Notifier, Operation};
use crate::stages::reorder::{self, Direction};

const SUBJECT: &str = "stages";

/// Upper bound on order updates in flight at once
pub const MAX_ORDER_WORKERS: usize = 8;

/// How an operation on the stage list settled.
/// Failures have already been reported through the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The change was applied (and persisted, where applicable)
    Applied,
    /// Nothing to do: unknown id, boundary move, empty patch
    NoOp,
    /// Backend answered 404/401; reported as information
    Unavailable,
    /// Any other backend failure; reported as an error
    Failed,
    /// Blocked by client-side validation before any request
    Rejected(ValidationError),
    /// A reorder is still being persisted
    Busy,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed | Outcome::Rejected(_))
    }
}

/// Reorder that has been applied locally but not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReorder {
    pub stage_id: StageId,
    pub direction: Direction,
    /// New order value of every stage whose order changed
    pub updates: Vec<(StageId, u32)>,
}

/// Result of asking for a reorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStart {
    Started(PendingReorder),
    NoOp,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Persisting { rows: Vec<StageId> },
}

/// Ordered stages of one project, kept in sync with a `StageRepository`.
///
/// The list is the source of truth for rendering. It is sorted by `order`
/// after every load, and reorders keep the order values a dense `1..=N`
/// sequence.
///
/// Reordering is optimistic: `begin_move` applies the swap locally,
/// `persist_move` writes the new order values, and `settle_move` either
/// accepts the local state or reloads from the backend. While a reorder is
/// being persisted, further reorders are refused with `Busy`.
///
/// # Example
///
/// ```
/// use stagectl::repo::InMemoryRepo;
/// use stagectl::stages::{RecordingNotifier, StageList, Outcome};
///
/// let repo = InMemoryRepo::new();
/// let notifier = RecordingNotifier::new();
/// let mut list = StageList::new(&repo, &notifier, "p1").unwrap();
/// assert_eq!(list.load(), Outcome::Applied);
/// assert_eq!(list.next_order(), 1);
/// ```
pub struct StageList<R, N> {
    repo: R,
    notifier: N,
    project_id: String,
    stages: Vec<Stage>,
    loading: bool,
    phase: Phase,
    rules: ValidationRules,
}

impl<R: StageRepository, N: Notifier> StageList<R, N> {
    pub fn new(repo: R, notifier: N, project_id: impl Into<String>) -> Result<Self, ValidationError> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(ValidationError::EmptyProjectId);
        }
        Ok(Self {
            repo,
            notifier,
            project_id,
            stages: Vec::new(),
            loading: false,
            phase: Phase::Idle,
            rules: ValidationRules::default(),
        })
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Order value given to a stage created now
    pub fn next_order(&self) -> u32 {
        self.stages.len() as u32 + 1
    }

    /// Per-row busy flag: true while this stage's new order is being persisted
    pub fn is_row_busy(&self, id: &str) -> bool {
        match &self.phase {
            Phase::Idle => false,
            Phase::Persisting { rows } => rows.iter().any(|r| r == id),
        }
    }

    pub fn is_persisting(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Whether the move control for this stage should be enabled
    pub fn can_move(&self, id: &str, direction: Direction) -> bool {
        if self.is_persisting() {
            return false;
        }
        self.stages
            .iter()
            .position(|s| s.id == id)
            .and_then(|index| reorder::destination(index, self.stages.len(), direction))
            .is_some()
    }

    fn report(&self, operation: Operation, err: &ApiError) -> Outcome {
        if err.is_unavailable() {
            log::info!("{} {} for project {}: {}", operation.as_str(), SUBJECT, self.project_id, err);
            self.notifier.notify(Notice::unavailable(SUBJECT));
            Outcome::Unavailable
        } else {
            log::warn!("{} {} for project {} failed: {}", operation.as_str(), SUBJECT, self.project_id, err);
            self.notifier.notify(Notice::failed(operation, SUBJECT));
            Outcome::Failed
        }
    }

    /// Mark the list as loading and announce it through the notifier
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.notifier.loading(SUBJECT);
    }

    /// Fetch the project's stages without touching the list
    pub fn fetch(&self) -> Result<Vec<Stage>, ApiError> {
        self.repo.list_by_project(&self.project_id)
    }

    /// Replace the in-memory list with a fetch result and clear the loading flag.
    /// On any failure the list is left empty.
    pub fn finish_load(&mut self, result: Result<Vec<Stage>, ApiError>) -> Outcome {
        self.loading = false;

        match result {
            Ok(mut stages) => {
                reorder::sort_by_order(&mut stages);
                log::debug!("Loaded {} stages for project {}", stages.len(), self.project_id);
                self.stages = stages;
                Outcome::Applied
            }
            Err(err) => {
                self.stages.clear();
                self.report(Operation::Loading, &err)
            }
        }
    }

    /// Fetch the project's stages and replace the in-memory list
    pub fn load(&mut self) -> Outcome {
        self.begin_load();
        let result = self.fetch();
        self.finish_load(result)
    }

    /// Create a stage from a form draft and append the stored record
    pub fn create(&mut self, draft: &StageDraft) -> Outcome {
        if let Err(err) = draft.validate(&self.rules) {
            return Outcome::Rejected(err);
        }

        match self.repo.create(&self.project_id, draft) {
            Ok(stage) => {
                log::info!("Created stage {} ({}) at order {}", stage.id, stage.title, stage.order);
                self.notifier.notify(Notice::success(format!("Stage '{}' created", stage.title)));
                self.stages.push(stage);
                reorder::sort_by_order(&mut self.stages);
                Outcome::Applied
            }
            Err(err) => self.report(Operation::Saving, &err),
        }
    }

    /// Apply a partial update and replace the matching record
    pub fn update(&mut self, id: &str, patch: &StagePatch) -> Outcome {
        let Some(current) = self.get(id) else {
            return Outcome::NoOp;
        };
        if patch.is_empty() {
            return Outcome::NoOp;
        }
        if let Err(err) = patch.validate(current, &self.rules) {
            return Outcome::Rejected(err);
        }

        match self.repo.update(id, patch) {
            Ok(stage) => {
                log::info!("Updated stage {}", stage.id);
                self.notifier.notify(Notice::success(format!("Stage '{}' updated", stage.title)));
                if let Some(slot) = self.stages.iter_mut().find(|s| s.id == id) {
                    *slot = stage;
                }
                reorder::sort_by_order(&mut self.stages);
                Outcome::Applied
            }
            Err(err) => self.report(Operation::Saving, &err),
        }
    }

    /// Delete a stage, then reload to pick up server-side renumbering
    pub fn delete(&mut self, id: &str) -> Outcome {
        if self.get(id).is_none() {
            return Outcome::NoOp;
        }

        match self.repo.delete(id) {
            Ok(()) => {
                log::info!("Deleted stage {}", id);
                self.stages.retain(|s| s.id != id);
                self.notifier.notify(Notice::success("Stage deleted"));
                self.load();
                Outcome::Applied
            }
            Err(err) => self.report(Operation::Deleting, &err),
        }
    }

    /// Swap a stage with its neighbour and renumber, without persisting.
    pub fn begin_move(&mut self, id: &str, direction: Direction) -> MoveStart {
        if self.is_persisting() {
            log::debug!("Refusing to move stage {}: a reorder is in flight", id);
            return MoveStart::Busy;
        }

        let Some(updates) = reorder::move_adjacent(&mut self.stages, id, direction) else {
            return MoveStart::NoOp;
        };

        self.phase = Phase::Persisting {
            rows: updates.iter().map(|(id, _)| id.clone()).collect(),
        };
        MoveStart::Started(PendingReorder {
            stage_id: id.to_string(),
            direction,
            updates,
        })
    }

    /// Write the new order values concurrently, at most `MAX_ORDER_WORKERS`
    /// requests at a time. Succeeds only if every request succeeds.
    pub fn persist_move(&self, pending: &PendingReorder) -> Result<(), ApiError> {
        let repo = &self.repo;
        let mut first_error = None;
        for batch in pending.updates.chunks(MAX_ORDER_WORKERS) {
            let results = thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|(id, order)| {
                        thread::Builder::new()
                            .name(format!("order-{}", id))
                            .spawn_scoped(scope, move || repo.update(id, &StagePatch::order(*order)).map(|_| ()))
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| match handle {
                        Ok(handle) => handle
                            .join()
                            .unwrap_or_else(|_| Err(ApiError::Backend("order update worker panicked".to_string()))),
                        Err(err) => Err(ApiError::Backend(format!("cannot start order update worker: {}", err))),
                    })
                    .collect::<Vec<_>>()
            });

            for result in results {
                if let Err(err) = result {
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Accept the optimistic order, or reload from the backend when persisting failed
    pub fn settle_move(&mut self, pending: &PendingReorder, result: Result<(), ApiError>) -> Outcome {
        self.phase = Phase::Idle;

        match result {
            Ok(()) => {
                log::info!(
                    "Moved stage {} {} ({} order updates)",
                    pending.stage_id,
                    pending.direction.as_str(),
                    pending.updates.len()
                );
                self.notifier.notify(Notice::success("Stage order updated"));
                Outcome::Applied
            }
            Err(err) => {
                let outcome = self.report(Operation::Reordering, &err);
                log::warn!("Reloading stages for project {} after failed reorder", self.project_id);
                self.load();
                outcome
            }
        }
    }

    /// Move a stage one position earlier or later and persist the new order
    pub fn move_stage(&mut self, id: &str, direction: Direction) -> Outcome {
        match self.begin_move(id, direction) {
            MoveStart::NoOp => Outcome::NoOp,
            MoveStart::Busy => Outcome::Busy,
            MoveStart::Started(pending) => {
                let result = self.persist_move(&pending);
                self.settle_move(&pending, result)
            }
        }
    }
}
