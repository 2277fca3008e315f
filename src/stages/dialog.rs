use crate::models::{Priority, Stage, StageDraft, StagePatch, ValidationRules};
use crate::repo::StageRepository;
use crate::stages::list::{Outcome, StageList};
use crate::stages::notice::Notifier;

/// The single record dialog of the stage screen.
///
/// Exactly one dialog can be open at a time; opening another replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    Creating(StageDraft),
    Editing { original: Stage, patch: StagePatch },
    Deleting(Stage),
    Viewing(Stage),
}

impl Dialog {
    /// Open the create form, positioned after the last stage
    pub fn open_create<R: StageRepository, N: Notifier>(&mut self, list: &StageList<R, N>) {
        *self = Dialog::Creating(StageDraft {
            priority: Priority::Medium,
            progress_percent: 0,
            ..StageDraft::at_order(list.next_order())
        });
    }

    pub fn open_edit(&mut self, stage: Stage) {
        *self = Dialog::Editing {
            original: stage,
            patch: StagePatch::default(),
        };
    }

    pub fn open_delete(&mut self, stage: Stage) {
        *self = Dialog::Deleting(stage);
    }

    pub fn open_view(&mut self, stage: Stage) {
        *self = Dialog::Viewing(stage);
    }

    pub fn close(&mut self) {
        *self = Dialog::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Closed)
    }

    pub fn draft_mut(&mut self) -> Option<&mut StageDraft> {
        match self {
            Dialog::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn patch_mut(&mut self) -> Option<&mut StagePatch> {
        match self {
            Dialog::Editing { patch, .. } => Some(patch),
            _ => None,
        }
    }

    /// Whether the submit action is enabled
    pub fn can_submit(&self, rules: &ValidationRules) -> bool {
        match self {
            Dialog::Closed | Dialog::Viewing(_) => false,
            Dialog::Creating(draft) => draft.validate(rules).is_ok(),
            Dialog::Editing { original, patch } => {
                !patch.is_empty() && patch.validate(original, rules).is_ok()
            }
            Dialog::Deleting(_) => true,
        }
    }

    /// Submit the open dialog. It closes once the change is applied and
    /// stays open (keeping the user's input) otherwise.
    pub fn submit<R: StageRepository, N: Notifier>(&mut self, list: &mut StageList<R, N>) -> Outcome {
        let outcome = match self {
            Dialog::Closed => return Outcome::NoOp,
            Dialog::Viewing(_) => {
                self.close();
                return Outcome::NoOp;
            }
            Dialog::Creating(draft) => list.create(draft),
            Dialog::Editing { original, patch } => list.update(&original.id, patch),
            Dialog::Deleting(stage) => list.delete(&stage.id),
        };

        if matches!(outcome, Outcome::Applied | Outcome::NoOp) {
            self.close();
        }
        outcome
    }
}
