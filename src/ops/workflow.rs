use crate::model::TaskStatus;

/// Error type for the status update workflow
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("no task selected for status update")]
    MissingTask,
    #[error("no status selected for update")]
    MissingStatus,
    #[error("status {0:?} cannot be assigned")]
    InvalidStatus(String),
    #[error("an update is already in flight")]
    InFlight,
}

/// Where the workflow currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    TaskSelected {
        task_id: i64,
    },
    StatusChosen {
        task_id: i64,
        status: TaskStatus,
    },
    Submitting {
        task_id: i64,
        status: TaskStatus,
    },
}

/// The update request handed to the caller when `submit` fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub task_id: i64,
    pub new_status: TaskStatus,
}

/// The select-task → choose-status → submit → refresh state machine.
///
/// Owns no I/O: `submit` returns the request descriptor and the caller
/// performs the network call, reporting back via `submit_succeeded` /
/// `submit_failed`. Every rejected operation leaves the state untouched.
#[derive(Debug, Default)]
pub struct UpdateWorkflow {
    state: WorkflowState,
}

impl UpdateWorkflow {
    pub fn new() -> Self {
        UpdateWorkflow::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn selected_task(&self) -> Option<i64> {
        match self.state {
            WorkflowState::Idle => None,
            WorkflowState::TaskSelected { task_id }
            | WorkflowState::StatusChosen { task_id, .. }
            | WorkflowState::Submitting { task_id, .. } => Some(task_id),
        }
    }

    pub fn chosen_status(&self) -> Option<&TaskStatus> {
        match &self.state {
            WorkflowState::StatusChosen { status, .. }
            | WorkflowState::Submitting { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, WorkflowState::Submitting { .. })
    }

    /// Select a task for viewing/updating. Ignored while a submit is in
    /// flight; otherwise any previous selection is replaced.
    pub fn select_task(&mut self, task_id: i64) {
        if self.is_submitting() {
            return;
        }
        self.state = WorkflowState::TaskSelected { task_id };
    }

    /// Choose the target status. Valid from `TaskSelected` or
    /// `StatusChosen`; only assignable statuses are accepted.
    pub fn choose_status(&mut self, status: TaskStatus) -> Result<(), WorkflowError> {
        if !status.is_assignable() {
            return Err(WorkflowError::InvalidStatus(status.as_str().to_string()));
        }
        match &self.state {
            WorkflowState::TaskSelected { task_id }
            | WorkflowState::StatusChosen { task_id, .. } => {
                self.state = WorkflowState::StatusChosen {
                    task_id: *task_id,
                    status,
                };
                Ok(())
            }
            WorkflowState::Idle => Err(WorkflowError::MissingTask),
            WorkflowState::Submitting { .. } => Err(WorkflowError::InFlight),
        }
    }

    /// Fire the update. Both preconditions are checked locally before any
    /// network call; a submit while one is already outstanding is rejected
    /// so no duplicate request can be issued.
    pub fn submit(&mut self) -> Result<StatusUpdate, WorkflowError> {
        match &self.state {
            WorkflowState::StatusChosen { task_id, status } => {
                let update = StatusUpdate {
                    task_id: *task_id,
                    new_status: status.clone(),
                };
                self.state = WorkflowState::Submitting {
                    task_id: *task_id,
                    status: status.clone(),
                };
                Ok(update)
            }
            WorkflowState::Idle => Err(WorkflowError::MissingTask),
            WorkflowState::TaskSelected { .. } => Err(WorkflowError::MissingStatus),
            WorkflowState::Submitting { .. } => Err(WorkflowError::InFlight),
        }
    }

    /// The backend acknowledged the update. The caller now re-reads the
    /// tasks collection (server truth, never the local guess) and closes
    /// the detail view.
    pub fn submit_succeeded(&mut self) {
        if self.is_submitting() {
            self.state = WorkflowState::Idle;
        }
    }

    /// The update failed. Selection and chosen status survive so the user
    /// can retry without re-selecting; the cache is untouched.
    pub fn submit_failed(&mut self) {
        if let WorkflowState::Submitting { task_id, status } = &self.state {
            self.state = WorkflowState::StatusChosen {
                task_id: *task_id,
                status: status.clone(),
            };
        }
    }

    /// Close the detail view without submitting: the pending selection is
    /// discarded with no side effects. A cancel that races an in-flight
    /// submit leaves the late acknowledgement nowhere to land (the
    /// completion hooks only act while `Submitting`).
    pub fn cancel(&mut self) {
        self.state = WorkflowState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chosen() -> UpdateWorkflow {
        let mut wf = UpdateWorkflow::new();
        wf.select_task(7);
        wf.choose_status(TaskStatus::Done).unwrap();
        wf
    }

    #[test]
    fn test_happy_path() {
        let mut wf = UpdateWorkflow::new();
        assert_eq!(*wf.state(), WorkflowState::Idle);

        wf.select_task(7);
        assert_eq!(wf.selected_task(), Some(7));

        wf.choose_status(TaskStatus::Done).unwrap();
        let update = wf.submit().unwrap();
        assert_eq!(update.task_id, 7);
        assert_eq!(update.new_status, TaskStatus::Done);
        assert!(wf.is_submitting());

        wf.submit_succeeded();
        assert_eq!(*wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_submit_without_selection_is_local_error() {
        let mut wf = UpdateWorkflow::new();
        assert_eq!(wf.submit(), Err(WorkflowError::MissingTask));
        assert_eq!(*wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_submit_without_status_is_local_error() {
        let mut wf = UpdateWorkflow::new();
        wf.select_task(3);
        assert_eq!(wf.submit(), Err(WorkflowError::MissingStatus));
        // Selection survives the failed precondition
        assert_eq!(wf.selected_task(), Some(3));
    }

    #[test]
    fn test_choose_status_requires_selection() {
        let mut wf = UpdateWorkflow::new();
        assert_eq!(
            wf.choose_status(TaskStatus::Done),
            Err(WorkflowError::MissingTask)
        );
    }

    #[test]
    fn test_non_assignable_status_rejected_without_state_change() {
        let mut wf = UpdateWorkflow::new();
        wf.select_task(7);
        let err = wf.choose_status(TaskStatus::Other("On Hold".into()));
        assert_eq!(err, Err(WorkflowError::InvalidStatus("On Hold".into())));
        assert_eq!(*wf.state(), WorkflowState::TaskSelected { task_id: 7 });
    }

    #[test]
    fn test_status_can_be_re_chosen() {
        let mut wf = chosen();
        wf.choose_status(TaskStatus::InProgress).unwrap();
        assert_eq!(wf.chosen_status(), Some(&TaskStatus::InProgress));
    }

    #[test]
    fn test_reentrant_submit_is_rejected() {
        let mut wf = chosen();
        wf.submit().unwrap();
        // A second submit while the first is outstanding must not produce
        // another request.
        assert_eq!(wf.submit(), Err(WorkflowError::InFlight));
        assert!(wf.is_submitting());
    }

    #[test]
    fn test_failure_returns_to_status_chosen_for_retry() {
        let mut wf = chosen();
        wf.submit().unwrap();
        wf.submit_failed();
        assert_eq!(
            *wf.state(),
            WorkflowState::StatusChosen {
                task_id: 7,
                status: TaskStatus::Done
            }
        );
        // Retry works without re-selecting anything
        assert!(wf.submit().is_ok());
    }

    #[test]
    fn test_cancel_discards_selection() {
        let mut wf = chosen();
        wf.cancel();
        assert_eq!(*wf.state(), WorkflowState::Idle);
        assert_eq!(wf.selected_task(), None);
    }

    #[test]
    fn test_late_ack_after_cancel_is_inert() {
        let mut wf = chosen();
        wf.submit().unwrap();
        wf.cancel();
        wf.submit_succeeded();
        wf.submit_failed();
        assert_eq!(*wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_select_ignored_while_submitting() {
        let mut wf = chosen();
        wf.submit().unwrap();
        wf.select_task(99);
        assert_eq!(wf.selected_task(), Some(7));
    }
}
