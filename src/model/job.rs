//! Job lifecycle types shared by the supervisor, consumer and orchestrator

/// Exit classification reported by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Success,
    Failure,
}

/// One message on the process event channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// The process was spawned
    Started,
    /// A chunk of standard output
    Stdout { content: String, overwrite: bool },
    /// A chunk of standard error
    Stderr { content: String, overwrite: bool },
    /// The process exited
    Completed { status: CompletionStatus },
    /// The supervisor gave up on the process
    Error { message: String },
}

impl JobEvent {
    /// Outcome carried by this event, if it ends the job
    pub fn outcome(&self) -> Option<JobOutcome> {
        match self {
            JobEvent::Completed {
                status: CompletionStatus::Success,
            } => Some(JobOutcome::Success),
            JobEvent::Completed {
                status: CompletionStatus::Failure,
            }
            | JobEvent::Error { .. } => Some(JobOutcome::Failure),
            _ => None,
        }
    }
}

/// Final result of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failure,
}

impl JobOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Success => "Completed",
            JobOutcome::Failure => "Failed",
        }
    }
}

/// Where the orchestrator is in the job lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    /// Start requested, waiting for confirmation
    Confirming { acknowledged: bool },
    Running,
    Terminal(JobOutcome),
}

impl JobPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, JobPhase::Running)
    }

    /// True once the job has started, whether or not it has finished
    pub fn shows_log(&self) -> bool {
        matches!(self, JobPhase::Running | JobPhase::Terminal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_terminal_events_carry_outcome() {
        assert_eq!(JobEvent::Started.outcome(), None);
        assert_eq!(
            JobEvent::Stdout {
                content: "x".to_string(),
                overwrite: false
            }
            .outcome(),
            None
        );
        assert_eq!(
            JobEvent::Completed {
                status: CompletionStatus::Success
            }
            .outcome(),
            Some(JobOutcome::Success)
        );
        assert_eq!(
            JobEvent::Error {
                message: "boom".to_string()
            }
            .outcome(),
            Some(JobOutcome::Failure)
        );
    }

    #[test]
    fn test_phase_helpers() {
        assert!(!JobPhase::Idle.shows_log());
        assert!(!JobPhase::Confirming { acknowledged: true }.shows_log());
        assert!(JobPhase::Running.is_running());
        assert!(JobPhase::Terminal(JobOutcome::Failure).shows_log());
        assert!(!JobPhase::Terminal(JobOutcome::Success).is_running());
    }
}
