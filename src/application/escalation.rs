//! Failure escalation: suspend the pipeline on a VCS failure and let an
//! operator decide whether to resume or abort.
//!
//! This is the only recovery mechanism. There is no automatic retry and no
//! rollback of partially applied operations; resuming assumes the operator
//! has manually fixed the underlying condition.

use async_trait::async_trait;
use std::path::Path;

use crate::common::error::MergeError;
use crate::common::result::MergeResult;
use crate::infrastructure::vcs::gateway::VcsError;

/// Operator decision after a recovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryDecision {
    /// Continue the pipeline at the step after the failed one.
    Resume,
    /// Terminate the run immediately, leaving partial workspaces in place.
    Abort,
}

/// Hook invoked whenever a VCS gateway operation fails.
///
/// `working_dir` is the repository the failed operation ran in, so an
/// interactive implementation can drop the operator there.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FailureHandler: Send + Sync {
    /// Hand control to the operator; blocks until a decision is made.
    async fn on_failure(&self, error: &VcsError, working_dir: &Path) -> RecoveryDecision;
}

/// Non-interactive handler that always aborts. Used when no terminal is
/// attached (a recovery shell would hang) and as the deterministic handler
/// in tests.
pub struct AbortingHandler;

#[async_trait]
impl FailureHandler for AbortingHandler {
    async fn on_failure(&self, error: &VcsError, working_dir: &Path) -> RecoveryDecision {
        tracing::error!(
            error = %error,
            directory = %working_dir.display(),
            "VCS operation failed and no operator is attached; aborting"
        );
        RecoveryDecision::Abort
    }
}

/// Route a gateway result through the failure handler.
///
/// On success the value passes through. On failure the handler is consulted:
/// `Abort` turns into [`MergeError::Aborted`], `Resume` yields the type's
/// default value (an empty result) and execution continues after the failed
/// step.
pub async fn recover<T: Default>(
    handler: &dyn FailureHandler,
    working_dir: &Path,
    result: Result<T, VcsError>,
) -> MergeResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(error) => match handler.on_failure(&error, working_dir).await {
            RecoveryDecision::Resume => {
                tracing::warn!(error = %error, "resuming after operator recovery");
                Ok(T::default())
            }
            RecoveryDecision::Abort => Err(MergeError::Aborted),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn failed() -> Result<Vec<String>, VcsError> {
        Err(VcsError::CommandFailed {
            command: "git merge".to_string(),
            exit_code: 1,
            stderr: "CONFLICT".to_string(),
        })
    }

    #[tokio::test]
    async fn success_bypasses_the_handler() {
        let mut handler = MockFailureHandler::new();
        handler.expect_on_failure().never();

        let result = recover(&handler, Path::new("."), Ok(42u32)).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn abort_decision_stops_the_run() {
        let mut handler = MockFailureHandler::new();
        handler
            .expect_on_failure()
            .times(1)
            .returning(|_, _| RecoveryDecision::Abort);

        let result = recover(&handler, Path::new("."), failed()).await;
        assert!(matches!(result, Err(MergeError::Aborted)));
    }

    #[tokio::test]
    async fn resume_decision_yields_an_empty_result() {
        let mut handler = MockFailureHandler::new();
        handler
            .expect_on_failure()
            .times(1)
            .returning(|_, _| RecoveryDecision::Resume);

        let result = recover(&handler, Path::new("."), failed()).await;
        assert_eq!(result.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn handler_receives_the_failing_directory() {
        let mut handler = MockFailureHandler::new();
        handler
            .expect_on_failure()
            .withf(|_, dir| dir == PathBuf::from("/work/libA"))
            .times(1)
            .returning(|_, _| RecoveryDecision::Abort);

        let _ = recover(&handler, Path::new("/work/libA"), failed()).await;
    }

    #[tokio::test]
    async fn aborting_handler_always_aborts() {
        let decision = AbortingHandler
            .on_failure(
                &VcsError::ExecutableNotFound {
                    executable: "git".to_string(),
                },
                Path::new("."),
            )
            .await;
        assert_eq!(decision, RecoveryDecision::Abort);
    }
}
