//! Concurrent execution of the automation batch.

use crate::command::{Command, ExecutionBatch, TaskOutcome};
use crate::handler::{Handler, HandlerError, HandlerRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs automation commands concurrently against the handler registry.
///
/// Each command gets its own spawned task under a per-task timeout, so one
/// hung or panicking handler fails its own slot without stalling or
/// cancelling siblings.
pub struct Executor {
    registry: Arc<HandlerRegistry>,
    task_timeout: Duration,
}

enum Slot {
    Done(TaskOutcome),
    Running(JoinHandle<Result<(), HandlerError>>),
}

impl Executor {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    pub fn with_task_timeout(registry: Arc<HandlerRegistry>, task_timeout: Duration) -> Self {
        Self {
            registry,
            task_timeout,
        }
    }

    /// Execute every command concurrently and report outcomes aligned to
    /// input order.
    ///
    /// Partial failure is a normal outcome: a failing handler produces
    /// `Failure` for its own command only. An empty input returns an empty
    /// batch without spawning anything.
    pub async fn execute_all(&self, commands: Vec<Command>) -> ExecutionBatch {
        if commands.is_empty() {
            debug!("automation batch is empty, nothing to execute");
            return ExecutionBatch::empty();
        }

        info!(count = commands.len(), "executing automation batch");

        let mut slots: Vec<Slot> = Vec::with_capacity(commands.len());
        for command in &commands {
            if command.argument.is_empty() && command.kind.requires_argument() {
                debug!(kind = %command.kind, "skipping command without argument");
                slots.push(Slot::Done(TaskOutcome::Skipped));
                continue;
            }
            match self.registry.get(command.kind) {
                Some(handler) => {
                    slots.push(Slot::Running(self.spawn_handler(handler, command.clone())));
                }
                None => {
                    warn!(kind = %command.kind, "no handler registered");
                    slots.push(Slot::Done(TaskOutcome::Failure(
                        HandlerError::NotFound(command.kind).to_string(),
                    )));
                }
            }
        }

        // All join handles are already running; awaiting them in input order
        // gives index alignment for free while completion order stays
        // unconstrained.
        let mut outcomes = Vec::with_capacity(slots.len());
        for slot in slots {
            outcomes.push(match slot {
                Slot::Done(outcome) => outcome,
                Slot::Running(handle) => join_outcome(handle).await,
            });
        }

        ExecutionBatch { commands, outcomes }
    }

    fn spawn_handler(
        &self,
        handler: Arc<dyn Handler>,
        command: Command,
    ) -> JoinHandle<Result<(), HandlerError>> {
        let task_timeout = self.task_timeout;
        tokio::spawn(async move {
            match timeout(task_timeout, handler.run(&command.argument)).await {
                Ok(result) => result,
                Err(_) => Err(HandlerError::Execution(format!(
                    "timed out after {}s",
                    task_timeout.as_secs()
                ))),
            }
        })
    }
}

async fn join_outcome(handle: JoinHandle<Result<(), HandlerError>>) -> TaskOutcome {
    match handle.await {
        Ok(Ok(())) => TaskOutcome::Success,
        Ok(Err(e)) => TaskOutcome::Failure(e.to_string()),
        Err(join_err) if join_err.is_panic() => {
            TaskOutcome::Failure("handler panicked".to_string())
        }
        Err(_) => TaskOutcome::Failure("handler cancelled".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        kind: CommandKind,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Handler for CountingHandler {
        fn kind(&self) -> CommandKind {
            self.kind
        }
        fn description(&self) -> &str {
            "test handler"
        }
        async fn run(&self, argument: &str) -> Result<(), HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(HandlerError::Execution(format!("cannot handle {argument}")))
            } else {
                Ok(())
            }
        }
    }

    fn registry_with(handlers: Vec<CountingHandler>) -> Arc<HandlerRegistry> {
        let mut registry = HandlerRegistry::new();
        for handler in handlers {
            registry.register(Arc::new(handler));
        }
        Arc::new(registry)
    }

    #[tokio::test]
    async fn empty_batch_short_circuits_without_invoking_handlers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry_with(vec![CountingHandler {
            kind: CommandKind::OpenApp,
            calls: calls.clone(),
            fail: false,
        }]);

        let batch = Executor::new(registry).execute_all(Vec::new()).await;
        assert!(batch.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_failing_handler_fails_only_its_own_slot() {
        let open_calls = Arc::new(AtomicUsize::new(0));
        let close_calls = Arc::new(AtomicUsize::new(0));
        let registry = registry_with(vec![
            CountingHandler {
                kind: CommandKind::OpenApp,
                calls: open_calls.clone(),
                fail: false,
            },
            CountingHandler {
                kind: CommandKind::CloseApp,
                calls: close_calls.clone(),
                fail: true,
            },
        ]);

        let commands = vec![
            Command::new(CommandKind::OpenApp, "calculator"),
            Command::new(CommandKind::CloseApp, "notepad"),
            Command::new(CommandKind::OpenApp, "terminal"),
        ];
        let batch = Executor::new(registry).execute_all(commands).await;

        assert_eq!(batch.len(), 3);
        assert!(batch.outcomes[0].is_success());
        assert!(matches!(&batch.outcomes[1], TaskOutcome::Failure(reason) if reason.contains("notepad")));
        assert!(batch.outcomes[2].is_success());
        assert_eq!(open_calls.load(Ordering::SeqCst), 2);
        assert_eq!(close_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_handler_fails_without_any_io() {
        let registry = Arc::new(HandlerRegistry::new());
        let batch = Executor::new(registry)
            .execute_all(vec![Command::new(CommandKind::PlayMedia, "some song")])
            .await;

        assert_eq!(batch.len(), 1);
        assert!(
            matches!(&batch.outcomes[0], TaskOutcome::Failure(reason) if reason.contains("no handler"))
        );
    }

    #[tokio::test]
    async fn empty_argument_is_skipped_not_executed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = registry_with(vec![CountingHandler {
            kind: CommandKind::OpenApp,
            calls: calls.clone(),
            fail: false,
        }]);

        let batch = Executor::new(registry)
            .execute_all(vec![Command::new(CommandKind::OpenApp, "")])
            .await;

        assert_eq!(batch.outcomes, vec![TaskOutcome::Skipped]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_handler_times_out_without_stalling_siblings() {
        struct SlowHandler;

        #[async_trait]
        impl Handler for SlowHandler {
            fn kind(&self) -> CommandKind {
                CommandKind::PlayMedia
            }
            fn description(&self) -> &str {
                "sleeps forever"
            }
            async fn run(&self, _argument: &str) -> Result<(), HandlerError> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }

        struct QuickHandler;

        #[async_trait]
        impl Handler for QuickHandler {
            fn kind(&self) -> CommandKind {
                CommandKind::OpenApp
            }
            fn description(&self) -> &str {
                "returns immediately"
            }
            async fn run(&self, _argument: &str) -> Result<(), HandlerError> {
                Ok(())
            }
        }

        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(SlowHandler));
        registry.register(Arc::new(QuickHandler));

        let executor =
            Executor::with_task_timeout(Arc::new(registry), Duration::from_millis(50));
        let batch = executor
            .execute_all(vec![
                Command::new(CommandKind::PlayMedia, "song"),
                Command::new(CommandKind::OpenApp, "calculator"),
            ])
            .await;

        assert!(
            matches!(&batch.outcomes[0], TaskOutcome::Failure(reason) if reason.contains("timed out"))
        );
        assert!(batch.outcomes[1].is_success());
    }

    #[tokio::test]
    async fn panicking_handler_is_isolated() {
        struct PanickingHandler;

        #[async_trait]
        impl Handler for PanickingHandler {
            fn kind(&self) -> CommandKind {
                CommandKind::WebSearch
            }
            fn description(&self) -> &str {
                "always panics"
            }
            async fn run(&self, _argument: &str) -> Result<(), HandlerError> {
                panic!("boom");
            }
        }

        struct OkHandler;

        #[async_trait]
        impl Handler for OkHandler {
            fn kind(&self) -> CommandKind {
                CommandKind::OpenApp
            }
            fn description(&self) -> &str {
                "fine"
            }
            async fn run(&self, _argument: &str) -> Result<(), HandlerError> {
                Ok(())
            }
        }

        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(PanickingHandler));
        registry.register(Arc::new(OkHandler));

        let batch = Executor::new(Arc::new(registry))
            .execute_all(vec![
                Command::new(CommandKind::WebSearch, "anything"),
                Command::new(CommandKind::OpenApp, "calculator"),
            ])
            .await;

        assert!(
            matches!(&batch.outcomes[0], TaskOutcome::Failure(reason) if reason.contains("panicked"))
        );
        assert!(batch.outcomes[1].is_success());
    }
}
