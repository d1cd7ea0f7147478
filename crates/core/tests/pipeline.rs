#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use valet_core::*;

    // Mock handler recording invocations, failing on demand.
    struct MockHandler {
        kind: CommandKind,
        calls: Arc<AtomicUsize>,
        fail_with: Option<String>,
    }

    impl MockHandler {
        fn ok(kind: CommandKind, calls: &Arc<AtomicUsize>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                calls: calls.clone(),
                fail_with: None,
            })
        }

        fn failing(kind: CommandKind, calls: &Arc<AtomicUsize>, reason: &str) -> Arc<Self> {
            Arc::new(Self {
                kind,
                calls: calls.clone(),
                fail_with: Some(reason.to_string()),
            })
        }
    }

    #[async_trait]
    impl Handler for MockHandler {
        fn kind(&self) -> CommandKind {
            self.kind
        }
        fn description(&self) -> &str {
            "mock handler"
        }
        async fn run(&self, _argument: &str) -> Result<(), HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(reason) => Err(HandlerError::Execution(reason.clone())),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_automation_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        registry.register(MockHandler::ok(CommandKind::OpenApp, &calls));
        registry.register(MockHandler::ok(CommandKind::PlayMedia, &calls));
        registry.register(MockHandler::ok(CommandKind::RunSystemCommand, &calls));

        let commands = parse("open calculator, play relaxing music, system volume up");
        assert_eq!(commands.len(), 3);

        let plan = dispatch(commands);
        assert_eq!(plan.automation.len(), 3);
        assert!(plan.delegated.is_empty());

        let batch = Executor::new(Arc::new(registry))
            .execute_all(plan.automation)
            .await;

        assert_eq!(batch.len(), 3);
        assert!(batch.outcomes.iter().all(|o| o.is_success()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(batch.commands[0].argument, "calculator");
        assert_eq!(batch.commands[1].argument, "relaxing music");
        assert_eq!(batch.commands[2].argument, "volume up");
    }

    #[tokio::test]
    async fn test_full_pipeline_delegated_only() {
        let commands = parse("general who is he, exit");
        let plan = dispatch(commands);

        assert!(plan.automation.is_empty());
        assert_eq!(plan.delegated.len(), 2);
        assert_eq!(plan.delegated[0].kind, CommandKind::GeneralChat);
        assert_eq!(plan.delegated[0].argument, "who is he");
        assert!(plan.wants_exit());

        // Nothing to execute; the batch must stay empty.
        let batch = Executor::new(Arc::new(HandlerRegistry::new()))
            .execute_all(plan.automation)
            .await;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_per_slot() {
        let ok_calls = Arc::new(AtomicUsize::new(0));
        let bad_calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        registry.register(MockHandler::ok(CommandKind::OpenApp, &ok_calls));
        registry.register(MockHandler::failing(
            CommandKind::PlayMedia,
            &bad_calls,
            "player unavailable",
        ));

        let plan = dispatch(parse("open firefox, play jazz, open notepad"));
        let batch = Executor::new(Arc::new(registry))
            .execute_all(plan.automation)
            .await;

        assert_eq!(batch.len(), 3);
        assert!(batch.outcomes[0].is_success());
        assert!(
            matches!(&batch.outcomes[1], TaskOutcome::Failure(r) if r.contains("player unavailable"))
        );
        assert!(batch.outcomes[2].is_success());
        assert_eq!(batch.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_exit_cuts_off_trailing_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HandlerRegistry::new();
        registry.register(MockHandler::ok(CommandKind::OpenApp, &calls));
        registry.register(MockHandler::ok(CommandKind::CloseApp, &calls));

        let plan = dispatch(parse("open notepad, exit, close notepad"));
        assert_eq!(plan.automation.len(), 1);
        assert!(plan.wants_exit());

        let batch = Executor::new(Arc::new(registry))
            .execute_all(plan.automation)
            .await;
        assert_eq!(batch.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unclassified_noise_degrades_to_empty_work() {
        let plan = dispatch(parse("frobnicate the widgets"));
        assert!(plan.automation.is_empty());
        assert!(plan.delegated.is_empty());

        let batch = Executor::new(Arc::new(HandlerRegistry::new()))
            .execute_all(plan.automation)
            .await;
        assert!(batch.is_empty());
    }
}
