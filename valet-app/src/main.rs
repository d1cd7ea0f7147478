use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub mod config;

use config::Config;
use valet_core::{dispatch, parse, CommandKind, Executor, HandlerRegistry, TaskOutcome};
use valet_jobs::JobManager;
use valet_memory::{ChatLog, ChatLogStore};
use valet_providers::{
    AssistantChat, ChatModel, DecisionClassifier, ImageGenerator, Message, OpenAICompatibleModel,
    RealtimeChat,
};

const SESSION_ID: &str = "default";

/// Adapts the chat model into the content-writer seam with its own prompt.
struct ChatContentWriter {
    model: Arc<dyn ChatModel>,
}

#[async_trait::async_trait]
impl valet_handlers::ContentGenerator for ChatContentWriter {
    async fn generate(&self, topic: &str) -> Result<String, valet_core::HandlerError> {
        let messages = vec![
            Message::system(
                "You are a professional content writer. Write the requested content \
                 directly, with no preamble and no closing notes.",
            ),
            Message::user(topic),
        ];
        self.model
            .reply(&messages)
            .await
            .map_err(|e| valet_core::HandlerError::Execution(e.to_string()))
    }
}

enum TurnFlow {
    Continue,
    Exit,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║              Valet Assistant                 ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();

    let config = Config::load().context("Failed to load configuration")?;

    // One pooled HTTP client shared by every component that goes online.
    let http = reqwest::Client::new();

    let model: Arc<dyn ChatModel> = Arc::new(OpenAICompatibleModel::new(
        http.clone(),
        config.chat.base_url.clone(),
        Config::api_key(),
        config.chat.model.clone(),
    ));

    let classifier = DecisionClassifier::new(Arc::clone(&model));
    let chat = AssistantChat::new(
        Arc::clone(&model),
        &config.assistant_name,
        &config.user_name,
        config.chat.history_limit,
    );
    let realtime = RealtimeChat::new(
        Arc::clone(&model),
        http.clone(),
        &config.assistant_name,
        &config.user_name,
        config.chat.history_limit,
    );
    let images = Arc::new(
        ImageGenerator::new(
            http.clone(),
            config.image.api_url.clone(),
            Config::image_api_key(),
            config.image_dir(),
        )
        .with_viewer(),
    );

    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(valet_handlers::OpenAppHandler::new(http.clone())));
    registry.register(Arc::new(valet_handlers::CloseAppHandler));
    registry.register(Arc::new(valet_handlers::PlayMediaHandler::new(http.clone())));
    registry.register(Arc::new(valet_handlers::SystemCommandHandler));
    registry.register(Arc::new(valet_handlers::WebSearchHandler));
    registry.register(Arc::new(valet_handlers::VideoSearchHandler));
    registry.register(Arc::new(valet_handlers::WriteContentHandler::new(
        Arc::new(ChatContentWriter {
            model: Arc::clone(&model),
        }),
        config.content_dir(),
    )));

    let executor = Executor::with_task_timeout(
        Arc::new(registry),
        Duration::from_secs(config.task_timeout_secs),
    );

    let jobs = JobManager::with_state_file(config.jobs_state_file());
    std::fs::create_dir_all(&config.paths.data_dir)
        .context("Failed to create data directory")?;
    jobs.restore().await.context("Failed to restore job state")?;

    let store = ChatLogStore::new(config.chat_log_dir());
    store.initialize().await.context("Failed to initialize chat log store")?;
    let mut log = store
        .load(SESSION_ID)
        .await
        .context("Failed to load chat log")?;

    println!("✅ {} ready. Ask for anything, or type 'exit' to quit.", config.assistant_name);
    println!();

    loop {
        print!(">>> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query, "exit" | "quit") {
            break;
        }

        match run_turn(query, &classifier, &chat, &realtime, &images, &executor, &jobs, &mut log)
            .await
        {
            Ok(TurnFlow::Continue) => {}
            Ok(TurnFlow::Exit) => break,
            Err(e) => eprintln!("❌ {e:#}"),
        }

        if let Err(e) = store.save(&log).await {
            warn!(error = %e, "could not save chat log");
        }
        println!();
    }

    if let Err(e) = store.save(&log).await {
        warn!(error = %e, "could not save chat log");
    }
    let still_running = jobs.running_count().await;
    if still_running > 0 {
        println!("⏳ {still_running} background job(s) abandoned at exit");
    }
    println!("👋 Goodbye!");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_turn(
    query: &str,
    classifier: &DecisionClassifier,
    chat: &AssistantChat,
    realtime: &RealtimeChat,
    images: &Arc<ImageGenerator>,
    executor: &Executor,
    jobs: &JobManager,
    log: &mut ChatLog,
) -> Result<TurnFlow> {
    let decision = match classifier.classify(query).await {
        Ok(decision) => decision,
        Err(e) => {
            warn!(error = %e, "classifier unavailable, treating query as general chat");
            format!("general {query}")
        }
    };
    debug!(decision, "classified query");

    let commands = parse(&decision);
    if commands.is_empty() {
        println!("🤔 I could not map that to anything I can do.");
        return Ok(TurnFlow::Continue);
    }

    let plan = dispatch(commands);
    let wants_exit = plan.wants_exit();

    for command in &plan.delegated {
        match command.kind {
            CommandKind::GeneralChat => {
                let answer = chat.reply(log, &command.argument).await?;
                println!("{answer}");
                log.push_user(&command.argument);
                log.push_assistant(&answer);
            }
            CommandKind::RealtimeChat => {
                let answer = realtime.reply(log, &command.argument).await?;
                println!("{answer}");
                log.push_user(&command.argument);
                log.push_assistant(&answer);
            }
            CommandKind::GenerateImage => {
                let prompt = command.argument.clone();
                let generator = Arc::clone(images);
                let job_id = format!("image-{}", chrono::Utc::now().timestamp_millis());
                let description = format!("generate image: {prompt}");
                let spawned = jobs
                    .spawn(job_id, description, move || async move {
                        generator
                            .generate(&prompt)
                            .await
                            .map(|paths| format!("{} image(s) saved", paths.len()))
                            .map_err(|e| e.to_string())
                    })
                    .await;
                match spawned {
                    Ok(id) => println!("🎨 Generating images in the background ({id})"),
                    Err(e) => eprintln!("❌ Could not start image job: {e}"),
                }
            }
            // Exit is handled after the batch below; nothing to run here.
            _ => {}
        }
    }

    let batch = executor.execute_all(plan.automation).await;
    for (command, outcome) in batch.iter() {
        match outcome {
            TaskOutcome::Success => {
                println!("✅ {} {}", command.kind, command.argument);
            }
            TaskOutcome::Failure(reason) => {
                println!("❌ {} {}: {}", command.kind, command.argument, reason);
            }
            TaskOutcome::Skipped => {
                println!("⏭️  {} {}: skipped", command.kind, command.argument);
            }
        }
    }

    if wants_exit {
        return Ok(TurnFlow::Exit);
    }
    Ok(TurnFlow::Continue)
}
