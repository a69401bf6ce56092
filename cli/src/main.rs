//! CLI entrypoint for LLM Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    ConversationLogger, ConversationStore, CouncilEvent, CouncilEventSink, GenerateTitleUseCase,
    NoConversationLogger, NoEvents, NoProgress, NoSearch, ProgressNotifier, RunCouncilInput,
    RunCouncilUseCase, SearchContextPort, SendMessageInput, SendMessageUseCase,
};
use council_domain::council::value_objects::ALL_MODELS_FAILED_RESPONSE;
use council_domain::{CouncilRun, ModelId, OutputFormat, Question};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonConversationStore, JsonlConversationLogger, OpenRouterGateway,
    OpenRouterSettings, TavilySearch,
};
use council_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SseEventPrinter,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    report_config_issues(&file_config);

    if !file_config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting LLM Council");

    // === Dependency Injection ===
    let store: Arc<dyn ConversationStore> =
        Arc::new(JsonConversationStore::new(&file_config.storage.data_dir));

    if cli.list_conversations {
        let conversations = store.list()?;
        print!("{}", ConsoleFormatter::format_conversation_list(&conversations));
        return Ok(());
    }

    if let Some(id) = &cli.show_conversation {
        let conversation = store
            .get(id)?
            .with_context(|| format!("Conversation {} not found", id))?;
        println!("{}", ConsoleFormatter::format_conversation(&conversation));
        return Ok(());
    }

    let gateway = Arc::new(build_gateway(&file_config)?);

    if cli.list_models {
        for model in gateway.list_models().await? {
            println!("{:<50} {}", model.id, model.display_name());
        }
        return Ok(());
    }

    let config = Arc::new(file_config.to_council_config());
    let council = RunCouncilUseCase::new(gateway.clone(), config.clone())
        .with_search(build_search(&file_config))
        .with_conversation_logger(build_logger(&file_config));

    let mode = cli
        .mode
        .map(Into::into)
        .unwrap_or_else(|| file_config.default_mode());
    let models: Vec<ModelId> = cli.model.iter().map(|m| ModelId::new(m.trim())).collect();
    let chairman = cli.chairman.as_deref().map(ModelId::new);
    let show_progress = file_config.output.show_progress && !cli.quiet && !cli.stream;

    let reporter;
    let progress: &dyn ProgressNotifier = if show_progress {
        reporter = ProgressReporter::new();
        &reporter
    } else {
        &NoProgress
    };

    let printer;
    let events: &dyn CouncilEventSink = if cli.stream {
        printer = SseEventPrinter::stdout();
        &printer
    } else {
        &NoEvents
    };

    let messages = || {
        let title = GenerateTitleUseCase::new(
            gateway.clone(),
            config.title_model.clone(),
            config.title_timeout,
        );
        SendMessageUseCase::new(council.clone(), title, store.clone())
    };

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(messages(), mode)
            .with_models(models, chairman)
            .with_progress(show_progress)
            .with_conversation(cli.conversation.clone());

        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question.clone() {
        Some(q) => q,
        None => bail!("Question is required. Use --chat for interactive mode."),
    };

    let run = if let Some(id) = &cli.conversation {
        let input = SendMessageInput::new(question)
            .with_mode(mode)
            .with_models(models)
            .with_chairman(chairman);
        let output = messages().execute(id, input, progress, events).await?;
        if let Some(title) = &output.title {
            info!("Conversation {} titled '{}'", id, title);
        }
        output.run
    } else {
        let input = RunCouncilInput::new(Question::new(question)?, mode)
            .with_models(models)
            .with_chairman(chairman);
        match council.execute_observed(input, progress, events).await {
            Ok(run) => {
                events.emit(if run.is_failed() {
                    CouncilEvent::Error {
                        message: ALL_MODELS_FAILED_RESPONSE.to_string(),
                    }
                } else {
                    CouncilEvent::Complete
                });
                run
            }
            Err(e) => {
                events.emit(CouncilEvent::Error {
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        }
    };

    if !cli.stream {
        print_run(&run, &cli, &file_config);
    }

    if run.is_failed() {
        bail!("{}", ALL_MODELS_FAILED_RESPONSE);
    }

    Ok(())
}

fn report_config_issues(config: &FileConfig) {
    for issue in config.validate() {
        if issue.is_error() {
            error!("{} (using built-in default)", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }
}

fn build_gateway(config: &FileConfig) -> Result<OpenRouterGateway> {
    let api_key = config.openrouter.resolve_api_key().with_context(|| {
        format!(
            "OpenRouter API key not found. Set {} or openrouter.api_key in the config file.",
            config.openrouter.api_key_env
        )
    })?;

    let settings = OpenRouterSettings {
        referer: config.openrouter.referer.clone(),
        app_title: config.openrouter.app_title.clone(),
        ..OpenRouterSettings::new(api_key).with_base_url(&config.openrouter.base_url)
    };
    Ok(OpenRouterGateway::new(settings)?)
}

fn build_search(config: &FileConfig) -> Arc<dyn SearchContextPort> {
    match config.search.resolve_api_key() {
        Some(key) => Arc::new(TavilySearch::new(Some(key)).with_endpoint(&config.search.endpoint)),
        None => {
            if config.search.enabled {
                info!(
                    "Web search disabled: {} is not set",
                    config.search.api_key_env
                );
            }
            Arc::new(NoSearch)
        }
    }
}

fn build_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    if let Some(path) = &config.logging.transcript_path
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        info!("Writing council transcript to {}", logger.path().display());
        return Arc::new(logger);
    }
    Arc::new(NoConversationLogger)
}

fn print_run(run: &CouncilRun, cli: &Cli, config: &FileConfig) {
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(run, format));
}
