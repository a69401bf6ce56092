//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use colored::Colorize;
use council_application::{
    LlmGateway, NoEvents, NoProgress, ProgressNotifier, SendMessageInput, SendMessageUseCase,
    StoreError,
};
use council_domain::{CouncilMode, ModelId};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Errors that end the REPL
#[derive(Error, Debug)]
pub enum ReplError {
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conversation storage error: {0}")]
    Store(#[from] StoreError),
}

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    New,
    /// `/mode` without an argument shows the current mode
    ShowMode,
    Mode(CouncilMode),
    InvalidMode(String),
    Unknown(String),
}

/// Parse a line starting with `/`.
pub fn parse_command(line: &str) -> ReplCommand {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "/quit" | "/exit" | "/q" => ReplCommand::Quit,
        "/help" | "/h" | "/?" => ReplCommand::Help,
        "/new" => ReplCommand::New,
        "/mode" => match arg {
            None => ReplCommand::ShowMode,
            Some(value) => match value.parse::<CouncilMode>() {
                Ok(mode) => ReplCommand::Mode(mode),
                Err(_) => ReplCommand::InvalidMode(value.to_string()),
            },
        },
        other => ReplCommand::Unknown(other.to_string()),
    }
}

/// Interactive chat REPL
pub struct ChatRepl<G: LlmGateway + 'static> {
    use_case: SendMessageUseCase<G>,
    mode: CouncilMode,
    models: Vec<ModelId>,
    chairman: Option<ModelId>,
    show_progress: bool,
    conversation_id: Option<String>,
}

impl<G: LlmGateway + 'static> ChatRepl<G> {
    /// Create a new ChatRepl
    pub fn new(use_case: SendMessageUseCase<G>, mode: CouncilMode) -> Self {
        Self {
            use_case,
            mode,
            models: Vec::new(),
            chairman: None,
            show_progress: true,
            conversation_id: None,
        }
    }

    /// Custom council used for every message
    pub fn with_models(mut self, models: Vec<ModelId>, chairman: Option<ModelId>) -> Self {
        self.models = models;
        self.chairman = chairman;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Continue an existing conversation instead of starting a new one
    pub fn with_conversation(mut self, id: Option<String>) -> Self {
        self.conversation_id = id;
        self
    }

    pub fn mode(&self) -> CouncilMode {
        self.mode
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> Result<(), ReplError> {
        let mut editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("llm-council").join("history.txt"));
        if let Some(path) = &history_path {
            editor = Self::attach_history(editor, path);
        }

        self.print_welcome();

        loop {
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(format!("council [{}]", self.mode)),
                DefaultPromptSegment::Empty,
            );

            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(parse_command(line)) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await?;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn attach_history(editor: Reedline, path: &PathBuf) -> Reedline {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Cannot create history directory {}: {}", parent.display(), e);
            return editor;
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Cannot open history file {}: {}", path.display(), e);
                editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           LLM Council - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Mode: {}", self.mode);
        if !self.models.is_empty() {
            println!(
                "Models: {}",
                self.models
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /mode [chat|code|image] - Show or switch the council mode");
        println!("  /new                    - Start a new conversation");
        println!("  /help, /h, /?           - Show this help");
        println!("  /quit, /exit, /q        - Exit chat");
        println!();
    }

    /// Apply a slash command. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                true
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
                false
            }
            ReplCommand::New => {
                self.conversation_id = None;
                println!("Started a new conversation.");
                false
            }
            ReplCommand::ShowMode => {
                println!("Current mode: {}", self.mode);
                false
            }
            ReplCommand::Mode(mode) => {
                self.mode = mode;
                println!("Switched to {} mode.", mode);
                false
            }
            ReplCommand::InvalidMode(value) => {
                println!("Unknown mode: {} (expected chat, code or image)", value);
                false
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    /// Id of the current conversation, creating it on first use
    fn ensure_conversation(&mut self) -> Result<String, StoreError> {
        if let Some(id) = &self.conversation_id {
            return Ok(id.clone());
        }
        let conversation = self.use_case.store().create()?;
        self.conversation_id = Some(conversation.id.clone());
        Ok(conversation.id)
    }

    async fn process_question(&mut self, question: &str) -> Result<(), ReplError> {
        println!();

        let conversation_id = self.ensure_conversation()?;
        let input = SendMessageInput::new(question)
            .with_mode(self.mode)
            .with_models(self.models.clone())
            .with_chairman(self.chairman.clone());

        let reporter;
        let progress: &dyn ProgressNotifier = if self.show_progress {
            reporter = ProgressReporter::new();
            &reporter
        } else {
            &NoProgress
        };

        match self
            .use_case
            .execute(&conversation_id, input, progress, &NoEvents)
            .await
        {
            Ok(output) => {
                if let Some(title) = &output.title {
                    println!("{} {}", "Conversation:".dimmed(), title.bold());
                }
                println!("{}", ConsoleFormatter::format_final_only(&output.run));
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_application::{
        ConversationStore, CouncilConfig, GatewayError, GenerateTitleUseCase,
        InMemoryConversationStore, ModelReply, QueryOptions, RunCouncilUseCase,
    };
    use council_domain::ChatMessage;
    use std::sync::Arc;
    use std::time::Duration;

    struct EchoGateway;

    #[async_trait]
    impl LlmGateway for EchoGateway {
        async fn query(
            &self,
            model: &ModelId,
            _messages: &[ChatMessage],
            _options: &QueryOptions,
        ) -> Result<ModelReply, GatewayError> {
            Ok(ModelReply::text(format!(
                "{} says hi\nFINAL RANKING:\n1. Response A",
                model
            )))
        }
    }

    fn repl(store: Arc<InMemoryConversationStore>) -> ChatRepl<EchoGateway> {
        let gateway = Arc::new(EchoGateway);
        let config = Arc::new(CouncilConfig::default());
        let council = RunCouncilUseCase::new(gateway.clone(), config);
        let title = GenerateTitleUseCase::new(
            gateway,
            ModelId::new("google/gemini-2.5-flash"),
            Duration::from_secs(5),
        );
        let use_case = SendMessageUseCase::new(council, title, store);
        ChatRepl::new(use_case, CouncilMode::Chat)
            .with_models(vec![ModelId::new("a/one")], None)
            .with_progress(false)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/quit"), ReplCommand::Quit);
        assert_eq!(parse_command("/q"), ReplCommand::Quit);
        assert_eq!(parse_command("/help"), ReplCommand::Help);
        assert_eq!(parse_command("/new"), ReplCommand::New);
        assert_eq!(parse_command("/mode"), ReplCommand::ShowMode);
        assert_eq!(
            parse_command("/mode Code"),
            ReplCommand::Mode(CouncilMode::Code)
        );
        assert_eq!(
            parse_command("/mode poetry"),
            ReplCommand::InvalidMode("poetry".to_string())
        );
        assert_eq!(
            parse_command("/models"),
            ReplCommand::Unknown("/models".to_string())
        );
    }

    #[test]
    fn test_mode_and_new_commands() {
        let mut repl = repl(Arc::new(InMemoryConversationStore::new()));
        repl.conversation_id = Some("conversation-1".to_string());

        assert!(!repl.handle_command(ReplCommand::Mode(CouncilMode::Image)));
        assert_eq!(repl.mode(), CouncilMode::Image);

        assert!(!repl.handle_command(ReplCommand::New));
        assert!(repl.conversation_id().is_none());

        assert!(repl.handle_command(ReplCommand::Quit));
    }

    #[tokio::test]
    async fn test_questions_share_one_conversation() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut repl = repl(store.clone());

        repl.process_question("What is Rust?").await.unwrap();
        repl.process_question("And Go?").await.unwrap();

        let id = repl.conversation_id().unwrap().to_string();
        let conversation = store.get(&id).unwrap().unwrap();
        assert_eq!(conversation.messages.len(), 4);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
