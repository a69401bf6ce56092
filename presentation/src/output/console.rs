//! Console output formatter for council results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::{
    Conversation, ConversationMessage, ConversationSummary, CouncilRun, StageOneResult,
    StageThreeResult, StageTwoResult,
};

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete council run
    pub fn format(run: &CouncilRun) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), run.question));

        if let Some(metadata) = &run.metadata {
            output.push_str(&format!(
                "{} {}\n",
                "Mode:".cyan().bold(),
                metadata.mode
            ));
            output.push_str(&format!(
                "{} {}\n",
                "Council:".cyan().bold(),
                Self::join(metadata.council_models.iter())
            ));
            if metadata.web_search_used {
                output.push_str(&format!("{}\n", "Web search context was used".dimmed()));
            }
        }
        output.push('\n');

        if run.is_failed() {
            output.push_str(&format!("{}\n", run.stage3.response.red().bold()));
            output.push_str(&Self::footer());
            return output;
        }

        output.push_str(&Self::section_header("Stage 1: Individual Responses"));
        output.push_str(&Self::format_stage1(&run.stage1));

        output.push_str(&Self::section_header("Stage 2: Peer Rankings"));
        output.push_str(&Self::format_stage2(&run.stage2));

        if let Some(metadata) = &run.metadata {
            output.push_str(&format!("\n{}\n", "Label mapping:".cyan().bold()));
            for (label, model) in metadata.label_to_model.iter() {
                output.push_str(&format!("  {} = {}\n", label.response_key(), model));
            }
        }

        let aggregate = run.aggregate_rankings();
        if !aggregate.is_empty() {
            output.push_str(&format!("\n{}\n", "Aggregate Rankings:".green().bold()));
            output.push_str(&format!(
                "  {:<4} {:<45} {:>8} {:>6}\n",
                "#", "Model", "Avg rank", "Votes"
            ));
            for (position, entry) in aggregate.iter().enumerate() {
                output.push_str(&format!(
                    "  {:<4} {:<45} {:>8.2} {:>6}\n",
                    position + 1,
                    entry.model.to_string(),
                    entry.average_rank,
                    entry.rankings_count
                ));
            }
        }

        output.push_str(&Self::section_header("Stage 3: Final Answer"));
        output.push_str(&Self::format_stage3(&run.stage3));

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(run: &CouncilRun) -> String {
        serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the chairman's answer only (concise output)
    pub fn format_final_only(run: &CouncilRun) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== LLM Council Answer ===".cyan().bold()
        ));

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), run.question));

        if let Some(metadata) = &run.metadata {
            output.push_str(&format!(
                "{} {}\n",
                "Models consulted:".dimmed(),
                Self::join(metadata.council_models.iter())
            ));
            output.push_str(&format!(
                "{} {}\n\n",
                "Chairman:".dimmed(),
                metadata.chairman_model
            ));
        }

        output.push_str(&run.stage3.response);
        output.push('\n');
        output.push_str(&Self::format_images(&run.stage3.images));

        output
    }

    /// Format stored conversations as a table, newest first
    pub fn format_conversation_list(conversations: &[ConversationSummary]) -> String {
        if conversations.is_empty() {
            return "No conversations yet.\n".to_string();
        }

        let mut output = String::new();
        for summary in conversations {
            output.push_str(&format!(
                "{}  {}  {} ({} messages)\n",
                summary.id.yellow(),
                summary.created_at.dimmed(),
                summary.title.bold(),
                summary.message_count
            ));
        }
        output
    }

    /// Format a stored conversation with every stage of each answer
    pub fn format_conversation(conversation: &Conversation) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&conversation.title));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n{} {}\n",
            "Id:".cyan().bold(),
            conversation.id,
            "Created:".cyan().bold(),
            conversation.created_at
        ));

        for message in &conversation.messages {
            match message {
                ConversationMessage::User { content } => {
                    output.push_str(&format!("\n{} {}\n", "You:".green().bold(), content));
                }
                ConversationMessage::Assistant {
                    stage1,
                    stage2,
                    stage3,
                } => {
                    output.push_str(&Self::section_header("Stage 1: Individual Responses"));
                    output.push_str(&Self::format_stage1(stage1));
                    if !stage2.is_empty() {
                        output.push_str(&Self::section_header("Stage 2: Peer Rankings"));
                        output.push_str(&Self::format_stage2(stage2));
                    }
                    output.push_str(&Self::section_header("Stage 3: Final Answer"));
                    output.push_str(&Self::format_stage3(stage3));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_stage1(results: &[StageOneResult]) -> String {
        let mut output = String::new();
        for result in results {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", result.model).yellow().bold(),
                result.response
            ));
            output.push_str(&Self::format_images(&result.images));
        }
        output
    }

    fn format_stage2(results: &[StageTwoResult]) -> String {
        let mut output = String::new();
        for result in results {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", result.model).yellow().bold(),
                result.ranking
            ));
            if result.parsed_ranking.is_empty() {
                output.push_str(&format!("{}\n", "Parsed ranking: (none)".dimmed()));
            } else {
                output.push_str(&format!(
                    "{} {}\n",
                    "Parsed ranking:".cyan(),
                    result.parsed_ranking.join(" > ")
                ));
            }
        }
        output
    }

    fn format_stage3(result: &StageThreeResult) -> String {
        let title = format!("Chairman: {}", result.model);
        let title = if result.is_synthesis_failure() {
            title.red().bold()
        } else {
            title.yellow().bold()
        };
        let mut output = format!("\n{}\n\n{}\n", title, result.response);
        output.push_str(&Self::format_images(&result.images));
        output
    }

    fn format_images(images: &[String]) -> String {
        if images.is_empty() {
            return String::new();
        }
        format!(
            "{}\n",
            format!("[{} image(s) attached, see --output json]", images.len()).dimmed()
        )
    }

    fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
        items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, run: &CouncilRun) -> String {
        Self::format(run)
    }

    fn format_json(&self, run: &CouncilRun) -> String {
        Self::format_json(run)
    }

    fn format_final_only(&self, run: &CouncilRun) -> String {
        Self::format_final_only(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        AggregateEntry, CouncilMetadata, CouncilMode, LabelToModel, ModelId, OutputFormat,
    };

    fn sample_run() -> CouncilRun {
        let a = ModelId::new("openai/gpt-5.1");
        let b = ModelId::new("x-ai/grok-4");
        let label_to_model = LabelToModel::assign([&a, &b]);

        CouncilRun::new(
            "What is Rust?",
            vec![
                StageOneResult::new(a.clone(), "A systems language."),
                StageOneResult::new(b.clone(), "A memory-safe language."),
            ],
            vec![StageTwoResult {
                model: a.clone(),
                ranking: "FINAL RANKING:\n1. Response B\n2. Response A".to_string(),
                parsed_ranking: vec!["Response B".to_string(), "Response A".to_string()],
            }],
            StageThreeResult::new(b.clone(), "Rust is a memory-safe systems language."),
            CouncilMetadata {
                label_to_model,
                aggregate_rankings: vec![
                    AggregateEntry {
                        model: b.clone(),
                        average_rank: 1.0,
                        rankings_count: 1,
                    },
                    AggregateEntry {
                        model: a.clone(),
                        average_rank: 2.0,
                        rankings_count: 1,
                    },
                ],
                web_search_used: false,
                search_context: None,
                mode: CouncilMode::Chat,
                council_models: vec![a, b.clone()],
                chairman_model: b,
            },
        )
    }

    #[test]
    fn test_full_output_contains_every_stage() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&sample_run());

        assert!(output.contains("Stage 1: Individual Responses"));
        assert!(output.contains("A memory-safe language."));
        assert!(output.contains("Parsed ranking: Response B > Response A"));
        assert!(output.contains("Response A = openai/gpt-5.1"));
        assert!(output.contains("Aggregate Rankings:"));
        assert!(output.contains("Rust is a memory-safe systems language."));
    }

    #[test]
    fn test_final_only_output() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_final_only(&sample_run());

        assert!(output.contains("Q: What is Rust?"));
        assert!(output.contains("Chairman: x-ai/grok-4"));
        assert!(output.contains("Rust is a memory-safe systems language."));
        assert!(!output.contains("A systems language."));
    }

    #[test]
    fn test_failed_run_shows_error() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&CouncilRun::failed("What is Rust?"));
        assert!(output.contains("All models failed to respond"));
        assert!(!output.contains("Stage 2"));
    }

    #[test]
    fn test_render_json() {
        let output = ConsoleFormatter.render(&sample_run(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["stage3"]["model"], "x-ai/grok-4");
        assert_eq!(value["metadata"]["label_to_model"]["Response B"], "x-ai/grok-4");
    }

    #[test]
    fn test_empty_conversation_list() {
        assert_eq!(
            ConsoleFormatter::format_conversation_list(&[]),
            "No conversations yet.\n"
        );
    }
}
