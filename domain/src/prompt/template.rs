//! Prompt templates for the council flow

use crate::council::label::LabelToModel;
use crate::council::mode::CouncilMode;
use crate::council::value_objects::{StageOneResult, StageTwoResult};
use crate::session::message::ChatMessage;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Messages for Stage 1.
    ///
    /// Code and image modes open with their system instruction and frame the
    /// request under a heading. Chat sends the bare question, or embeds the
    /// web search context verbatim above it when one is available.
    pub fn stage_one_messages(
        mode: CouncilMode,
        question: &str,
        search_context: Option<&str>,
    ) -> Vec<ChatMessage> {
        let profile = mode.profile();
        let mut messages = Vec::with_capacity(2);

        if let Some(system) = profile.system_prompt {
            messages.push(ChatMessage::system(system));
        }

        let prompt = match (profile.query_heading, search_context) {
            (Some(heading), _) => format!("{}:\n\n{}", heading, question),
            (None, Some(context)) => Self::search_augmented_query(question, context),
            (None, None) => question.to_string(),
        };
        messages.push(ChatMessage::user(prompt));
        messages
    }

    fn search_augmented_query(question: &str, context: &str) -> String {
        format!(
            r#"The following web search results may be helpful for answering the question:

{}

---

Question: {}

Please provide a comprehensive answer, using the search results above if relevant."#,
            context, question
        )
    }

    /// Render Stage 1 answers under their anonymous labels.
    pub fn labelled_responses(
        mode: CouncilMode,
        stage1: &[StageOneResult],
        labels: &LabelToModel,
    ) -> String {
        let annotate = mode.profile().annotate_images;
        labels
            .labels()
            .zip(stage1)
            .map(|(label, result)| {
                format!(
                    "{}:\n{}{}",
                    label.response_key(),
                    result.response,
                    Self::image_note(annotate, &result.images)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Ranking prompt for Stage 2.
    pub fn ranking_prompt(
        mode: CouncilMode,
        question: &str,
        stage1: &[StageOneResult],
        labels: &LabelToModel,
    ) -> String {
        let profile = mode.profile();
        let responses_text = Self::labelled_responses(mode, stage1, labels);

        format!(
            r#"You are evaluating different responses to the following {context}:

Question: {question}

Here are the responses from different models (anonymized):

{responses_text}

Your task:
1. First, evaluate each response individually based on:{criteria}
2. Then, at the very end of your response, provide a final ranking.

IMPORTANT: Your final ranking MUST be formatted EXACTLY as follows:
- Start with the line "FINAL RANKING:" (all caps, with colon)
- Then list the responses from best to worst as a numbered list
- Each line should be: number, period, space, then ONLY the response label (e.g., "1. Response A")
- Do not add any other text or explanations in the ranking section

Example of the correct format for your ENTIRE response:

Response A provides good detail on X but misses Y...
Response B is accurate but lacks depth on Z...
Response C offers the most comprehensive answer...

FINAL RANKING:
1. Response C
2. Response A
3. Response B

Now provide your evaluation and ranking:"#,
            context = profile.ranking_context,
            criteria = profile.evaluation_criteria,
        )
    }

    /// Chairman prompt for Stage 3.
    pub fn chairman_prompt(
        mode: CouncilMode,
        question: &str,
        stage1: &[StageOneResult],
        stage2: &[StageTwoResult],
    ) -> String {
        let profile = mode.profile();

        let stage1_text = stage1
            .iter()
            .map(|result| {
                format!(
                    "Model: {}\n{}: {}{}",
                    result.model,
                    profile.chairman_response_field,
                    result.response,
                    Self::image_note(profile.annotate_images, &result.images)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let stage2_text = stage2
            .iter()
            .map(|result| format!("Model: {}\nRanking: {}", result.model, result.ranking))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{intro}\n\n{task_label}: {question}\n\n{h1}:\n{stage1_text}\n\n{h2}:\n{stage2_text}\n\n{task}",
            intro = profile.chairman_intro,
            task_label = profile.chairman_task_label,
            h1 = profile.chairman_stage1_heading,
            h2 = profile.chairman_stage2_heading,
            task = profile.chairman_task,
        )
    }

    /// Prompt asking for a 3-5 word conversation title.
    pub fn title_prompt(question: &str) -> String {
        format!(
            r#"Generate a very short title (3-5 words maximum) that summarizes the following question.
The title should be concise and descriptive. Do not use quotes or punctuation in the title.

Question: {}

Title:"#,
            question
        )
    }

    fn image_note(annotate: bool, images: &[String]) -> String {
        if annotate && !images.is_empty() {
            format!("\n[Generated {} image(s)]", images.len())
        } else {
            String::new()
        }
    }
}
