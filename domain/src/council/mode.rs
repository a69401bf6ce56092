//! Council modes and their prompt profiles.
//!
//! Each [`CouncilMode`] carries a static [`ModeProfile`] with every piece of
//! mode-specific prompt text. The mode is selected once per run and the
//! stages read from the profile instead of branching on the mode.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Kind of task the council deliberates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouncilMode {
    /// General question answering (default)
    #[default]
    Chat,
    /// Programming and code review
    Code,
    /// Image generation
    Image,
}

/// Prompt text for one mode
#[derive(Debug)]
pub struct ModeProfile {
    /// System instruction for Stage 1, if any
    pub system_prompt: Option<&'static str>,
    /// Heading placed above the user's request in Stage 1
    pub query_heading: Option<&'static str>,
    /// How the ranking prompt refers to the task
    pub ranking_context: &'static str,
    /// Bullet list the raters judge against
    pub evaluation_criteria: &'static str,
    /// Opening paragraph of the chairman prompt
    pub chairman_intro: &'static str,
    /// Label for the original request in the chairman prompt
    pub chairman_task_label: &'static str,
    /// Heading for the Stage 1 block in the chairman prompt
    pub chairman_stage1_heading: &'static str,
    /// Heading for the Stage 2 block in the chairman prompt
    pub chairman_stage2_heading: &'static str,
    /// Field name for each Stage 1 answer in the chairman prompt
    pub chairman_response_field: &'static str,
    /// Closing instructions of the chairman prompt
    pub chairman_task: &'static str,
    /// Whether rendered answers carry a `[Generated N image(s)]` note
    pub annotate_images: bool,
}

const CODE_SYSTEM_PROMPT: &str = r#"You are an expert software engineer participating in a code review council.
Focus on:
- Code correctness and best practices
- Security considerations
- Performance optimization
- Clean, maintainable code
- Clear explanations of your reasoning

Provide your response with code examples when appropriate, using proper markdown code blocks."#;

const IMAGE_SYSTEM_PROMPT: &str = r#"You are a creative AI artist participating in an image generation council.
Focus on:
- Interpreting the user's creative vision
- Generating high-quality, detailed images
- Artistic composition and aesthetics
- Following the prompt instructions precisely

Generate an image based on the user's description."#;

static CHAT_PROFILE: ModeProfile = ModeProfile {
    system_prompt: None,
    query_heading: None,
    ranking_context: "question",
    evaluation_criteria: r#"
- Accuracy and correctness
- Comprehensiveness and depth
- Clarity of explanation
- Practical usefulness"#,
    chairman_intro: "You are the Chairman of an LLM Council. Multiple AI models have provided responses to a user's question, and then ranked each other's responses.",
    chairman_task_label: "Original Question",
    chairman_stage1_heading: "STAGE 1 - Individual Responses",
    chairman_stage2_heading: "STAGE 2 - Peer Rankings",
    chairman_response_field: "Response",
    chairman_task: r#"Your task as Chairman is to synthesize all of this information into a single, comprehensive, accurate answer to the user's original question. Consider:
- The individual responses and their insights
- The peer rankings and what they reveal about response quality
- Any patterns of agreement or disagreement

Provide a clear, well-reasoned final answer that represents the council's collective wisdom:"#,
    annotate_images: false,
};

static CODE_PROFILE: ModeProfile = ModeProfile {
    system_prompt: Some(CODE_SYSTEM_PROMPT),
    query_heading: Some("Code Task"),
    ranking_context: "code generation/review task",
    evaluation_criteria: r#"
- Code correctness and functionality
- Best practices and clean code principles
- Security considerations
- Performance and efficiency
- Clarity of explanations"#,
    chairman_intro: "You are the Lead Architect of a Code Council. Multiple expert developers have provided solutions to a coding task, and then reviewed each other's code.",
    chairman_task_label: "Original Code Task",
    chairman_stage1_heading: "STAGE 1 - Individual Solutions",
    chairman_stage2_heading: "STAGE 2 - Peer Reviews",
    chairman_response_field: "Response",
    chairman_task: r#"Your task as Lead Architect is to synthesize all solutions into the BEST possible implementation. Consider:
- Code correctness from all submissions
- Best practices identified in reviews
- Security and performance optimizations suggested
- The consensus of peer rankings

Provide the definitive solution with clean, well-documented code:"#,
    annotate_images: false,
};

static IMAGE_PROFILE: ModeProfile = ModeProfile {
    system_prompt: Some(IMAGE_SYSTEM_PROMPT),
    query_heading: Some("Image Generation Request"),
    ranking_context: "image generation task",
    evaluation_criteria: r#"
- Quality and accuracy of the generated image
- Adherence to the prompt instructions
- Artistic composition and aesthetics
- Creativity and interpretation"#,
    chairman_intro: "You are the Creative Director of an Image Council. Multiple AI artists have created interpretations of an image request, and then evaluated each other's work.",
    chairman_task_label: "Original Image Request",
    chairman_stage1_heading: "STAGE 1 - Individual Creations",
    chairman_stage2_heading: "STAGE 2 - Peer Evaluations",
    chairman_response_field: "Description",
    chairman_task: r#"Your task as Creative Director is to create the DEFINITIVE image that best represents the user's vision. Consider:
- The most praised elements from each submission
- The artistic insights from peer evaluations
- The consensus on what works best
- The original user intent

Generate the final, best interpretation of the user's request:"#,
    annotate_images: true,
};

impl CouncilMode {
    pub const ALL: [CouncilMode; 3] = [CouncilMode::Chat, CouncilMode::Code, CouncilMode::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            CouncilMode::Chat => "chat",
            CouncilMode::Code => "code",
            CouncilMode::Image => "image",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CouncilMode::Chat => "Chat",
            CouncilMode::Code => "Code",
            CouncilMode::Image => "Image",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CouncilMode::Chat => "General purpose conversation",
            CouncilMode::Code => "Programming and development",
            CouncilMode::Image => "Image generation and analysis",
        }
    }

    pub fn profile(&self) -> &'static ModeProfile {
        match self {
            CouncilMode::Chat => &CHAT_PROFILE,
            CouncilMode::Code => &CODE_PROFILE,
            CouncilMode::Image => &IMAGE_PROFILE,
        }
    }

    /// Image mode asks the provider for text and image output.
    pub fn enables_image_generation(&self) -> bool {
        matches!(self, CouncilMode::Image)
    }

    /// Web search context is only gathered for chat questions.
    pub fn uses_web_search(&self) -> bool {
        matches!(self, CouncilMode::Chat)
    }
}

impl std::fmt::Display for CouncilMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CouncilMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(CouncilMode::Chat),
            "code" => Ok(CouncilMode::Code),
            "image" => Ok(CouncilMode::Image),
            other => Err(DomainError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_case_insensitive() {
        assert_eq!("Code".parse::<CouncilMode>().unwrap(), CouncilMode::Code);
        assert_eq!(" IMAGE ".parse::<CouncilMode>().unwrap(), CouncilMode::Image);
        assert!("video".parse::<CouncilMode>().is_err());
    }

    #[test]
    fn test_default_is_chat() {
        assert_eq!(CouncilMode::default(), CouncilMode::Chat);
    }

    #[test]
    fn test_only_image_generates_images() {
        assert!(CouncilMode::Image.enables_image_generation());
        assert!(!CouncilMode::Chat.enables_image_generation());
        assert!(!CouncilMode::Code.enables_image_generation());
    }

    #[test]
    fn test_profiles_carry_mode_framing() {
        assert!(CouncilMode::Chat.profile().system_prompt.is_none());
        assert!(
            CouncilMode::Code
                .profile()
                .chairman_intro
                .contains("Lead Architect")
        );
        assert!(
            CouncilMode::Image
                .profile()
                .chairman_intro
                .contains("Creative Director")
        );
        assert!(CouncilMode::Image.profile().annotate_images);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&CouncilMode::Code).unwrap(),
            r#""code""#
        );
    }
}
