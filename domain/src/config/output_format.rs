//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// All three stages plus the aggregate ranking table
    Full,
    /// Only the chairman's final answer (default)
    #[default]
    Final,
    /// JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(OutputFormat::Full),
            "final" => Ok(OutputFormat::Final),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_final() {
        assert_eq!(OutputFormat::default(), OutputFormat::Final);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("full".parse::<OutputFormat>().unwrap(), OutputFormat::Full);
        assert!("verbose".parse::<OutputFormat>().is_err());
    }
}
