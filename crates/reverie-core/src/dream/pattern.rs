use serde::{Deserialize, Serialize};

/// Cross-dream pattern result for one identity.
///
/// Either an analysis, or a message explaining why none could be made
/// (too few dreams). The analysis text is opaque prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternAnalysis {
    Analysis {
        pattern_analysis: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dreams_analyzed: Option<usize>,
    },
    InsufficientData {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dreams_count: Option<usize>,
    },
}

impl PatternAnalysis {
    pub fn is_analysis(&self) -> bool {
        matches!(self, Self::Analysis { .. })
    }

    /// The text to show, whichever shape the result has.
    pub fn text(&self) -> &str {
        match self {
            Self::Analysis {
                pattern_analysis, ..
            } => pattern_analysis,
            Self::InsufficientData { message, .. } => message,
        }
    }
}
