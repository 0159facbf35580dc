use serde::{Deserialize, Serialize};
use std::fmt;

/// The metered product capabilities counted against plan limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Audience personas created for an account
    Personas,
    /// Tone-of-voice analyses run against sample copy
    ToneAnalyses,
    /// AI content generations
    ContentGeneration,
    /// Marketing campaigns
    Campaigns,
}

impl FeatureKind {
    /// Every feature kind, in declaration order. Adding a variant here
    /// requires a limit entry on every plan tier; the catalog refuses to
    /// load otherwise.
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Personas,
        FeatureKind::ToneAnalyses,
        FeatureKind::ContentGeneration,
        FeatureKind::Campaigns,
    ];

    /// Stable string form used in logs and serialized payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Personas => "personas",
            FeatureKind::ToneAnalyses => "tone_analyses",
            FeatureKind::ContentGeneration => "content_generation",
            FeatureKind::Campaigns => "campaigns",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
