use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Emotion tag attached to a dream.
///
/// Closed set of ten values. Serialized with its capitalized name, the form
/// the service stores. Ordering follows declaration order, which is also the
/// display order of the picker.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Peaceful,
    Confused,
    Excited,
    Scared,
    Calm,
    Angry,
    Hopeful,
}

impl Emotion {
    /// All emotions in picker order.
    pub const ALL: [Emotion; 10] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Anxious,
        Emotion::Peaceful,
        Emotion::Confused,
        Emotion::Excited,
        Emotion::Scared,
        Emotion::Calm,
        Emotion::Angry,
        Emotion::Hopeful,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_matches_variants() {
        let iterated: Vec<Emotion> = Emotion::iter().collect();
        assert_eq!(iterated, Emotion::ALL.to_vec());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Emotion::Peaceful).unwrap(), "\"Peaceful\"");
        let parsed: Emotion = serde_json::from_str("\"Hopeful\"").unwrap();
        assert_eq!(parsed, Emotion::Hopeful);
        assert!(serde_json::from_str::<Emotion>("\"Bored\"").is_err());
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Emotion::Anxious.to_string(), "Anxious");
        assert_eq!(Emotion::from_str("Calm").unwrap(), Emotion::Calm);
    }
}
