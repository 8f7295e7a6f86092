//! Dream domain models.

use super::emotion::Emotion;
use crate::error::{ReverieError, Result};
use crate::identity::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Message shown when title or description is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

/// Server-assigned dream identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DreamId(pub i64);

impl fmt::Display for DreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A symbol extracted from a dream, with its meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub symbol: String,
    #[serde(default)]
    pub meaning: String,
}

/// A recorded dream with its generated interpretation.
///
/// Read-only on the client except for deletion. The service is the system
/// of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dream {
    pub id: DreamId,
    pub user_id: Identity,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emotions: BTreeSet<Emotion>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    /// Present once the service has interpreted the dream.
    #[serde(default)]
    pub interpretation: Option<String>,
    /// Ordered as returned by the service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbols: Vec<Symbol>,
}

impl Dream {
    /// The interpretation text, if present and not blank.
    pub fn interpretation_text(&self) -> Option<&str> {
        self.interpretation
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Body of the create-dream exchange.
///
/// Only constructible through [`NewDream::new`], which rejects a blank title
/// or description before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDream {
    user_id: Identity,
    title: String,
    description: String,
    emotions: BTreeSet<Emotion>,
}

impl NewDream {
    pub fn new(
        identity: &Identity,
        title: &str,
        description: &str,
        emotions: &BTreeSet<Emotion>,
    ) -> Result<Self> {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(ReverieError::validation(REQUIRED_FIELDS_MESSAGE));
        }

        Ok(Self {
            user_id: identity.clone(),
            title: title.to_string(),
            description: description.to_string(),
            emotions: emotions.clone(),
        })
    }

    pub fn user_id(&self) -> &Identity {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn emotions(&self) -> &BTreeSet<Emotion> {
        &self.emotions
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
