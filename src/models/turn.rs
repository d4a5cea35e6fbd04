use std::fmt;

use serde::{Deserialize, Serialize};

use super::RawAnnotation;

/// Nominal turn identifier as written in the transcript
///
/// Purely numeric identifiers are stored in canonical decimal form so that
/// `"05"`, `"5"` and the integer `5` all name the same turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_numeric(trimmed) {
            let canonical = trimmed.trim_start_matches('0');
            if canonical.is_empty() {
                return Self("0".to_string());
            }
            return Self(canonical.to_string());
        }
        Self(trimmed.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u64> for TurnId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TurnId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a string is a non-empty run of ASCII digits
pub(crate) fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// One row of the source table, before annotation parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRow {
    /// Participant identifier
    pub speaker: String,
    /// Nominal turn identifier (shared by every row of a turn-group)
    pub turn_id: TurnId,
    /// Raw response-coding cell, if the column was present
    pub annotation: Option<String>,
}

impl TranscriptRow {
    pub fn new(speaker: impl Into<String>, turn_id: impl Into<TurnId>, annotation: Option<&str>) -> Self {
        Self {
            speaker: speaker.into(),
            turn_id: turn_id.into(),
            annotation: annotation.map(str::to_string),
        }
    }
}

/// One contribution by one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Index in transcript order
    pub position: usize,
    pub turn_id: TurnId,
    pub speaker: String,
    /// Parsed response coding; `None` when the turn carries no annotation
    pub annotation: Option<RawAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_id_canonical_numeric() {
        assert_eq!(TurnId::new("05"), TurnId::from(5u64));
        assert_eq!(TurnId::new(" 12 "), TurnId::from(12u64));
        assert_eq!(TurnId::new("000"), TurnId::from(0u64));
        assert_eq!(TurnId::from(7u64).as_str(), "7");
    }

    #[test]
    fn test_turn_id_text_is_trimmed_only() {
        let id = TurnId::new("  4a ");
        assert_eq!(id.as_str(), "4a");
        assert_ne!(id, TurnId::from(4u64));
        assert!(TurnId::new("   ").is_empty());
    }
}
