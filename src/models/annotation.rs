use crate::error::AnnotationError;

use super::{Turn, TurnId};
use super::turn::is_numeric;

/// Configuration for reading response-coding cells
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    /// Literal markers for a turn that starts a new topic
    pub initiation_markers: Vec<String>,
    /// Literal markers for a turn whose target cannot be determined
    pub ambiguous_markers: Vec<String>,
    /// Markers meaning the turn carries no response coding at all
    pub blank_markers: Vec<String>,
    /// Separator between targets of a compound annotation
    pub compound_delimiter: char,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            initiation_markers: vec!["I".to_string(), "i".to_string(), "init".to_string()],
            ambiguous_markers: vec![
                "?".to_string(),
                "A".to_string(),
                "a".to_string(),
                "amb".to_string(),
            ],
            blank_markers: vec!["".to_string(), "-".to_string()],
            compound_delimiter: '+',
        }
    }
}

impl AnnotationConfig {
    fn matches(markers: &[String], value: &str) -> bool {
        markers.iter().any(|m| m == value)
    }
}

/// Response coding as it appears on a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnnotation {
    /// Starts a new topic
    Initiation,
    /// Target cannot be determined
    Ambiguous,
    /// Responds to exactly one prior turn (or turn-group)
    SingleTarget(TurnId),
    /// Responds to several prior turns
    CompoundTarget(Vec<TurnId>),
}

impl RawAnnotation {
    /// Parse a raw annotation cell
    ///
    /// Returns `Ok(None)` for blank cells. Marker comparison is exact after
    /// trimming whitespace.
    pub fn parse(raw: &str, config: &AnnotationConfig) -> Result<Option<Self>, AnnotationError> {
        let value = raw.trim();

        if AnnotationConfig::matches(&config.blank_markers, value) {
            return Ok(None);
        }
        if AnnotationConfig::matches(&config.initiation_markers, value) {
            return Ok(Some(Self::Initiation));
        }
        if AnnotationConfig::matches(&config.ambiguous_markers, value) {
            return Ok(Some(Self::Ambiguous));
        }

        let mut targets = value
            .split(config.compound_delimiter)
            .map(|piece| parse_target(piece, value))
            .collect::<Result<Vec<_>, _>>()?;

        if targets.len() == 1 {
            Ok(Some(Self::SingleTarget(targets.remove(0))))
        } else {
            Ok(Some(Self::CompoundTarget(targets)))
        }
    }

    /// Target identifiers named by this annotation, in written order
    pub fn targets(&self) -> &[TurnId] {
        match self {
            Self::Initiation | Self::Ambiguous => &[],
            Self::SingleTarget(target) => std::slice::from_ref(target),
            Self::CompoundTarget(targets) => targets,
        }
    }
}

fn parse_target(piece: &str, whole: &str) -> Result<TurnId, AnnotationError> {
    let piece = piece.trim();
    if piece.is_empty() {
        return Err(AnnotationError::EmptyTarget(whole.to_string()));
    }
    if !is_numeric(piece) {
        return Err(AnnotationError::NonNumericTarget(piece.to_string()));
    }
    Ok(TurnId::new(piece))
}

/// Single-target annotation after expansion: `origin` responds to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAnnotation<'a> {
    /// The responding turn
    pub origin: &'a Turn,
    pub target: &'a TurnId,
}

/// One resolved directed interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLink<'a> {
    pub responder: &'a str,
    pub respondee: &'a str,
    /// 1 for a single turn, the group size for a turn-group
    pub multiplicity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Option<RawAnnotation>, AnnotationError> {
        RawAnnotation::parse(raw, &AnnotationConfig::default())
    }

    #[test]
    fn test_parse_markers() {
        assert_eq!(parse("I").unwrap(), Some(RawAnnotation::Initiation));
        assert_eq!(parse(" ? ").unwrap(), Some(RawAnnotation::Ambiguous));
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("-").unwrap(), None);
    }

    #[test]
    fn test_parse_single_and_compound() {
        assert_eq!(
            parse("12").unwrap(),
            Some(RawAnnotation::SingleTarget(TurnId::from(12u64)))
        );
        assert_eq!(
            parse("1 + 02+3").unwrap(),
            Some(RawAnnotation::CompoundTarget(vec![
                TurnId::from(1u64),
                TurnId::from(2u64),
                TurnId::from(3u64),
            ]))
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(
            parse("1++2"),
            Err(AnnotationError::EmptyTarget("1++2".to_string()))
        );
        assert_eq!(
            parse("3+x"),
            Err(AnnotationError::NonNumericTarget("x".to_string()))
        );
        assert_eq!(
            parse("hello"),
            Err(AnnotationError::NonNumericTarget("hello".to_string()))
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let config = AnnotationConfig {
            compound_delimiter: ',',
            ..Default::default()
        };
        let parsed = RawAnnotation::parse("4,5", &config).unwrap();
        assert_eq!(
            parsed.map(|a| a.targets().len()),
            Some(2)
        );
    }
}
