use tracing::{info, warn};

use crate::error::{PipelineError, PipelineWarning};
use crate::models::{AnnotationConfig, RawAnnotation, TranscriptRow, TranscriptStore, Turn};

/// Result of building the transcript store
#[derive(Debug)]
pub struct StoreResult {
    /// Validated, indexed transcript
    pub store: TranscriptStore,
    /// Annotations that failed to parse (their turns are treated as ambiguous)
    pub warnings: Vec<PipelineWarning>,
}

/// Build the Transcript Store from source rows
///
/// This stage:
/// 1. Parses each annotation cell; malformed cells become `Ambiguous`
/// 2. Indexes turn-groups by nominal identifier
/// 3. Fails fast if a turn-group mixes speakers or is not contiguous
pub fn build_store(
    rows: &[TranscriptRow],
    config: &AnnotationConfig,
) -> Result<StoreResult, PipelineError> {
    let mut warnings = Vec::new();

    let turns: Vec<Turn> = rows
        .iter()
        .enumerate()
        .map(|(position, row)| {
            let raw = row.annotation.as_deref().unwrap_or_default();
            let annotation = match RawAnnotation::parse(raw, config) {
                Ok(annotation) => annotation,
                Err(e) => {
                    let warning = PipelineWarning::MalformedAnnotation {
                        position,
                        turn_id: row.turn_id.clone(),
                        raw: raw.to_string(),
                        reason: e.to_string(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                    Some(RawAnnotation::Ambiguous)
                }
            };

            Turn {
                position,
                turn_id: row.turn_id.clone(),
                speaker: row.speaker.clone(),
                annotation,
            }
        })
        .collect();

    let store = TranscriptStore::new(turns)?;

    info!(
        "Stage 0: {} turns, {} turn ids, {} speakers, {} malformed annotations",
        store.len(),
        store.group_count(),
        store.speakers().len(),
        warnings.len()
    );

    Ok(StoreResult { store, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_transcript_json;
    use crate::models::TurnId;

    #[test]
    fn test_malformed_annotation_becomes_ambiguous() {
        let json = r#"[
            {"speaker": "A", "turn_id": 1, "annotation": "I"},
            {"speaker": "B", "turn_id": 2, "annotation": "1+banana"}
        ]"#;

        let rows = parse_transcript_json(json).unwrap();
        let result = build_store(&rows, &AnnotationConfig::default()).unwrap();

        assert_eq!(
            result.store.turns()[1].annotation,
            Some(RawAnnotation::Ambiguous)
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            &result.warnings[0],
            PipelineWarning::MalformedAnnotation { position: 1, raw, .. } if raw == "1+banana"
        ));
    }

    #[test]
    fn test_inconsistent_group_aborts() {
        let json = r#"[
            {"speaker": "A", "turn_id": 5},
            {"speaker": "B", "turn_id": 5}
        ]"#;

        let rows = parse_transcript_json(json).unwrap();
        let err = build_store(&rows, &AnnotationConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::InconsistentTurnGroup { ref turn_id, .. } if *turn_id == TurnId::from(5u64)
        ));
    }
}
