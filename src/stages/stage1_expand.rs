use tracing::{debug, info};

use crate::models::{NormalizedAnnotation, RawAnnotation, TranscriptStore};

/// Result of annotation expansion
#[derive(Debug, Clone)]
pub struct ExpansionResult<'a> {
    /// One single-target annotation per (turn, target) pair, in transcript order
    pub annotations: Vec<NormalizedAnnotation<'a>>,
    /// Turns that carried a single or compound target
    pub targeted_turns: usize,
}

/// Expand compound annotations into single-target annotations
///
/// A compound annotation with n targets on turn k yields n annotations that
/// all originate from k. Initiation, ambiguous and blank annotations yield
/// nothing.
pub fn expand_annotations(store: &TranscriptStore) -> ExpansionResult<'_> {
    let mut targeted_turns = 0;

    let annotations: Vec<NormalizedAnnotation<'_>> = store
        .turns()
        .iter()
        .filter_map(|turn| turn.annotation.as_ref().map(|a| (turn, a)))
        .flat_map(|(turn, annotation)| {
            if let RawAnnotation::CompoundTarget(targets) = annotation {
                debug!(
                    "Turn {} (position {}) responds to {} turns",
                    turn.turn_id,
                    turn.position,
                    targets.len()
                );
            }
            if !annotation.targets().is_empty() {
                targeted_turns += 1;
            }
            annotation
                .targets()
                .iter()
                .map(move |target| NormalizedAnnotation {
                    origin: turn,
                    target,
                })
        })
        .collect();

    info!(
        "Stage 1: {} targeted turns expanded to {} annotations",
        targeted_turns,
        annotations.len()
    );

    ExpansionResult {
        annotations,
        targeted_turns,
    }
}
