use serde::Serialize;
use thiserror::Error;

use crate::models::TurnId;

/// Fatal pipeline errors: the transcript is structurally unsound
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A turn-group violates the same-speaker or contiguity invariant
    #[error("inconsistent turn-group {turn_id}: {reason}")]
    InconsistentTurnGroup {
        turn_id: TurnId,
        reason: TurnGroupViolation,
    },

    /// An aggregated pair named a speaker the node set does not contain
    ///
    /// Only reachable when `assemble_graph` is called directly with pairs
    /// that did not come from the same store.
    #[error("speaker {0:?} has no node in the assembled graph")]
    UnknownSpeaker(String),
}

/// Why a turn-group was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnGroupViolation {
    #[error("turns are attributed to more than one speaker ({speakers:?})")]
    MixedSpeakers { speakers: Vec<String> },

    #[error("turn at position {stray_position} is separated from the group starting at {first_position}")]
    NotContiguous {
        first_position: usize,
        stray_position: usize,
    },
}

/// Why a raw annotation string could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("empty target in {0:?}")]
    EmptyTarget(String),

    #[error("target {0:?} is not a numeric turn reference")]
    NonNumericTarget(String),
}

/// Recoverable problems, recorded in the pipeline report and skipped
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// Annotation did not parse; the turn is treated as ambiguous
    #[error("turn {turn_id} (position {position}): malformed annotation {raw:?}: {reason}")]
    MalformedAnnotation {
        position: usize,
        turn_id: TurnId,
        raw: String,
        reason: String,
    },

    /// Target identifier matches no turn in the transcript
    #[error("turn {turn_id} (position {position}): reference to unknown turn {target}")]
    UnresolvedReference {
        position: usize,
        turn_id: TurnId,
        target: TurnId,
    },

    /// Target turn-group starts after the responding turn
    ///
    /// The link is still produced unless strict ordering was requested.
    #[error("turn {turn_id} (position {position}): forward reference to turn {target}{}", drop_note(.dropped))]
    ForwardReference {
        position: usize,
        turn_id: TurnId,
        target: TurnId,
        dropped: bool,
    },
}

impl PipelineWarning {
    /// Position of the turn the warning was raised for
    pub fn position(&self) -> usize {
        match self {
            PipelineWarning::MalformedAnnotation { position, .. }
            | PipelineWarning::UnresolvedReference { position, .. }
            | PipelineWarning::ForwardReference { position, .. } => *position,
        }
    }

    /// Whether this warning caused a response link to be dropped
    pub fn drops_link(&self) -> bool {
        match self {
            PipelineWarning::MalformedAnnotation { .. } => false,
            PipelineWarning::UnresolvedReference { .. } => true,
            PipelineWarning::ForwardReference { dropped, .. } => *dropped,
        }
    }
}

fn drop_note(dropped: &bool) -> &'static str {
    if *dropped { " (dropped)" } else { "" }
}
